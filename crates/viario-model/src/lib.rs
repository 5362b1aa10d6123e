#![forbid(unsafe_code)]
//! Viário registry model SSOT.
//!
//! Pure domain types and leaf functions for the road-infrastructure
//! registry: municipalities, road segments (ramais), highways (rodovias)
//! and the construction-work classification applied to each segment.
//! No I/O lives here.

mod highway;
mod obra;
mod sanitize;
mod segment;

pub use highway::{
    format_extension_total, parse_extension_km, total_extension_km, HighwaySection,
};
pub use obra::{classify, Classification};
pub use sanitize::sanitize_input;
pub use segment::{
    Municipality, MunicipalityId, RoadSegment, RoadSegmentDetail, SegmentId, ValidationError,
};

pub const CRATE_NAME: &str = "viario-model";
