#![forbid(unsafe_code)]
//! Wire contract for the Viário catalog API.
//!
//! DTO shaping and the error envelope live here so the server crate only
//! routes, gates and queries. Field names follow the registry's existing
//! JSON contract (Portuguese keys).

mod dto;
mod errors;

pub use dto::{
    HighwayDetails, HighwayNameRow, HighwaySectionRow, MunicipalityRow, SegmentDetail, SegmentRow,
};
pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "viario-api";
