use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Identifier of a municipality row. Strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MunicipalityId(i64);

impl MunicipalityId {
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw <= 0 {
            return Err(ValidationError(format!(
                "municipality id must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for MunicipalityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a road-segment (ramal) row. Strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SegmentId(i64);

impl SegmentId {
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw <= 0 {
            return Err(ValidationError(format!(
                "segment id must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for SegmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: i64,
    pub name: String,
}

/// One ramal row as stored in the registry. Free-text columns are optional;
/// the registry carries plenty of NULLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub id: i64,
    pub code: Option<String>,
    pub description: Option<String>,
    pub extension_km: Option<String>,
    pub contract_number: Option<String>,
    pub status: Option<String>,
    pub surface: Option<String>,
}

/// Full ramal detail, joined with its municipality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegmentDetail {
    pub segment: RoadSegment,
    pub road_class: Option<String>,
    pub segmentation: Option<String>,
    pub access_highway: Option<String>,
    pub reference_point: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub completion_year: Option<String>,
    pub municipality_name: Option<String>,
}
