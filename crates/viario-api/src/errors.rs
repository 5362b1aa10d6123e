// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    InvalidParameter,
    NotFound,
    RateLimited,
    AccessDenied,
    UnsupportedMediaType,
    StoreUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidParameter,
            format!("invalid parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self::new(ApiErrorCode::NotFound, format!("{what} not found"), json!({}))
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self::new(
            ApiErrorCode::RateLimited,
            "request limit exceeded; retry in one minute",
            json!({"scope": "ip"}),
        )
    }

    #[must_use]
    pub fn store_unavailable(message: &str) -> Self {
        Self::new(
            ApiErrorCode::StoreUnavailable,
            "registry store unavailable",
            json!({"message": message}),
        )
    }
}
