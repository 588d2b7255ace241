//! Request boundary between a transport layer and the engine
//!
//! Accepts a decoded JSON body, checks the required top-level fields, runs
//! the comparison and turns engine failures into user-safe errors. Full
//! error detail is logged and never returned to the caller.

use serde_json::Value;
use thiserror::Error;

use crate::comparison::{compare, ComparisonResult};
use crate::input::scenario_from_value;

/// Optional key a caller may wrap the scenario in
pub const WRAPPER_KEY: &str = "payload";

pub const REQUIRED_FIELDS: [&str; 6] = [
    "principal_aed",
    "tenure_months",
    "horizon_months",
    "current_terms",
    "new_offer",
    "rate_scenarios",
];

/// Message returned for any failure inside the engine
pub const GENERIC_FAILURE: &str = "Unable to compute the mortgage comparison for this scenario.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{}", GENERIC_FAILURE)]
    Failed,
}

/// Strip the optional wrapper key
pub fn unwrap_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(WRAPPER_KEY) => {
            map.remove(WRAPPER_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Required top-level fields absent from the payload
pub fn missing_fields(payload: &Value) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| payload.get(**field).map_or(true, Value::is_null))
        .map(|field| field.to_string())
        .collect()
}

/// Validate and evaluate one comparison request
pub fn evaluate(body: Value) -> Result<ComparisonResult, RequestError> {
    let payload = unwrap_payload(body);
    if !payload.is_object() {
        return Err(RequestError::NotAnObject);
    }

    let missing = missing_fields(&payload);
    if !missing.is_empty() {
        log::warn!("Rejected comparison request, missing: {}", missing.join(", "));
        return Err(RequestError::MissingFields(missing));
    }

    let result = scenario_from_value(payload).and_then(|input| compare(&input));
    result.map_err(|err| {
        log::error!("Comparison failed: {}", err);
        RequestError::Failed
    })
}
