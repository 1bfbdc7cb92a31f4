//! HTTP request handlers for the REST API.

pub mod campaign;
pub mod conversation;
pub mod lead;
pub mod product;
pub mod stats;
pub mod template;
pub mod vendor;

use std::str::FromStr;

use crate::http::error::AppError;

/// Parse a path identifier, rejecting malformed ones as a validation error.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid {what} id: '{raw}'")))
}
