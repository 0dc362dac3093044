//! Error types for the strict parsing entry points.
//!
//! The lenient API (`IpAddress::from_string`, `parse_range`, ...) never
//! surfaces these; it folds them into sentinels or `None`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("invalid IP address '{0}'")]
    Invalid(String),
    #[error("expected 4 or 16 address bytes, got {0}")]
    BadLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range is empty")]
    Empty,
    #[error("invalid address in range: {0}")]
    Address(#[from] AddressError),
    #[error("invalid prefix '{prefix}' (max {max})")]
    Prefix { prefix: String, max: u8 },
    #[error("range bounds '{low}' and '{high}' are of different address families")]
    FamilyMismatch { low: String, high: String },
}
