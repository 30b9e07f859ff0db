//! Errors raised by the field codec primitives.

use thiserror::Error;

/// Failure modes for encoding/decoding a single fixed-width OFTP2 field.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DtypError {
    #[error("alphanumeric field {field} contains a disallowed character: {ch:?}")]
    InvalidAlphaChar { field: &'static str, ch: char },

    #[error("field {field} value {value:?} does not fit in {width} octets")]
    TooLong {
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("numeric field {field} overflowed its declared width of {width} digits")]
    NumericOverflow { field: &'static str, width: usize },

    #[error("field {field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("boolean field {field} held neither 'Y' nor 'N' (got {ch:?})")]
    InvalidYesNo { field: &'static str, ch: char },

    #[error("timestamp fields did not form a valid CCYYMMDDHHMMSS instant")]
    InvalidTimestamp,
}

pub type Result<T> = std::result::Result<T, DtypError>;
