//! Common wire data types shared across the OFTP2 codec crates.

pub mod error;
pub mod fields;
pub mod odette_id;
pub mod timestamp;

pub use error::DtypError;
pub use fields::{AlphaField, Cr, NumericField, Utf8Field, YesNo};
pub use odette_id::build_odette_id;
pub use timestamp::{decode_timestamp, encode_timestamp};
