//! Command codec and classifier errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MsgError {
    #[error("unknown command code {0:?}")]
    UnknownCommand(char),

    #[error("failed to decode field {field}: {reason}")]
    FieldParse { field: &'static str, reason: String },

    #[error("invalid enumerated value for field {field}: {value:?}")]
    BadEnum { field: &'static str, value: String },

    #[error(transparent)]
    Codec(#[from] binrw::Error),
}

pub type Result<T> = std::result::Result<T, MsgError>;
