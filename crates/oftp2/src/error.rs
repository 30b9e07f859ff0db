//! Errors surfaced by the session driver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] oftp2_transport::TransportError),

    #[error(transparent)]
    Codec(#[from] oftp2_msg::MsgError),

    #[error("peer rejected the session: {reason} ({text:?})")]
    SessionTerminated { reason: u64, text: String },

    #[error("expected {expected}, got {got:?} in state {state}")]
    UnexpectedMessage {
        expected: &'static str,
        got: u8,
        state: &'static str,
    },

    #[error("local authentication flag ({local}) does not match peer's ({peer})")]
    AuthenticationMismatch { local: bool, peer: bool },

    #[error("peer's SFPA answer count {answer_count} is ahead of the requested restart position {restart_position}")]
    RestartMismatch {
        answer_count: u64,
        restart_position: u64,
    },

    #[error("peer rejected our authentication answer")]
    WrongAnswer,

    #[error("peer's authentication response did not match the expected value")]
    PeerAuthFailed,

    #[error("peer rejected the file: {reason} ({text:?})")]
    PeerRejected { reason: u64, text: String },

    #[error("operation is invalid in the current session state: {0}")]
    InvalidState(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
