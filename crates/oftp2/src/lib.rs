#![forbid(unsafe_code)]

//! A pure Rust OFTP2 (ODETTE File Transfer Protocol v2, RFC 5024) client.
//!
//! This crate drives the Initiator (Speaker) side of a session: open a
//! [`Transport`], exchange the Start Session phase, optionally authenticate,
//! then hand a [`FileSource`] to [`Session::send_file`]. The wire codec
//! lives in `oftp2-msg`/`oftp2-dtyp`; this crate only sequences it.

pub mod config;
pub mod error;
pub mod file_source;
pub mod session;

pub use config::SessionConfig;
pub use error::Error;
pub use file_source::{FileSource, StdFileSource};
pub use session::{PeerInfo, Session, State, query_server_capabilities};

pub use oftp2_dtyp::build_odette_id;
pub use oftp2_transport::{TcpTransport, Transport};

/// Result type returned by this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
