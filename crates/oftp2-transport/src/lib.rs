#![forbid(unsafe_code)]

//! Stream Transmission Header framing and the blocking transport OFTP2
//! sessions drive. The codec owns framing; implementations of [`Transport`]
//! are oblivious to it.

pub mod error;
pub mod framing;
pub mod tcp;
pub mod traits;

pub use error::TransportError;
pub use framing::{STH_HEADER_LEN, STH_MAGIC, frame, unframe};
pub use tcp::TcpTransport;
pub use traits::Transport;
