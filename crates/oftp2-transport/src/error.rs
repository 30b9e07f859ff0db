//! Framing and transport I/O errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("payload of {0} octets exceeds the 24-bit Stream Transmission Header length field")]
    TooLarge(usize),

    #[error("frame header magic nibble was {0:#04x}, expected 0x10")]
    BadMagic(u8),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
