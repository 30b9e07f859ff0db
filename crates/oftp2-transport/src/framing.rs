//! Stream Transmission Header framing: a 4-octet big-endian length prefix
//! whose top octet is overwritten with the constant magic `0x10`.

use std::io::Read;

use log::trace;

use crate::error::{Result, TransportError};

pub const STH_MAGIC: u8 = 0x10;
pub const STH_HEADER_LEN: usize = 4;

/// Max length a frame's 24 usable length bits can express.
const MAX_FRAME_LEN: usize = 0x00FF_FFFF;

/// Prepends the Stream Transmission Header to `payload`.
pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let length = payload.len() + STH_HEADER_LEN;
    if length > MAX_FRAME_LEN {
        return Err(TransportError::TooLarge(payload.len()));
    }
    let mut header = (length as u32).to_be_bytes();
    header[0] = STH_MAGIC;
    trace!("framing {} octet payload ({length} total)", payload.len());
    let mut out = Vec::with_capacity(length);
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Reads one Stream Transmission Header and the payload it announces.
pub fn unframe<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; STH_HEADER_LEN];
    reader.read_exact(&mut header)?;
    if header[0] & 0xF0 != STH_MAGIC {
        return Err(TransportError::BadMagic(header[0]));
    }
    header[0] = 0;
    let length = u32::from_be_bytes(header) as usize;
    let mut payload = vec![0u8; length.saturating_sub(STH_HEADER_LEN)];
    reader.read_exact(&mut payload)?;
    trace!("unframed {} octet payload", payload.len());
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frame_sets_magic_and_length() {
        let framed = frame(b"hello").unwrap();
        assert_eq!(framed[0], 0x10);
        assert_eq!(framed.len(), 9);
        assert_eq!(&framed[4..], b"hello");
    }

    #[test]
    fn round_trips_through_unframe() {
        let framed = frame(b"ODETTE FTP READY \r").unwrap();
        let payload = unframe(&mut Cursor::new(framed)).unwrap();
        assert_eq!(payload, b"ODETTE FTP READY \r");
    }

    #[test]
    fn rejects_a_bad_magic_nibble() {
        let mut bytes = frame(b"x").unwrap();
        bytes[0] = 0x20;
        let err = unframe(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, TransportError::BadMagic(0x20)));
    }

    #[test]
    fn tolerates_the_magic_bits_set_over_a_nonzero_length_byte() {
        // top octet carries both the 0x10 magic and high length bits in the
        // wild; a conformant peer always sends 0x10 exactly, but decoding
        // must mask it off regardless of what's above the low nibble.
        let mut bytes = frame(b"y").unwrap();
        bytes[0] = 0x1F;
        let payload = unframe(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(payload, b"y");
    }
}
