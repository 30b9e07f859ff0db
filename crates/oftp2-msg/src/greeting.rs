//! SSRM — the Listener's readiness greeting that opens every session.

use binrw::{BinRead, BinWrite};
use oftp2_dtyp::fields::{AlphaField, Cr};

pub const SSRM_GREETING: &str = "ODETTE FTP READY";

/// `SSRM` — sent by the Responder immediately after the transport opens.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct Ssrm {
    #[br(args(17,), assert(greeting.as_str() == SSRM_GREETING))]
    #[bw(args(17,))]
    pub greeting: AlphaField,
    pub cr: Cr,
}

impl Default for Ssrm {
    fn default() -> Self {
        Self {
            greeting: AlphaField::new(SSRM_GREETING),
            cr: Cr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::{BinWrite, io::Cursor};

    #[test]
    fn marshals_to_the_literal_greeting() {
        let mut buf = Vec::new();
        Ssrm::default()
            .write(&mut Cursor::new(&mut buf))
            .unwrap();
        assert_eq!(buf, b"ODETTE FTP READY \r");
    }

    #[test]
    fn round_trips() {
        let mut buf = Vec::new();
        Ssrm::default()
            .write(&mut Cursor::new(&mut buf))
            .unwrap();
        let parsed = Ssrm::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, Ssrm::default());
    }
}
