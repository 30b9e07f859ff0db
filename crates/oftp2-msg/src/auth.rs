//! AUCH / AURP — the secure authentication challenge/response exchange.
//! SECD lives in [`crate::session`] since it carries no payload of its own.

use binrw::{binrw, BinRead, BinWrite};

/// `AUCH` — presents an authentication challenge. The challenge payload is
/// an opaque, externally [CMS]-encrypted octet string; this codec never
/// inspects its contents.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Auch {
    #[br(temp)]
    #[bw(calc = challenge.len() as u16)]
    challenge_len: u16,

    #[br(count = challenge_len)]
    pub challenge: Vec<u8>,
}

impl Auch {
    pub fn new(challenge: Vec<u8>) -> Self {
        Self { challenge }
    }
}

/// `AURP` — the response to an authentication challenge: a fixed 20-octet
/// decrypted value produced by an external crypto collaborator.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct Aurp {
    pub response: [u8; 20],
}

impl Aurp {
    pub fn new(response: [u8; 20]) -> Self {
        Self { response }
    }
}
