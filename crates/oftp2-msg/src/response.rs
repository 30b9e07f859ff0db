//! EERP and NERP — end-to-end response commands, closing the virtual file
//! transaction with an optional signature produced by an external
//! cryptographic collaborator.

use binrw::{binrw, BinRead, BinWrite};
use oftp2_dtyp::fields::{AlphaField, NumericField, Utf8Field};

/// `EERP` — positive end-to-end response.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Eerp {
    #[br(args(26,))]
    #[bw(args(26,))]
    pub dataset_name: AlphaField,

    #[br(args(3,))]
    #[bw(args(3,))]
    reserved1: AlphaField,

    #[br(args(8,))]
    #[bw(args(8,))]
    date: NumericField,

    #[br(args(10,))]
    #[bw(args(10,))]
    time: NumericField,

    #[br(args(8,))]
    #[bw(args(8,))]
    pub user_data: AlphaField,

    #[br(args(25,))]
    #[bw(args(25,))]
    pub destination: AlphaField,

    #[br(args(25,))]
    #[bw(args(25,))]
    pub originator: AlphaField,

    #[br(temp)]
    #[bw(calc = hash.len() as u16)]
    hash_len: u16,
    #[br(count = hash_len)]
    pub hash: Vec<u8>,

    #[br(temp)]
    #[bw(calc = signature.len() as u16)]
    sig_len: u16,
    #[br(count = sig_len)]
    pub signature: Vec<u8>,
}

impl Eerp {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: AlphaField::new(dataset_name),
            reserved1: AlphaField::new(""),
            date: NumericField::new(0),
            time: NumericField::new(0),
            user_data: AlphaField::new(""),
            destination: AlphaField::new(""),
            originator: AlphaField::new(""),
            hash: Vec::new(),
            signature: Vec::new(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

/// `NERP` — negative end-to-end response.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Nerp {
    #[br(args(26,))]
    #[bw(args(26,))]
    pub dataset_name: AlphaField,

    #[br(args(6,))]
    #[bw(args(6,))]
    reserved1: AlphaField,

    #[br(args(8,))]
    #[bw(args(8,))]
    date: NumericField,

    #[br(args(10,))]
    #[bw(args(10,))]
    time: NumericField,

    #[br(args(25,))]
    #[bw(args(25,))]
    pub destination: AlphaField,

    #[br(args(25,))]
    #[bw(args(25,))]
    pub originator: AlphaField,

    #[br(args(25,))]
    #[bw(args(25,))]
    pub creator: AlphaField,

    #[br(args(2,))]
    #[bw(args(2,))]
    pub reason: NumericField,

    #[br(temp, args(3,))]
    #[bw(calc = NumericField::new(reason_text.as_str().len() as u64), args(3,))]
    reason_text_len: NumericField,

    #[br(args(reason_text_len.get() as usize,))]
    #[bw(args(reason_text.as_str().len(),))]
    pub reason_text: Utf8Field,

    #[br(temp)]
    #[bw(calc = hash.len() as u16)]
    hash_len: u16,
    #[br(count = hash_len)]
    pub hash: Vec<u8>,

    #[br(temp)]
    #[bw(calc = signature.len() as u16)]
    sig_len: u16,
    #[br(count = sig_len)]
    pub signature: Vec<u8>,
}

impl Nerp {
    pub fn new(dataset_name: impl Into<String>, reason: u64, reason_text: impl Into<String>) -> Self {
        Self {
            dataset_name: AlphaField::new(dataset_name),
            reserved1: AlphaField::new(""),
            date: NumericField::new(0),
            time: NumericField::new(0),
            destination: AlphaField::new(""),
            originator: AlphaField::new(""),
            creator: AlphaField::new(""),
            reason: NumericField::new(reason),
            reason_text: Utf8Field::new(reason_text),
            hash: Vec::new(),
            signature: Vec::new(),
        }
    }

    pub fn reason_text(&self) -> &'static str {
        crate::reason::nerp_reason_text(self.reason.get())
    }

    pub fn text(&self) -> &str {
        self.reason_text.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn eerp_round_trip_without_signature() {
        let eerp = Eerp::new("DATASET1");
        let mut buf = Vec::new();
        eerp.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Eerp::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, eerp);
        assert!(!parsed.is_signed());
    }

    #[test]
    fn eerp_round_trip_with_signature() {
        let mut eerp = Eerp::new("DATASET1");
        eerp.hash = vec![0xAA; 32];
        eerp.signature = vec![0xBB; 128];
        let mut buf = Vec::new();
        eerp.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Eerp::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, eerp);
        assert!(parsed.is_signed());
    }

    #[test]
    fn nerp_round_trip() {
        let nerp = Nerp::new("DATASET1", 11, "invalid file name");
        let mut buf = Vec::new();
        nerp.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Nerp::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.text(), "invalid file name");
        assert_eq!(parsed.reason_text(), "SFNA(RETRY=N): invalid file name");
        assert_eq!(parsed, nerp);
    }
}
