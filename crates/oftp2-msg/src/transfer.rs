//! DATA and CDT — the Data Transfer phase commands, plus the Data Exchange
//! Buffer sub-record packer.

use binrw::helpers::until_eof;
use binrw::{BinRead, BinWrite};
use oftp2_dtyp::fields::AlphaField;

/// Maximum data octets a single sub-record can carry (6-bit count field).
pub const SUBRECORD_MAX_DATA: usize = 63;

/// `DATA` — a Data Exchange Buffer: the command code followed by a stream of
/// packed sub-records (see [`pack_subrecords`]).
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct Data {
    #[br(parse_with = until_eof)]
    pub payload: Vec<u8>,
}

impl Data {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

/// `CDT` — Credit: grants the Speaker another window of DATA sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct Cdt {
    #[br(args(2,))]
    #[bw(args(2,))]
    reserved: AlphaField,
}

impl Default for Cdt {
    fn default() -> Self {
        Self {
            reserved: AlphaField::new("  "),
        }
    }
}

/// Packs `src` into a sequence of Data Exchange Buffer sub-records.
///
/// `last` marks whether `src` is the final chunk of the virtual file being
/// sent; only the very last sub-record of that final chunk carries `EOF=1`.
/// An empty `src` produces no sub-records.
pub fn pack_subrecords(src: &[u8], last: bool) -> Vec<u8> {
    if src.is_empty() {
        return Vec::new();
    }
    let chunks: Vec<&[u8]> = src.chunks(SUBRECORD_MAX_DATA).collect();
    let last_index = chunks.len() - 1;
    let mut out = Vec::with_capacity(src.len() + chunks.len());
    for (i, chunk) in chunks.into_iter().enumerate() {
        let mut header = chunk.len() as u8;
        if last && i == last_index {
            header |= 0x80;
        }
        out.push(header);
        out.extend_from_slice(chunk);
    }
    out
}

/// Unpacks a Data Exchange Buffer payload back into its data octets and
/// whether the EOF flag was set on its final sub-record.
pub fn unpack_subrecords(payload: &[u8]) -> (Vec<u8>, bool) {
    let mut data = Vec::with_capacity(payload.len());
    let mut eof = false;
    let mut pos = 0;
    while pos < payload.len() {
        let header = payload[pos];
        let count = (header & 0x3F) as usize;
        eof = header & 0x80 != 0;
        pos += 1;
        let end = (pos + count).min(payload.len());
        data.extend_from_slice(&payload[pos..end]);
        pos = end;
    }
    (data, eof)
}

/// Computes the maximum number of raw file octets that fit into a single
/// DATA command given a negotiated Exchange Buffer size.
pub fn max_payload(buffer_size: u64) -> usize {
    let buffer_size = buffer_size as usize;
    let approx = buffer_size / SUBRECORD_MAX_DATA;
    let max_sub_records = (buffer_size.saturating_sub(approx)) / SUBRECORD_MAX_DATA;
    (max_sub_records * SUBRECORD_MAX_DATA).saturating_sub(1)
}
