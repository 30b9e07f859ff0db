//! EFID, EFPA, EFNA — the End File phase commands.

use binrw::{binrw, BinRead, BinWrite};
use oftp2_dtyp::fields::{NumericField, Utf8Field, YesNo};

/// `EFID` — ends the transfer of the current Virtual File.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct Efid {
    #[br(args(17,))]
    #[bw(args(17,))]
    pub record_count: NumericField,

    #[br(args(17,))]
    #[bw(args(17,))]
    pub unit_count: NumericField,
}

impl Efid {
    /// Per SPEC_FULL.md §4.6.4: record/unit counts are always sent as 0
    /// since real record-boundary tracking is out of scope.
    pub fn new() -> Self {
        Self {
            record_count: NumericField::new(0),
            unit_count: NumericField::new(0),
        }
    }
}

impl Default for Efid {
    fn default() -> Self {
        Self::new()
    }
}

/// `EFPA` — positive answer to an end file request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
pub struct Efpa {
    pub change_direction: YesNo,
}

impl Efpa {
    pub fn new(change_direction: bool) -> Self {
        Self {
            change_direction: YesNo(change_direction),
        }
    }
}

/// `EFNA` — negative answer to an end file request.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Efna {
    #[br(args(2,))]
    #[bw(args(2,))]
    pub reason: NumericField,

    #[br(temp, args(3,))]
    #[bw(calc = NumericField::new(reason_text.as_str().len() as u64), args(3,))]
    reason_text_len: NumericField,

    #[br(args(reason_text_len.get() as usize,))]
    #[bw(args(reason_text.as_str().len(),))]
    pub reason_text: Utf8Field,
}

impl Efna {
    pub fn new(reason: u64, reason_text: impl Into<String>) -> Self {
        Self {
            reason: NumericField::new(reason),
            reason_text: Utf8Field::new(reason_text),
        }
    }

    pub fn reason_text(&self) -> &str {
        crate::reason::file_reject_reason_text(self.reason.get())
    }

    pub fn text(&self) -> &str {
        self.reason_text.as_str()
    }
}
