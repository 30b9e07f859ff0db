//! SFID (start file), SFPA/SFNA (start file answers), and RTR — the Start
//! File phase commands.

use binrw::{binrw, BinRead, BinWrite};
use oftp2_dtyp::fields::{AlphaField, NumericField, Utf8Field, YesNo};
use oftp2_dtyp::timestamp::{decode_timestamp, encode_timestamp};
use time::OffsetDateTime;

/// Virtual File format, `SFIDFMT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fixed,
    Variable,
    Unstructured,
    Text,
}

impl FileFormat {
    fn as_char(self) -> char {
        match self {
            FileFormat::Fixed => 'F',
            FileFormat::Variable => 'V',
            FileFormat::Unstructured => 'U',
            FileFormat::Text => 'T',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(FileFormat::Fixed),
            'V' => Some(FileFormat::Variable),
            'U' => Some(FileFormat::Unstructured),
            'T' => Some(FileFormat::Text),
            _ => None,
        }
    }

    /// Per SPEC_FULL.md §4.6.4: max record size is always 0 for T/U (and,
    /// following the reference implementation, also for F/V since real
    /// record-boundary tracking is not implemented here).
    pub fn max_record_size(self) -> u64 {
        0
    }
}

/// `SFID` — starts the transfer of a Virtual File.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Sfid {
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

    #[br(map = |c: u8| FileFormat::from_char(c as char).unwrap_or(FileFormat::Unstructured))]
    #[bw(map = |f: &FileFormat| f.as_char() as u8)]
    pub format: FileFormat,

    #[br(args(5,))]
    #[bw(args(5,))]
    pub max_record_size: NumericField,

    #[br(args(13,))]
    #[bw(args(13,))]
    pub file_size_in_k: NumericField,

    #[br(args(13,))]
    #[bw(args(13,))]
    pub original_size_in_k: NumericField,

    #[br(args(17,))]
    #[bw(args(17,))]
    pub restart_position: NumericField,

    #[br(args(2,))]
    #[bw(args(2,))]
    pub security_level: NumericField,

    #[br(args(2,))]
    #[bw(args(2,))]
    pub cipher_suite: NumericField,

    #[br(args(1,))]
    #[bw(args(1,))]
    pub compression: NumericField,

    #[br(args(1,))]
    #[bw(args(1,))]
    pub envelope: NumericField,

    pub signing_required: YesNo,

    #[br(temp, args(3,))]
    #[bw(calc = NumericField::new(description.as_str().len() as u64), args(3,))]
    description_len: NumericField,

    #[br(args(description_len.get() as usize,))]
    #[bw(args(description.as_str().len(),))]
    pub description: Utf8Field,
}

impl Sfid {
    pub fn new(dataset_name: impl Into<String>, format: FileFormat) -> Self {
        Self {
            dataset_name: AlphaField::new(dataset_name),
            reserved1: AlphaField::new(""),
            date: NumericField::new(0),
            time: NumericField::new(0),
            user_data: AlphaField::new(""),
            destination: AlphaField::new(""),
            originator: AlphaField::new(""),
            format,
            max_record_size: NumericField::new(format.max_record_size()),
            file_size_in_k: NumericField::new(0),
            original_size_in_k: NumericField::new(0),
            restart_position: NumericField::new(0),
            security_level: NumericField::new(0),
            cipher_suite: NumericField::new(0),
            compression: NumericField::new(0),
            envelope: NumericField::new(0),
            signing_required: YesNo(false),
            description: Utf8Field::new(""),
        }
    }

    pub fn with_file_date_time(mut self, dt: OffsetDateTime) -> Self {
        let (date, time) = encode_timestamp(dt);
        self.date = NumericField::new(date.parse().unwrap_or(0));
        self.time = NumericField::new(time.parse().unwrap_or(0));
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = AlphaField::new(destination);
        self
    }

    pub fn with_originator(mut self, originator: impl Into<String>) -> Self {
        self.originator = AlphaField::new(originator);
        self
    }

    pub fn with_file_size_in_k(mut self, n: u64) -> Self {
        self.file_size_in_k = NumericField::new(n);
        self.original_size_in_k = NumericField::new(n);
        self
    }

    pub fn with_restart_position(mut self, n: u64) -> Self {
        self.restart_position = NumericField::new(n);
        self
    }

    pub fn with_security_level(mut self, n: u64) -> Self {
        self.security_level = NumericField::new(n);
        self
    }

    pub fn with_cipher(mut self, n: u64) -> Self {
        self.cipher_suite = NumericField::new(n);
        self
    }

    pub fn with_compression(mut self, n: u64) -> Self {
        self.compression = NumericField::new(n);
        self
    }

    pub fn with_envelope(mut self, n: u64) -> Self {
        self.envelope = NumericField::new(n);
        self
    }

    pub fn with_signing_required(mut self, v: bool) -> Self {
        self.signing_required = YesNo(v);
        self
    }

    pub fn file_date_time(&self) -> Option<OffsetDateTime> {
        let date = format!("{:08}", self.date.get());
        let time = format!("{:010}", self.time.get());
        decode_timestamp(&date, &time).ok()
    }
}

/// `SFPA` — positive answer to a start file request.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct Sfpa {
    #[br(args(17,))]
    #[bw(args(17,))]
    pub answer_count: NumericField,
}

impl Sfpa {
    pub fn new(answer_count: u64) -> Self {
        Self {
            answer_count: NumericField::new(answer_count),
        }
    }
}

/// `SFNA` — negative answer to a start file request.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Sfna {
    #[br(args(2,))]
    #[bw(args(2,))]
    pub reason: NumericField,

    pub retry: YesNo,

    #[br(temp, args(3,))]
    #[bw(calc = NumericField::new(reason_text.as_str().len() as u64), args(3,))]
    reason_text_len: NumericField,

    #[br(args(reason_text_len.get() as usize,))]
    #[bw(args(reason_text.as_str().len(),))]
    pub reason_text: Utf8Field,
}

impl Sfna {
    pub fn new(reason: u64, retry: bool, reason_text: impl Into<String>) -> Self {
        Self {
            reason: NumericField::new(reason),
            retry: YesNo(retry),
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

/// `RTR` — Ready To Receive; carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
pub struct Rtr;

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use time::macros::datetime;

    #[test]
    fn sfid_round_trip() {
        let sfid = Sfid::new("DATASET1", FileFormat::Text)
            .with_file_date_time(datetime!(2024-03-05 12:00:00 UTC));
        let mut buf = Vec::new();
        sfid.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Sfid::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, sfid);
        assert_eq!(parsed.format, FileFormat::Text);
    }

    #[test]
    fn sfpa_round_trip() {
        let sfpa = Sfpa::new(0);
        let mut buf = Vec::new();
        sfpa.write(&mut Cursor::new(&mut buf)).unwrap();
        assert_eq!(buf.len(), 17);
        let parsed = Sfpa::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, sfpa);
    }

    #[test]
    fn sfna_carries_reason_text() {
        let sfna = Sfna::new(1, false, "bad filename");
        let mut buf = Vec::new();
        sfna.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Sfna::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.text(), "bad filename");
        assert_eq!(parsed.reason_text(), "Invalid filename");
    }
}
