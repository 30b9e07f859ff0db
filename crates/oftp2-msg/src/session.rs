//! SSID (identification + capability exchange), ESID (termination), SECD
//! and CD (direction control) — the Start Session and End Session phase
//! commands.

use binrw::{binrw, BinRead, BinWrite};
use oftp2_dtyp::fields::{AlphaField, Cr, NumericField, Utf8Field, YesNo};

pub const PROTOCOL_LEVEL: u64 = 5;

/// Send/receive capability advertised in [`Ssid::capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SendOnly,
    ReceiveOnly,
    Both,
}

impl Capability {
    fn as_char(self) -> char {
        match self {
            Capability::SendOnly => 'S',
            Capability::ReceiveOnly => 'R',
            Capability::Both => 'B',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Capability::SendOnly),
            'R' => Some(Capability::ReceiveOnly),
            'B' => Some(Capability::Both),
            _ => None,
        }
    }
}

/// `SSID` — identification and capability negotiation, exchanged by both
/// sides in the Start Session phase.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct Ssid {
    #[br(args(1,))]
    #[bw(args(1,))]
    level: NumericField,
    #[br(args(25,))]
    #[bw(args(25,))]
    pub id: AlphaField,
    #[br(args(8,))]
    #[bw(args(8,))]
    pub password: AlphaField,
    #[br(args(5,))]
    #[bw(args(5,))]
    buffer_size: NumericField,
    #[br(map = |c: u8| Capability::from_char(c as char).unwrap_or(Capability::Both))]
    #[bw(map = |c: &Capability| c.as_char() as u8)]
    pub capability: Capability,
    pub compression: YesNo,
    pub restart: YesNo,
    pub special_logic: YesNo,
    #[br(args(3,))]
    #[bw(args(3,))]
    credit: NumericField,
    pub authentication: YesNo,
    #[br(args(4,))]
    #[bw(args(4,))]
    reserved: AlphaField,
    #[br(args(8,))]
    #[bw(args(8,))]
    pub user_data: AlphaField,
    pub cr: Cr,
}

impl Ssid {
    pub fn new(id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            level: NumericField::new(PROTOCOL_LEVEL),
            id: AlphaField::new(id),
            password: AlphaField::new(password),
            buffer_size: NumericField::new(128),
            capability: Capability::Both,
            compression: YesNo(false),
            restart: YesNo(false),
            special_logic: YesNo(false),
            credit: NumericField::new(1),
            authentication: YesNo(false),
            reserved: AlphaField::new(""),
            user_data: AlphaField::new(""),
            cr: Cr,
        }
    }

    pub fn with_buffer_size(mut self, n: u64) -> Self {
        self.buffer_size = NumericField::new(n);
        self
    }

    pub fn with_capability(mut self, cap: Capability) -> Self {
        self.capability = cap;
        self
    }

    pub fn with_compression(mut self, v: bool) -> Self {
        self.compression = YesNo(v);
        self
    }

    pub fn with_restart(mut self, v: bool) -> Self {
        self.restart = YesNo(v);
        self
    }

    pub fn with_special_logic(mut self, v: bool) -> Self {
        self.special_logic = YesNo(v);
        self
    }

    pub fn with_credit(mut self, n: u64) -> Self {
        self.credit = NumericField::new(n.min(999));
        self
    }

    pub fn with_authentication(mut self, v: bool) -> Self {
        self.authentication = YesNo(v);
        self
    }

    pub fn with_user_data(mut self, s: impl Into<String>) -> Self {
        self.user_data = AlphaField::new(s);
        self
    }

    pub fn buffer_size(&self) -> u64 {
        self.buffer_size.get()
    }

    pub fn credit(&self) -> u64 {
        self.credit.get()
    }

    pub fn level(&self) -> u64 {
        self.level.get()
    }
}

/// `ESID` — terminates a session, stating the reason.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Esid {
    #[br(args(2,))]
    #[bw(args(2,))]
    pub reason: NumericField,

    #[br(temp, args(3,))]
    #[bw(calc = NumericField::new(reason_text.as_str().len() as u64), args(3,))]
    reason_text_len: NumericField,

    #[br(args(reason_text_len.get() as usize,))]
    #[bw(args(reason_text.as_str().len(),))]
    pub reason_text: Utf8Field,

    pub cr: Cr,
}

impl Esid {
    pub fn new(reason: u64, reason_text: impl Into<String>) -> Self {
        Self {
            reason: NumericField::new(reason),
            reason_text: Utf8Field::new(reason_text),
            cr: Cr,
        }
    }

    pub fn ok() -> Self {
        Self::new(0, "OK")
    }

    pub fn reason_text(&self) -> &str {
        self.reason_text.as_str()
    }

    /// The wire text if the peer sent one, falling back to the standard
    /// label for `reason` otherwise.
    pub fn reason_label(&self) -> &str {
        if self.reason_text.as_str().is_empty() {
            crate::reason::esid_reason_text(self.reason.get())
        } else {
            self.reason_text.as_str()
        }
    }
}

/// `SECD` — Security Change Direction; carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
pub struct Secd;

/// `CD` — Change Direction; carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
pub struct Cd;

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn ssid_round_trip() {
        let ssid = Ssid::new("O0021ACME", "PASSWORD")
            .with_buffer_size(10)
            .with_capability(Capability::ReceiveOnly)
            .with_compression(true)
            .with_restart(true)
            .with_special_logic(false)
            .with_credit(10)
            .with_authentication(true)
            .with_user_data("USERDATA");

        let mut buf = Vec::new();
        ssid.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Ssid::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, ssid);
        assert_eq!(parsed.buffer_size(), 10);
        assert_eq!(parsed.credit(), 10);
        assert!(bool::from(parsed.authentication));
    }

    #[test]
    fn ssid_wire_length_is_60_octets() {
        let ssid = Ssid::new("X", "Y");
        let mut buf = Vec::new();
        ssid.write(&mut Cursor::new(&mut buf)).unwrap();
        assert_eq!(buf.len(), 60);
    }

    #[test]
    fn esid_round_trip() {
        let esid = Esid::ok();
        let mut buf = Vec::new();
        esid.write(&mut Cursor::new(&mut buf)).unwrap();
        let parsed = Esid::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, esid);
        assert_eq!(parsed.reason_text(), "OK");
    }

    #[test]
    fn esid_falls_back_to_the_standard_label_when_text_is_blank() {
        let esid = Esid::new(2, "");
        assert_eq!(esid.reason_label(), "Invalid password");
    }
}
