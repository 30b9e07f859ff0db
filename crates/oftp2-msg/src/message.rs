//! The `Command` sum type: classifies and dispatches a framed Exchange
//! Buffer payload to its command-specific codec.
//!
//! Each variant's `#[brw(magic(...))]` attribute makes binrw try variants in
//! declaration order, backtracking on mismatch, until one matches octet 0 —
//! the same mechanism the teacher uses for its SMB2 `Header`, generalized
//! here to dispatch whole commands rather than a single header field.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};
use oftp2_dtyp::DtypError;

use crate::auth::{Auch, Aurp};
use crate::endfile::{Efid, Efna, Efpa};
use crate::error::{MsgError, Result};
use crate::greeting::Ssrm;
use crate::response::{Eerp, Nerp};
use crate::session::{Cd, Esid, Secd, Ssid};
use crate::startfile::{Rtr, Sfid, Sfna, Sfpa};
use crate::transfer::{Cdt, Data};

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(return_unexpected_error)]
pub enum Command {
    #[brw(magic(b"I"))]
    Ssrm(Ssrm),
    #[brw(magic(b"X"))]
    Ssid(Ssid),
    #[brw(magic(b"F"))]
    Esid(Esid),
    #[brw(magic(b"J"))]
    Secd(Secd),
    #[brw(magic(b"A"))]
    Auch(Auch),
    #[brw(magic(b"S"))]
    Aurp(Aurp),
    #[brw(magic(b"H"))]
    Sfid(Sfid),
    #[brw(magic(b"2"))]
    Sfpa(Sfpa),
    #[brw(magic(b"3"))]
    Sfna(Sfna),
    #[brw(magic(b"D"))]
    Data(Data),
    #[brw(magic(b"C"))]
    Cdt(Cdt),
    #[brw(magic(b"T"))]
    Efid(Efid),
    #[brw(magic(b"4"))]
    Efpa(Efpa),
    #[brw(magic(b"5"))]
    Efna(Efna),
    #[brw(magic(b"R"))]
    Cd(Cd),
    #[brw(magic(b"E"))]
    Eerp(Eerp),
    #[brw(magic(b"N"))]
    Nerp(Nerp),
    #[brw(magic(b"P"))]
    Rtr(Rtr),
}

impl Command {
    /// The single octet identifying this command on the wire.
    pub fn code(&self) -> u8 {
        match self {
            Command::Ssrm(_) => b'I',
            Command::Ssid(_) => b'X',
            Command::Esid(_) => b'F',
            Command::Secd(_) => b'J',
            Command::Auch(_) => b'A',
            Command::Aurp(_) => b'S',
            Command::Sfid(_) => b'H',
            Command::Sfpa(_) => b'2',
            Command::Sfna(_) => b'3',
            Command::Data(_) => b'D',
            Command::Cdt(_) => b'C',
            Command::Efid(_) => b'T',
            Command::Efpa(_) => b'4',
            Command::Efna(_) => b'5',
            Command::Cd(_) => b'R',
            Command::Eerp(_) => b'E',
            Command::Nerp(_) => b'N',
            Command::Rtr(_) => b'P',
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut Cursor::new(&mut buf))?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        Command::read(&mut cursor).map_err(|err| {
            if matches!(err, binrw::Error::NoVariantMatch { .. }) {
                return MsgError::UnknownCommand(*bytes.first().unwrap_or(&0) as char);
            }
            if let Some(dtyp_err) = err.downcast_ref::<DtypError>() {
                return field_error(dtyp_err.clone());
            }
            MsgError::Codec(err)
        })
    }
}

/// Recovers the structured [`MsgError`] taxonomy from a field codec failure,
/// instead of letting it out as an opaque `binrw::Error` via `Codec`.
fn field_error(err: DtypError) -> MsgError {
    let reason = err.to_string();
    match err {
        DtypError::InvalidYesNo { field, ch } => MsgError::BadEnum {
            field,
            value: ch.to_string(),
        },
        DtypError::InvalidAlphaChar { field, .. }
        | DtypError::TooLong { field, .. }
        | DtypError::NumericOverflow { field, .. }
        | DtypError::InvalidUtf8 { field } => MsgError::FieldParse { field, reason },
        DtypError::InvalidTimestamp => MsgError::FieldParse {
            field: "timestamp",
            reason,
        },
    }
}

impl TryFrom<&[u8]> for Command {
    type Error = MsgError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Command::decode(bytes)
    }
}
