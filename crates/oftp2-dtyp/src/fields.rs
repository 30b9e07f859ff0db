//! Fixed-width field primitives shared by every OFTP2 command.
//!
//! Each type implements [`BinRead`]/[`BinWrite`] the way `smb-dtyp::Boolean`
//! does: a small wrapper around a primitive value, with the wire width
//! carried through `Args` rather than baked into the type.

use std::io::{Read, Seek, Write};

use binrw::{BinRead, BinWrite, Endian};
use log::warn;

use crate::error::DtypError;

fn custom_err(pos: u64, err: DtypError) -> binrw::Error {
    binrw::Error::Custom {
        pos,
        err: Box::new(err),
    }
}

const ALPHA_CHARSET_EXTRA: &[char] = &['/', '-', '.', '&', '(', ')', ' '];

fn is_alpha_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase() || ALPHA_CHARSET_EXTRA.contains(&c)
}

/// `X(n)` alphanumeric field: ASCII, space-padded right, left-justified.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlphaField(pub String);

impl AlphaField {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AlphaField {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl BinRead for AlphaField {
    type Args<'a> = (usize,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _: Endian,
        (width,): Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let pos = reader.stream_position()?;
        let mut buf = vec![0u8; width];
        reader.read_exact(&mut buf)?;
        let s = String::from_utf8(buf).map_err(|_| {
            custom_err(
                pos,
                DtypError::InvalidUtf8 {
                    field: "alpha-field",
                },
            )
        })?;
        Ok(AlphaField(s.trim_end_matches(' ').to_string()))
    }
}

impl BinWrite for AlphaField {
    type Args<'a> = (usize,);

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _: Endian,
        (width,): Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        let pos = writer.stream_position()?;
        if self.0.len() > width {
            return Err(custom_err(
                pos,
                DtypError::TooLong {
                    field: "alpha-field",
                    value: self.0.clone(),
                    width,
                },
            ));
        }
        if let Some(ch) = self.0.chars().find(|c| !is_alpha_char(*c)) {
            return Err(custom_err(
                pos,
                DtypError::InvalidAlphaChar {
                    field: "alpha-field",
                    ch,
                },
            ));
        }
        let mut padded = self.0.clone();
        padded.push_str(&" ".repeat(width - self.0.len()));
        Ok(writer.write_all(padded.as_bytes())?)
    }
}

/// `9(n)` numeric field: ASCII decimal digits, zero-padded left.
///
/// Parsing is lenient: a non-digit octet is treated as the zero value,
/// matching the reference client's implicit behavior, but a warning is
/// logged so the fallback is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericField(pub u64);

impl NumericField {
    pub fn new(v: u64) -> Self {
        Self(v)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NumericField {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl BinRead for NumericField {
    type Args<'a> = (usize,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _: Endian,
        (width,): Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let mut buf = vec![0u8; width];
        reader.read_exact(&mut buf)?;
        let s = String::from_utf8_lossy(&buf);
        if let Ok(v) = s.parse::<u64>() {
            Ok(NumericField(v))
        } else {
            warn!("non-digit octet in numeric field {s:?}; treating as 0 for interop");
            Ok(NumericField(0))
        }
    }
}

impl BinWrite for NumericField {
    type Args<'a> = (usize,);

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _: Endian,
        (width,): Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        let pos = writer.stream_position()?;
        let s = self.0.to_string();
        if s.len() > width {
            return Err(custom_err(
                pos,
                DtypError::NumericOverflow {
                    field: "numeric-field",
                    width,
                },
            ));
        }
        let padded = format!("{:0>width$}", s, width = width);
        Ok(writer.write_all(padded.as_bytes())?)
    }
}

/// `T(n)` UTF-8 text field: space-padded right in octets, not codepoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Utf8Field(pub String);

impl Utf8Field {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Utf8Field {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl BinRead for Utf8Field {
    type Args<'a> = (usize,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _: Endian,
        (width,): Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let pos = reader.stream_position()?;
        let mut buf = vec![0u8; width];
        reader.read_exact(&mut buf)?;
        let s = std::str::from_utf8(&buf)
            .map_err(|_| custom_err(pos, DtypError::InvalidUtf8 { field: "utf8-field" }))?;
        Ok(Utf8Field(s.trim_end_matches(' ').to_string()))
    }
}

impl BinWrite for Utf8Field {
    type Args<'a> = (usize,);

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _: Endian,
        (width,): Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        let pos = writer.stream_position()?;
        let bytes = self.0.as_bytes();
        if bytes.len() > width {
            return Err(custom_err(
                pos,
                DtypError::TooLong {
                    field: "utf8-field",
                    value: self.0.clone(),
                    width,
                },
            ));
        }
        writer.write_all(bytes)?;
        Ok(writer.write_all(&vec![b' '; width - bytes.len()])?)
    }
}

/// `F X(1)` Y/N boolean field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YesNo(pub bool);

impl From<bool> for YesNo {
    fn from(v: bool) -> Self {
        Self(v)
    }
}

impl From<YesNo> for bool {
    fn from(v: YesNo) -> Self {
        v.0
    }
}

impl BinRead for YesNo {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let pos = reader.stream_position()?;
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        match buf[0] {
            b'Y' => Ok(YesNo(true)),
            b'N' => Ok(YesNo(false)),
            other => Err(custom_err(
                pos,
                DtypError::InvalidYesNo {
                    field: "yes-no",
                    ch: other as char,
                },
            )),
        }
    }
}

impl BinWrite for YesNo {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        Ok(writer.write_all(&[if self.0 { b'Y' } else { b'N' }])?)
    }
}

/// Carriage return octet terminating several commands. Writes `0x0D`;
/// accepts `0x0D` or `0x8D` on read (see SPEC_FULL.md §6.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cr;

impl BinRead for Cr {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let pos = reader.stream_position()?;
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        match buf[0] {
            0x0D | 0x8D => Ok(Cr),
            other => Err(binrw::Error::AssertFail {
                pos,
                message: format!("expected CR octet (0x0D/0x8D), got {other:#04x}"),
            }),
        }
    }
}

impl BinWrite for Cr {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        Ok(writer.write_all(&[0x0D])?)
    }
}
