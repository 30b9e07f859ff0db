//! The transport abstraction a session drives.

use std::io::{Read, Write};

/// A bidirectional octet stream. Framing and command interpretation are the
/// caller's concern (see `oftp2::session`); an implementer only moves bytes.
pub trait Transport: Read + Write {}

impl<T: Read + Write> Transport for T {}
