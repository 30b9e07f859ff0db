//! Command codec and message classifier for the OFTP2 Exchange Buffer
//! protocol: one struct per command, plus the [`Command`] sum type that
//! dispatches a framed payload to its parser.

pub mod auth;
pub mod endfile;
pub mod error;
pub mod greeting;
pub mod message;
pub mod reason;
pub mod response;
pub mod session;
pub mod startfile;
pub mod transfer;

pub use error::MsgError;
pub use message::Command;

pub use auth::{Auch, Aurp};
pub use endfile::{Efid, Efna, Efpa};
pub use greeting::Ssrm;
pub use response::{Eerp, Nerp};
pub use session::{Capability, Cd, Esid, Secd, Ssid};
pub use startfile::{FileFormat, Rtr, Sfid, Sfna, Sfpa};
pub use transfer::{Cdt, Data, max_payload, pack_subrecords, unpack_subrecords};
