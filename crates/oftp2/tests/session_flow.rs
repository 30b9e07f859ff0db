//! End-to-end exercises of the session driver against an in-memory,
//! script-driven transport, covering the concrete scenarios in
//! SPEC_FULL.md §4.6 and the sub-record packing law in §4.4.

use std::io::{self, Read, Write};

use oftp2::{FileSource, Session, SessionConfig, State};
use oftp2_msg::{Capability, Command, Sfpa, Ssid, Ssrm};
use time::macros::datetime;

struct ScriptedTransport {
    inbound: Vec<u8>,
    pos: usize,
    outbound: Vec<u8>,
}

impl ScriptedTransport {
    fn new(commands: Vec<Command>) -> Self {
        let mut inbound = Vec::new();
        for cmd in commands {
            let payload = cmd.encode().unwrap();
            inbound.extend_from_slice(&oftp2_transport::frame(&payload).unwrap());
        }
        Self {
            inbound,
            pos: 0,
            outbound: Vec::new(),
        }
    }

    fn sent_commands(&self) -> Vec<Command> {
        let mut cursor = io::Cursor::new(&self.outbound);
        let mut out = Vec::new();
        loop {
            match oftp2_transport::unframe(&mut cursor) {
                Ok(payload) => out.push(Command::decode(&payload).unwrap()),
                Err(_) => break,
            }
        }
        out
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.inbound[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.outbound.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct InMemoryFile {
    data: Vec<u8>,
    pos: usize,
}

impl FileSource for InMemoryFile {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn modified(&self) -> time::OffsetDateTime {
        datetime!(2024-03-05 12:00:00 UTC)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

fn peer_ssid() -> Ssid {
    Ssid::new("O0099PARTNER", "SECRET")
        .with_buffer_size(256)
        .with_credit(1)
        .with_capability(Capability::ReceiveOnly)
}

#[test_log::test]
fn start_session_completes_and_matches_non_authenticated_peers() {
    let transport = ScriptedTransport::new(vec![Command::Ssrm(Ssrm::default()), Command::Ssid(peer_ssid())]);
    let mut session = Session::new(transport);
    let config = SessionConfig::new("O0021ME", "LOCALPW");

    let peer = session.start_session(&config).unwrap();
    assert_eq!(peer.id, "O0099PARTNER");
    assert_eq!(session.state(), State::Identified);

    let sent = session
        .transport()
        .sent_commands()
        .into_iter()
        .find_map(|c| match c {
            Command::Ssid(s) => Some(s),
            _ => None,
        })
        .expect("an SSID was sent");
    assert_eq!(sent.id, "O0021ME");
}

#[test]
fn send_file_packs_a_128_octet_payload_into_three_sub_records_over_the_wire() {
    let transport = ScriptedTransport::new(vec![
        Command::Ssrm(Ssrm::default()),
        Command::Ssid(peer_ssid()),
        Command::Sfpa(Sfpa::new(0)),
    ]);
    let mut session = Session::new(transport);
    session
        .start_session(&SessionConfig::new("O0021ME", "LOCALPW"))
        .unwrap();

    let mut file = InMemoryFile {
        data: vec![0xCD; 128],
        pos: 0,
    };
    let sent = session
        .send_file(
            "PAYLOAD1",
            &mut file,
            oftp2_msg::FileFormat::Unstructured,
            "O0099PARTNER",
            "O0021ME",
            0,
            0,
            false,
            0,
            false,
            0,
        )
        .unwrap();
    assert_eq!(sent, 128);
    assert_eq!(session.state(), State::FileEnded);

    let data_payload = match session
        .transport()
        .sent_commands()
        .into_iter()
        .find(|c| matches!(c, Command::Data(_)))
        .unwrap()
    {
        Command::Data(data) => data.payload,
        _ => unreachable!(),
    };
    assert_eq!(data_payload[0], 0x3F);
    assert_eq!(data_payload[64], 0x3F);
    assert_eq!(data_payload[128], 0x82);
}

#[test]
fn end_session_emits_a_terminating_esid() {
    let transport = ScriptedTransport::new(vec![Command::Ssrm(Ssrm::default()), Command::Ssid(peer_ssid())]);
    let mut session = Session::new(transport);
    session
        .start_session(&SessionConfig::new("O0021ME", "LOCALPW"))
        .unwrap();
    session.end_session().unwrap();

    assert_eq!(session.state(), State::Terminated);
    assert!(
        session
            .transport()
            .sent_commands()
            .iter()
            .any(|c| matches!(c, Command::Esid(e) if e.reason.get() == 0))
    );
}
