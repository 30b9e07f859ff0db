//! The initiator-side session state machine: capability query, session
//! establishment, authentication, file send, and session end.

use std::io::Write;

use log::{debug, trace, warn};
use oftp2_dtyp::build_odette_id;
use oftp2_msg::{
    Auch, Aurp, Capability, Cd, Cdt, Command, Data, Efid, Esid, FileFormat, Secd, Sfid, Sfpa,
    Ssid, max_payload, pack_subrecords,
};
use oftp2_transport::Transport;

use crate::error::{Error, Result};
use crate::file_source::FileSource;
use crate::config::SessionConfig;

/// Where a session is in the RFC 5024 sequence. Any command arriving
/// outside what a state expects transitions to `Terminated` and fails the
/// call that observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Greeted,
    Identified,
    Authenticated,
    FileStarted,
    Transferring,
    CreditWait,
    FileEnded,
    Terminated,
}

impl State {
    fn label(self) -> &'static str {
        match self {
            State::Disconnected => "Disconnected",
            State::Greeted => "Greeted",
            State::Identified => "Identified",
            State::Authenticated => "Authenticated",
            State::FileStarted => "FileStarted",
            State::Transferring => "Transferring",
            State::CreditWait => "CreditWait",
            State::FileEnded => "FileEnded",
            State::Terminated => "Terminated",
        }
    }
}

/// Fields captured from the peer's `SSID`.
#[derive(Debug, Clone)]
pub struct PeerInfo {
    pub id: String,
    pub buffer_size: u64,
    pub credit: u64,
    pub capability: Capability,
    pub compression: bool,
    pub restart: bool,
    pub special_logic: bool,
    pub authentication: bool,
}

impl PeerInfo {
    fn from_ssid(ssid: &Ssid) -> Self {
        Self {
            id: ssid.id.as_str().to_string(),
            buffer_size: ssid.buffer_size(),
            credit: ssid.credit(),
            capability: ssid.capability,
            compression: bool::from(ssid.compression),
            restart: bool::from(ssid.restart),
            special_logic: bool::from(ssid.special_logic),
            authentication: bool::from(ssid.authentication),
        }
    }
}

/// Result of one capability-query probe connection.
enum Probe {
    Accepted(PeerInfo),
    Rejected { reason: u64, text: String },
}

/// Sends `cmd`, framed, over `transport`.
fn send<T: Transport>(transport: &mut T, cmd: &Command) -> Result<()> {
    let payload = cmd.encode()?;
    let framed = oftp2_transport::frame(&payload)?;
    transport
        .write_all(&framed)
        .map_err(oftp2_transport::TransportError::from)?;
    transport
        .flush()
        .map_err(oftp2_transport::TransportError::from)?;
    Ok(())
}

/// Reads one framed command from `transport`.
fn recv<T: Transport>(transport: &mut T) -> Result<Command> {
    let payload = oftp2_transport::unframe(transport)?;
    Ok(Command::decode(&payload)?)
}

fn unexpected(expected: &'static str, got: &Command, state: &'static str) -> Error {
    Error::UnexpectedMessage {
        expected,
        got: got.code(),
        state,
    }
}

/// Queries a peer's capabilities without establishing a lasting session.
/// Opens the transport twice (per SPEC_FULL.md §4.6.1): once to observe the
/// peer's advertised fields, once more to probe whether it accepts
/// authentication, since the two cannot be learned from a single exchange.
pub fn query_server_capabilities<T, F>(mut connect: F, id: &str, password: &str) -> Result<PeerInfo>
where
    T: Transport,
    F: FnMut() -> std::io::Result<T>,
{
    let mut probe = |auth: bool| -> Result<Probe> {
        let mut transport = connect().map_err(oftp2_transport::TransportError::from)?;
        match recv(&mut transport)? {
            Command::Ssrm(_) => {}
            other => return Err(unexpected("SSRM", &other, "Disconnected")),
        }

        let ssid = Ssid::new(id, password)
            .with_buffer_size(102_400)
            .with_credit(999)
            .with_capability(Capability::SendOnly)
            .with_compression(true)
            .with_restart(true)
            .with_special_logic(true)
            .with_authentication(auth);
        send(&mut transport, &Command::Ssid(ssid))?;

        let outcome = match recv(&mut transport)? {
            Command::Ssid(peer_ssid) => Probe::Accepted(PeerInfo::from_ssid(&peer_ssid)),
            Command::Esid(esid) => Probe::Rejected {
                reason: esid.reason.get(),
                text: esid.reason_label().to_string(),
            },
            other => return Err(unexpected("SSID or ESID", &other, "Identified")),
        };
        send(&mut transport, &Command::Esid(Esid::ok()))?;
        Ok(outcome)
    };

    debug!("querying server capabilities for {id}");
    let mut peer = match probe(false)? {
        Probe::Accepted(peer) => peer,
        Probe::Rejected { reason, text } => {
            return Err(Error::SessionTerminated { reason, text });
        }
    };

    peer.authentication = matches!(probe(true)?, Probe::Accepted(_));
    debug!("peer {} supports authentication: {}", peer.id, peer.authentication);
    Ok(peer)
}

/// A single OFTP2 session bound to one transport stream.
pub struct Session<T: Transport> {
    transport: T,
    state: State,
    local_auth: bool,
    peer: Option<PeerInfo>,
    credits_remaining: u64,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: State::Disconnected,
            local_auth: false,
            peer: None,
            credits_remaining: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn peer(&self) -> Option<&PeerInfo> {
        self.peer.as_ref()
    }

    /// Gives back the underlying stream, e.g. to let the responder take
    /// over as Speaker after a Change Direction.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn fail(&mut self, err: Error) -> Error {
        self.state = State::Terminated;
        err
    }

    fn send(&mut self, cmd: Command) -> Result<()> {
        send(&mut self.transport, &cmd).map_err(|e| self.fail(e))
    }

    fn recv(&mut self) -> Result<Command> {
        recv(&mut self.transport).map_err(|e| self.fail(e))
    }

    fn unexpected(&mut self, expected: &'static str, got: &Command) -> Error {
        let err = unexpected(expected, got, self.state.label());
        self.fail(err)
    }

    /// Consumes the Responder's greeting, opening the session.
    fn expect_greeting(&mut self) -> Result<()> {
        match self.recv()? {
            Command::Ssrm(_) => {
                self.state = State::Greeted;
                Ok(())
            }
            other => Err(self.unexpected("SSRM", &other)),
        }
    }

    /// SPEC_FULL.md §4.6.2: establishes the session, failing on a reason
    /// mismatch in either direction's authentication flag.
    pub fn start_session(&mut self, config: &SessionConfig) -> Result<&PeerInfo> {
        self.expect_greeting()?;

        self.local_auth = config.authentication;
        let ssid = Ssid::new(&config.id, &config.password)
            .with_buffer_size(config.buffer_size)
            .with_credit(config.credit)
            .with_capability(Capability::SendOnly)
            .with_compression(config.compression)
            .with_restart(config.restart)
            .with_special_logic(config.special_logic)
            .with_authentication(config.authentication)
            .with_user_data(config.user_data.clone());
        self.send(Command::Ssid(ssid))?;

        let peer_ssid = match self.recv()? {
            Command::Esid(esid) => {
                return Err(self.fail(Error::SessionTerminated {
                    reason: esid.reason.get(),
                    text: esid.reason_label().to_string(),
                }));
            }
            Command::Ssid(ssid) => ssid,
            other => return Err(self.unexpected("SSID", &other)),
        };

        let peer = PeerInfo::from_ssid(&peer_ssid);
        if peer.authentication != self.local_auth {
            self.send(Command::Esid(Esid::new(1, "authentication mismatch")))
                .ok();
            return Err(self.fail(Error::AuthenticationMismatch {
                local: self.local_auth,
                peer: peer.authentication,
            }));
        }

        self.credits_remaining = peer.credit;
        self.state = State::Identified;
        if peer.authentication {
            self.state = State::Authenticated;
        }
        self.peer = Some(peer);
        trace!("session identified with peer {:?}", self.peer.as_ref().map(|p| &p.id));
        Ok(self.peer.as_ref().unwrap())
    }

    /// SPEC_FULL.md §4.6.3: the responder-facing half of authentication.
    /// Only valid once the peer has confirmed `authentication == true`.
    pub fn answer_challenge(
        &mut self,
        answer: [u8; 20],
        own_challenge: Vec<u8>,
        expected_result: &[u8],
    ) -> Result<()> {
        let peer_auth = self.peer.as_ref().is_some_and(|p| p.authentication);
        if !peer_auth {
            return Err(self.fail(Error::AuthenticationMismatch {
                local: self.local_auth,
                peer: false,
            }));
        }

        self.send(Command::Aurp(Aurp::new(answer)))?;
        match self.recv()? {
            Command::Secd(_) => {}
            Command::Esid(_) => return Err(self.fail(Error::WrongAnswer)),
            other => return Err(self.unexpected("SECD", &other)),
        }

        self.send(Command::Secd(Secd))?;
        self.send(Command::Auch(Auch::new(own_challenge)))?;
        let response = match self.recv()? {
            Command::Aurp(aurp) => aurp.response,
            other => return Err(self.unexpected("AURP", &other)),
        };
        if response.as_slice() != expected_result {
            return Err(self.fail(Error::PeerAuthFailed));
        }

        self.state = State::Authenticated;
        Ok(())
    }

    /// SPEC_FULL.md §4.6.4: sends one Virtual File end to end.
    #[allow(clippy::too_many_arguments)]
    pub fn send_file(
        &mut self,
        dataset_name: &str,
        file: &mut dyn FileSource,
        format: FileFormat,
        destination: &str,
        originator: &str,
        security_level: u64,
        cipher: u64,
        compression: bool,
        envelope: u64,
        signed: bool,
        restart_position: u64,
    ) -> Result<u64> {
        let size = file.len();
        let file_size_in_k = if size == 0 { 0 } else { size.div_ceil(1024).max(1) };

        let sfid = Sfid::new(dataset_name, format)
            .with_file_date_time(file.modified())
            .with_destination(destination)
            .with_originator(originator)
            .with_file_size_in_k(file_size_in_k)
            .with_security_level(security_level)
            .with_cipher(cipher)
            .with_compression(if compression { 1 } else { 0 })
            .with_envelope(envelope)
            .with_signing_required(signed)
            .with_restart_position(restart_position);
        self.send(Command::Sfid(sfid.clone()))?;

        match self.recv()? {
            Command::Sfna(sfna) => {
                return Err(self.fail(Error::PeerRejected {
                    reason: sfna.reason.get(),
                    text: sfna.reason_text().to_string(),
                }));
            }
            Command::Sfpa(sfpa) => {
                if sfpa.answer_count.get() > sfid.restart_position.get() {
                    return Err(self.fail(Error::RestartMismatch {
                        answer_count: sfpa.answer_count.get(),
                        restart_position: sfid.restart_position.get(),
                    }));
                }
            }
            other => return Err(self.unexpected("SFPA", &other)),
        }
        self.state = State::FileStarted;

        let peer_credit = self.peer.as_ref().map(|p| p.credit).unwrap_or(1).max(1);
        let peer_buffer_size = self.peer.as_ref().map(|p| p.buffer_size).unwrap_or(1024);
        self.credits_remaining = peer_credit;
        let payload_limit = max_payload(peer_buffer_size).max(1);

        let mut total_sent = 0u64;
        let mut chunk = vec![0u8; payload_limit];
        self.state = State::Transferring;
        loop {
            let read = file.read(&mut chunk).map_err(oftp2_transport::TransportError::from)?;
            if read == 0 {
                break;
            }
            let last = read < payload_limit;
            let packed = pack_subrecords(&chunk[..read], last);
            self.send(Command::Data(Data::new(packed)))?;
            total_sent += read as u64;

            self.credits_remaining -= 1;
            if last {
                break;
            }
            if self.credits_remaining == 0 {
                self.state = State::CreditWait;
                match self.recv()? {
                    Command::Cdt(_) => {}
                    other => return Err(self.unexpected("CDT", &other)),
                }
                self.credits_remaining = peer_credit;
                self.state = State::Transferring;
            }
        }

        // RecordCount stays 0 regardless of format; F/V record-boundary
        // tracking is out of scope.
        let mut efid = Efid::new();
        efid.unit_count = oftp2_dtyp::NumericField::new(total_sent);
        self.send(Command::Efid(efid))?;
        self.state = State::FileEnded;

        // TODO: wait for EFPA/EFNA here once a caller needs a guaranteed
        // end-to-end acknowledgement instead of a fire-and-forget end.
        warn!("send_file returned without awaiting EFPA/EFNA for {dataset_name:?}");
        Ok(total_sent)
    }

    /// SPEC_FULL.md §4.6.5: terminates the session without waiting for ACK.
    pub fn end_session(&mut self) -> Result<()> {
        self.send(Command::Esid(Esid::ok()))?;
        self.state = State::Terminated;
        Ok(())
    }

    /// Issues a Change Direction, letting the peer become Speaker.
    pub fn change_direction(&mut self) -> Result<()> {
        self.send(Command::Cd(Cd))
    }

    /// Constructs this session's own ODETTE ID for use in `SessionConfig`.
    pub fn odette_id(international_code: u16, org_code: &str, sub_address: &str) -> String {
        build_odette_id(international_code, org_code, sub_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oftp2_msg::Ssrm;
    use std::io::{self, Read};
    use time::macros::datetime;

    struct MockFile {
        data: Vec<u8>,
        pos: usize,
    }

    impl FileSource for MockFile {
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

    struct MockTransport {
        inbound: Vec<u8>,
        pos: usize,
        pub outbound: Vec<u8>,
    }

    impl MockTransport {
        fn with_script(commands: Vec<Command>) -> Self {
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
    }

    impl Read for MockTransport {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = &self.inbound[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for MockTransport {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.outbound.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn accepting_peer_ssid() -> Ssid {
        Ssid::new("O0021PARTNER", "SECRET")
            .with_buffer_size(256)
            .with_credit(2)
            .with_capability(Capability::ReceiveOnly)
    }

    #[test]
    fn start_session_identifies_on_matching_auth() {
        let transport = MockTransport::with_script(vec![
            Command::Ssrm(Ssrm::default()),
            Command::Ssid(accepting_peer_ssid()),
        ]);
        let mut session = Session::new(transport);
        let config = SessionConfig::new("O0021ME", "LOCALPW");
        let peer = session.start_session(&config).unwrap();
        assert_eq!(peer.id, "O0021PARTNER");
        assert_eq!(session.state(), State::Identified);
    }

    #[test]
    fn start_session_fails_on_auth_mismatch() {
        let transport = MockTransport::with_script(vec![
            Command::Ssrm(Ssrm::default()),
            Command::Ssid(accepting_peer_ssid().with_authentication(true)),
        ]);
        let mut session = Session::new(transport);
        let config = SessionConfig::new("O0021ME", "LOCALPW");
        let err = session.start_session(&config).unwrap_err();
        assert!(matches!(err, Error::AuthenticationMismatch { .. }));
        assert_eq!(session.state(), State::Terminated);
    }

    #[test]
    fn start_session_fails_on_esid() {
        let transport = MockTransport::with_script(vec![
            Command::Ssrm(Ssrm::default()),
            Command::Esid(Esid::new(2, "bad password")),
        ]);
        let mut session = Session::new(transport);
        let config = SessionConfig::new("O0021ME", "WRONG");
        let err = session.start_session(&config).unwrap_err();
        assert!(matches!(err, Error::SessionTerminated { reason: 2, .. }));
    }

    #[test]
    fn send_file_packs_credit_bound_data_and_ends_the_file() {
        let peer_ssid = accepting_peer_ssid();
        let transport = MockTransport::with_script(vec![
            Command::Ssrm(Ssrm::default()),
            Command::Ssid(peer_ssid),
            Command::Sfpa(Sfpa::new(0)),
            Command::Cdt(Cdt::default()),
        ]);
        let mut session = Session::new(transport);
        let config = SessionConfig::new("O0021ME", "LOCALPW");
        session.start_session(&config).unwrap();

        let max = max_payload(256);
        let mut file = MockFile {
            data: vec![0xAB; max * 2 + 5],
            pos: 0,
        };
        let sent = session
            .send_file(
                "DATASET1",
                &mut file,
                FileFormat::Unstructured,
                "O0099DEST",
                "O0021ME",
                0,
                0,
                false,
                0,
                false,
                0,
            )
            .unwrap();
        assert_eq!(sent, (max * 2 + 5) as u64);
        assert_eq!(session.state(), State::FileEnded);
    }

    #[test]
    fn query_server_capabilities_merges_both_probe_connections() {
        let connections = vec![
            MockTransport::with_script(vec![
                Command::Ssrm(Ssrm::default()),
                Command::Ssid(accepting_peer_ssid()),
            ]),
            MockTransport::with_script(vec![
                Command::Ssrm(Ssrm::default()),
                Command::Ssid(accepting_peer_ssid().with_authentication(true)),
            ]),
        ];
        let mut connections = connections.into_iter();
        let peer = query_server_capabilities(
            move || Ok(connections.next().expect("only two probes are made")),
            "O0021ME",
            "LOCALPW",
        )
        .unwrap();

        assert_eq!(peer.id, "O0021PARTNER");
        assert!(peer.authentication, "second probe advertised auth support");
    }

    #[test]
    fn query_server_capabilities_surfaces_a_rejection_from_the_first_probe() {
        let connections = vec![MockTransport::with_script(vec![
            Command::Ssrm(Ssrm::default()),
            Command::Esid(Esid::new(2, "bad password")),
        ])];
        let mut connections = connections.into_iter();
        let err = query_server_capabilities(
            move || Ok(connections.next().expect("only one probe should run")),
            "O0021ME",
            "WRONG",
        )
        .unwrap_err();
        assert!(matches!(err, Error::SessionTerminated { reason: 2, .. }));
    }

    #[test]
    fn end_session_sends_esid_and_terminates() {
        let transport = MockTransport::with_script(vec![
            Command::Ssrm(Ssrm::default()),
            Command::Ssid(accepting_peer_ssid()),
        ]);
        let mut session = Session::new(transport);
        session.start_session(&SessionConfig::new("O0021ME", "LOCALPW")).unwrap();
        session.end_session().unwrap();
        assert_eq!(session.state(), State::Terminated);
    }
}
