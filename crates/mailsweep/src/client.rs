//! IMAP binding for the mail session capability.
//!
//! Binds [`MailSession`] to the `imap` crate over a `native-tls`
//! stream. Gmail only: fixed host and port, implicit TLS, LOGIN with
//! an app password, `INBOX` selected for the whole run.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use native_tls::{TlsConnector, TlsStream};
use tracing::{debug, warn};

use mailsweep_core::{Credentials, MailSession, MessageId, SessionError, SessionResult};

/// Gmail IMAP host.
pub const IMAP_HOST: &str = "imap.gmail.com";

/// Implicit-TLS IMAP port.
pub const IMAP_PORT: u16 = 993;

/// Mailbox swept by this tool.
const MAILBOX: &str = "INBOX";

/// Bound on establishing the TCP connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on any single socket read or write. Expiry surfaces as a
/// connection error rather than blocking the run forever.
const IO_TIMEOUT: Duration = Duration::from_secs(60);

/// An authenticated IMAP session with `INBOX` selected.
///
/// Logs out on drop as a backstop; callers should still call
/// [`MailSession::logout`] explicitly so failures are visible.
pub struct ImapSession {
    session: imap::Session<TlsStream<TcpStream>>,
    logged_out: bool,
}

/// Maps a transport-or-protocol error from an authenticated command.
fn command_error(e: imap::error::Error) -> SessionError {
    match e {
        imap::error::Error::Io(e) => SessionError::Connection(e.to_string()),
        imap::error::Error::ConnectionLost => {
            SessionError::Connection("connection lost".to_string())
        }
        other => SessionError::Command(other.to_string()),
    }
}

/// Opens a TLS connection to Gmail, authenticates, and selects the
/// inbox.
///
/// # Errors
///
/// Returns [`SessionError::Connection`] on network or TLS failure
/// (including timeouts) and [`SessionError::Auth`] when the server
/// rejects the credentials. The secret never appears in either
/// message.
pub fn connect(credentials: &Credentials) -> SessionResult<ImapSession> {
    let addr = (IMAP_HOST, IMAP_PORT)
        .to_socket_addrs()
        .map_err(|e| SessionError::Connection(format!("cannot resolve {IMAP_HOST}: {e}")))?
        .next()
        .ok_or_else(|| SessionError::Connection(format!("no address for {IMAP_HOST}")))?;

    debug!(%addr, "connecting");
    let tcp = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .map_err(|e| SessionError::Connection(e.to_string()))?;
    tcp.set_read_timeout(Some(IO_TIMEOUT))
        .map_err(|e| SessionError::Connection(e.to_string()))?;
    tcp.set_write_timeout(Some(IO_TIMEOUT))
        .map_err(|e| SessionError::Connection(e.to_string()))?;

    let tls = TlsConnector::builder()
        .build()
        .map_err(|e| SessionError::Connection(e.to_string()))?;
    let tls_stream = tls
        .connect(IMAP_HOST, tcp)
        .map_err(|e| SessionError::Connection(format!("TLS handshake failed: {e}")))?;

    let client = imap::Client::new(tls_stream);
    let mut session = client
        .login(&credentials.address, &credentials.secret)
        .map_err(|(e, _)| match e {
            imap::error::Error::Io(e) => SessionError::Connection(e.to_string()),
            other => SessionError::Auth(format!(
                "server rejected login for {}: {other}",
                credentials.address
            )),
        })?;

    session.select(MAILBOX).map_err(command_error)?;
    debug!(mailbox = MAILBOX, "session ready");

    Ok(ImapSession {
        session,
        logged_out: false,
    })
}

impl MailSession for ImapSession {
    fn search_from(&mut self, sender: &str) -> SessionResult<Vec<MessageId>> {
        // Addresses come from config; strip quotes rather than let
        // them corrupt the search atom.
        let sender = sender.replace('"', "");
        let uids = self
            .session
            .uid_search(format!("FROM \"{sender}\""))
            .map_err(command_error)?;
        Ok(uids.into_iter().map(MessageId).collect())
    }

    fn fetch_header(&mut self, id: MessageId) -> SessionResult<Vec<u8>> {
        let fetches = self
            .session
            .uid_fetch(id.to_string(), "(RFC822.HEADER)")
            .map_err(command_error)?;
        fetches
            .iter()
            .find_map(|f| f.header().map(<[u8]>::to_vec))
            .ok_or_else(|| SessionError::Command(format!("no header data for message {id}")))
    }

    fn mark_deleted(&mut self, id: MessageId) -> SessionResult<()> {
        self.session
            .uid_store(id.to_string(), "+FLAGS (\\Deleted)")
            .map(drop)
            .map_err(command_error)
    }

    fn expunge(&mut self) -> SessionResult<()> {
        self.session.expunge().map(drop).map_err(command_error)
    }

    fn logout(&mut self) -> SessionResult<()> {
        if self.logged_out {
            return Ok(());
        }
        self.logged_out = true;
        self.session.logout().map_err(command_error)
    }
}

impl Drop for ImapSession {
    fn drop(&mut self) {
        // Best-effort release so the server-side mailbox lock is not
        // leaked on early-error paths.
        if !self.logged_out {
            if let Err(e) = self.session.logout() {
                warn!(error = %e, "logout on drop failed");
            }
        }
    }
}
