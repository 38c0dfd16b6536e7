//! Capability interface for the mail server.
//!
//! The scan and delete logic is written against [`MailSession`] so the
//! protocol binding stays swappable and the logic testable without a
//! live server.

use thiserror::Error;

/// Opaque server-side message identifier (IMAP UID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u32);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors surfaced by a mail session binding.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Network or TLS level failure, including timeouts.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected the credentials.
    ///
    /// The message must never contain the secret itself.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A protocol command failed after authentication.
    #[error("Server command failed: {0}")]
    Command(String),
}

/// Result type alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// An open, authenticated mail session with the inbox selected.
///
/// All operations are synchronous and sequential; one session exists
/// per run.
pub trait MailSession {
    /// Searches the selected mailbox for messages whose `From` header
    /// matches the given address.
    ///
    /// Match semantics are server-defined; for IMAP `SEARCH FROM` this
    /// is a case-insensitive substring match, which is the policy this
    /// tool relies on.
    ///
    /// # Errors
    ///
    /// Returns an error if the search command fails.
    fn search_from(&mut self, sender: &str) -> SessionResult<Vec<MessageId>>;

    /// Fetches the raw header block of a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the server returns no
    /// header data for the identifier.
    fn fetch_header(&mut self, id: MessageId) -> SessionResult<Vec<u8>>;

    /// Marks a message as deleted without expunging.
    ///
    /// # Errors
    ///
    /// Returns an error if the store command fails.
    fn mark_deleted(&mut self, id: MessageId) -> SessionResult<()>;

    /// Permanently removes all messages marked as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the expunge fails; marks may or may not
    /// have been applied server-side in that case.
    fn expunge(&mut self) -> SessionResult<()>;

    /// Releases the session (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the logout command fails; callers treat
    /// this as best-effort.
    fn logout(&mut self) -> SessionResult<()>;
}
