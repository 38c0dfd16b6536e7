//! Run configuration: account credentials and the sender list.
//!
//! Both inputs are read once at startup. Credentials come from the
//! environment (`EMAIL` / `PASSWORD`); the sender list is a small JSON
//! document with a single recognized field, `senders`.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable holding the account address.
pub const EMAIL_VAR: &str = "EMAIL";

/// Environment variable holding the app password.
pub const PASSWORD_VAR: &str = "PASSWORD";

/// Default sender list path, relative to the working directory.
pub const DEFAULT_SENDERS_PATH: &str = "non_priority_senders.json";

/// Account credentials for the mail server.
///
/// The secret is an app-specific password, not the account password.
/// It is never persisted and is redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    /// Account e-mail address.
    pub address: String,
    /// App password used for LOGIN.
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Loads credentials from the `EMAIL` and `PASSWORD` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either variable is absent or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_values(env::var(EMAIL_VAR).ok(), env::var(PASSWORD_VAR).ok())
    }

    /// Builds credentials from optional raw values, validating both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either value is missing or empty.
    pub fn from_values(address: Option<String>, secret: Option<String>) -> Result<Self> {
        let address = address
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{EMAIL_VAR} must be set and non-empty")))?;
        let secret = secret
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{PASSWORD_VAR} must be set and non-empty")))?;
        Ok(Self { address, secret })
    }
}

/// Raw shape of the sender list document. Unknown fields are ignored.
#[derive(Deserialize)]
struct SenderDocument {
    senders: Vec<String>,
}

/// Ordered set of sender addresses to sweep from the inbox.
///
/// Duplicates collapse under case-insensitive comparison; the first
/// occurrence wins and file order is preserved.
#[derive(Debug, Clone, Default)]
pub struct SenderList {
    addresses: Vec<String>,
}

impl SenderList {
    /// Loads the sender list from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is missing or unreadable,
    /// or a parse error if the document is malformed or lacks a
    /// `senders` array of strings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read sender list {}: {e}", path.display()))
        })?;
        let list = Self::from_json(&text)?;
        debug!(
            senders = list.len(),
            path = %path.display(),
            "loaded sender list"
        );
        Ok(list)
    }

    /// Parses a sender list from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the document is malformed or the
    /// `senders` field is absent or not an array of strings.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: SenderDocument = serde_json::from_str(text)?;
        Ok(Self::from_addresses(doc.senders))
    }

    /// Builds a sender list from raw addresses, collapsing
    /// case-insensitive duplicates while preserving order.
    #[must_use]
    pub fn from_addresses(addresses: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let addresses = addresses
            .into_iter()
            .filter(|addr| seen.insert(addr.to_lowercase()))
            .collect();
        Self { addresses }
    }

    /// Returns the configured addresses in file order.
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Number of configured senders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
