//! Minimal RFC 5322 header block parsing.
//!
//! The scan fetches only the header section of each message; this
//! module folds continuation lines and exposes case-insensitive
//! lookup for the two headers the tool cares about.

use std::collections::HashMap;

/// Parsed header block of one message.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Parses a raw header block.
    ///
    /// Input may be either the full header section terminated by an
    /// empty line or just a run of header lines. Invalid lines are
    /// skipped rather than rejected; a damaged header must not abort
    /// the scan of the rest of the mailbox.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let mut headers = Self::default();
        let mut current_name: Option<String> = None;
        let mut current_value = String::new();

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                // Continuation of the previous header.
                if current_name.is_some() {
                    current_value.push(' ');
                    current_value.push_str(line.trim());
                }
            } else {
                if let Some(name) = current_name.take() {
                    headers.add(&name, current_value.trim());
                    current_value.clear();
                }
                if let Some((name, value)) = line.split_once(':') {
                    current_name = Some(name.trim().to_string());
                    current_value = value.trim().to_string();
                }
            }
        }

        if let Some(name) = current_name {
            headers.add(&name, current_value.trim());
        }

        headers
    }

    fn add(&mut self, name: &str, value: &str) {
        self.headers
            .entry(name.to_lowercase())
            .or_default()
            .push(value.to_string());
    }

    /// Gets the first value for a header, case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }
}
