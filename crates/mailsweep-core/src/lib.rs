//! # mailsweep-core
//!
//! Core logic for the mailsweep inbox cleanup utility.
//!
//! This crate provides:
//! - Configuration loading (credentials from the environment, sender
//!   list from JSON)
//! - The [`MailSession`] capability trait the protocol binding
//!   implements
//! - Inbox scanning, sender grouping, and deletion with
//!   isolate-and-continue failure handling
//! - RFC 2047 header decoding
//!
//! The crate performs no I/O of its own beyond reading the two
//! configuration inputs; all mailbox access goes through
//! [`MailSession`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod headers;
pub mod mime;
pub mod session;
pub mod sweep;

pub use config::{Credentials, SenderList, DEFAULT_SENDERS_PATH};
pub use error::{Error, Result};
pub use session::{MailSession, MessageId, SessionError, SessionResult};
pub use sweep::{
    delete_messages, find_matches, DeleteReport, GroupedSummary, MatchedMessage, Scan, SenderGroup,
};
