//! Scan, group, and delete logic.
//!
//! Everything here operates on the [`MailSession`] capability trait;
//! nothing touches the network directly. Per-message failures are
//! isolated and counted so one bad message never aborts a run.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::SenderList;
use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::mime::decode_header_value;
use crate::session::{MailSession, MessageId};

/// Subject shown when a message has no Subject header.
const NO_SUBJECT: &str = "(no subject)";

/// Subject shown when the header fetch for a message failed.
const UNAVAILABLE_SUBJECT: &str = "(headers unavailable)";

/// One inbox message matched against the sender list.
///
/// `sender` is the configured address that matched, which is also the
/// grouping key for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedMessage {
    /// Server-side identifier, used for deletion.
    pub id: MessageId,
    /// The configured sender address this message matched.
    pub sender: String,
    /// Decoded subject, or a placeholder when unavailable.
    pub subject: String,
}

/// Result of scanning the inbox against the sender list.
#[derive(Debug, Default)]
pub struct Scan {
    /// Matched messages in scan order.
    pub matches: Vec<MatchedMessage>,
    /// Count of isolated per-sender or per-message failures.
    pub warnings: usize,
}

impl Scan {
    /// Groups the matches by configured sender, preserving scan order.
    #[must_use]
    pub fn grouped(&self) -> GroupedSummary {
        GroupedSummary::from_matches(&self.matches)
    }
}

/// Messages of one configured sender, in scan order.
#[derive(Debug, Clone)]
pub struct SenderGroup {
    /// The configured sender address.
    pub sender: String,
    /// Matched messages from that sender.
    pub messages: Vec<MatchedMessage>,
}

/// Matches grouped by sender for display. Insertion order follows the
/// scan; no mutation happens through this type.
#[derive(Debug, Clone, Default)]
pub struct GroupedSummary {
    /// Groups in first-match order.
    pub groups: Vec<SenderGroup>,
}

impl GroupedSummary {
    /// Builds the grouping from a slice of matches.
    #[must_use]
    pub fn from_matches(matches: &[MatchedMessage]) -> Self {
        let mut groups: Vec<SenderGroup> = Vec::new();
        for m in matches {
            match groups.iter_mut().find(|g| g.sender == m.sender) {
                Some(group) => group.messages.push(m.clone()),
                None => groups.push(SenderGroup {
                    sender: m.sender.clone(),
                    messages: vec![m.clone()],
                }),
            }
        }
        Self { groups }
    }

    /// Total number of matched messages across all groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.messages.len()).sum()
    }
}

/// Searches the inbox for messages from each configured sender and
/// fetches enough header data to display them.
///
/// Identifiers are deduplicated across senders, so a message matching
/// two configured addresses is processed once, attributed to the first
/// matching sender. A failed search or header fetch is logged, counted
/// as a warning, and skipped past; a message whose headers could not
/// be fetched stays in the match set with a placeholder subject so it
/// remains eligible for deletion.
///
/// # Errors
///
/// Returns an error only for session-level failures surfaced by the
/// binding as fatal (none are raised by this function itself; search
/// and fetch failures are isolated).
pub fn find_matches<S: MailSession>(session: &mut S, senders: &SenderList) -> Result<Scan> {
    let mut scan = Scan::default();
    let mut seen: HashSet<MessageId> = HashSet::new();

    for sender in senders.addresses() {
        let mut ids = match session.search_from(sender) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(sender = %sender, error = %e, "search failed, skipping sender");
                scan.warnings += 1;
                continue;
            }
        };
        // Mailbox order within one sender.
        ids.sort_unstable();

        let mut found = 0usize;
        for id in ids {
            if !seen.insert(id) {
                debug!(%id, "already matched by an earlier sender");
                continue;
            }

            let subject = match session.fetch_header(id) {
                Ok(raw) => {
                    let headers = Headers::parse(&raw);
                    headers
                        .get("Subject")
                        .map_or_else(|| NO_SUBJECT.to_string(), decode_header_value)
                }
                Err(e) => {
                    warn!(%id, error = %e, "header fetch failed, keeping message");
                    scan.warnings += 1;
                    UNAVAILABLE_SUBJECT.to_string()
                }
            };

            scan.matches.push(MatchedMessage {
                id,
                sender: sender.clone(),
                subject,
            });
            found += 1;
        }
        debug!(sender = %sender, found, "sender scan complete");
    }

    Ok(scan)
}

/// Outcome of the deletion phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteReport {
    /// Messages successfully marked and expunged.
    pub deleted: usize,
    /// Messages whose mark command failed.
    pub failed: usize,
}

/// Marks every matched message as deleted, then expunges once.
///
/// A failed mark is logged and counted but does not stop the loop; the
/// expunge still runs so successfully marked messages are removed.
/// `progress` is invoked after each successful mark with
/// `(marked_so_far, total)`.
///
/// # Errors
///
/// Returns [`Error::Deletion`] if the final expunge fails. The counts
/// achieved before the failure are carried in the error; marks may or
/// may not have taken effect server-side.
pub fn delete_messages<S: MailSession>(
    session: &mut S,
    matches: &[MatchedMessage],
    mut progress: impl FnMut(usize, usize),
) -> Result<DeleteReport> {
    let total = matches.len();
    let mut report = DeleteReport::default();

    for m in matches {
        match session.mark_deleted(m.id) {
            Ok(()) => {
                report.deleted += 1;
                progress(report.deleted, total);
            }
            Err(e) => {
                warn!(id = %m.id, sender = %m.sender, error = %e, "failed to mark message");
                report.failed += 1;
            }
        }
    }

    session.expunge().map_err(|source| Error::Deletion {
        deleted: report.deleted,
        failed: report.failed,
        source,
    })?;

    debug!(deleted = report.deleted, failed = report.failed, "expunge complete");
    Ok(report)
}
