//! Integration tests for the scan and delete logic.
//!
//! These tests use a mock session that simulates mailbox state
//! without requiring a real server connection.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use mailsweep_core::{
    delete_messages, find_matches, Error, MailSession, MessageId, SenderList, SessionError,
    SessionResult,
};

/// One message in the simulated mailbox.
struct MockMessage {
    uid: u32,
    from: String,
    raw_header: Vec<u8>,
}

impl MockMessage {
    fn new(uid: u32, from: &str, subject: &str) -> Self {
        Self {
            uid,
            from: from.to_string(),
            raw_header: format!("From: {from}\r\nSubject: {subject}\r\n\r\n").into_bytes(),
        }
    }
}

/// Mock session over a fixed mailbox snapshot.
///
/// Search follows IMAP `SEARCH FROM` semantics: case-insensitive
/// substring match on the From header.
#[derive(Default)]
struct MockSession {
    messages: Vec<MockMessage>,
    fetch_failures: HashSet<u32>,
    store_failures: HashSet<u32>,
    fail_expunge: bool,
    fail_search_for: Option<String>,
    marked: Vec<u32>,
    expunged: bool,
    logged_out: bool,
}

impl MockSession {
    fn with_messages(messages: Vec<MockMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

impl MailSession for MockSession {
    fn search_from(&mut self, sender: &str) -> SessionResult<Vec<MessageId>> {
        if self.fail_search_for.as_deref() == Some(sender) {
            return Err(SessionError::Command("SEARCH refused".to_string()));
        }
        let needle = sender.to_lowercase();
        Ok(self
            .messages
            .iter()
            .filter(|m| m.from.to_lowercase().contains(&needle))
            .map(|m| MessageId(m.uid))
            .collect())
    }

    fn fetch_header(&mut self, id: MessageId) -> SessionResult<Vec<u8>> {
        if self.fetch_failures.contains(&id.0) {
            return Err(SessionError::Command("FETCH failed".to_string()));
        }
        self.messages
            .iter()
            .find(|m| m.uid == id.0)
            .map(|m| m.raw_header.clone())
            .ok_or_else(|| SessionError::Command(format!("no such message: {id}")))
    }

    fn mark_deleted(&mut self, id: MessageId) -> SessionResult<()> {
        if self.store_failures.contains(&id.0) {
            return Err(SessionError::Command("STORE failed".to_string()));
        }
        self.marked.push(id.0);
        Ok(())
    }

    fn expunge(&mut self) -> SessionResult<()> {
        if self.fail_expunge {
            return Err(SessionError::Command("EXPUNGE failed".to_string()));
        }
        self.expunged = true;
        Ok(())
    }

    fn logout(&mut self) -> SessionResult<()> {
        self.logged_out = true;
        Ok(())
    }
}

fn medium_inbox() -> Vec<MockMessage> {
    vec![
        MockMessage::new(11, "noreply@medium.com", "Daily digest"),
        MockMessage::new(12, "friend@example.com", "Lunch?"),
        MockMessage::new(13, "noreply@medium.com", "Weekly roundup"),
        MockMessage::new(14, "boss@example.com", "Q3 report"),
        MockMessage::new(15, "noreply@medium.com", "Stories for you"),
    ]
}

fn senders(addrs: &[&str]) -> SenderList {
    SenderList::from_addresses(addrs.iter().map(ToString::to_string).collect())
}

#[test]
fn matches_exactly_the_configured_senders() {
    let mut session = MockSession::with_messages(medium_inbox());
    let scan = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();

    let matched: Vec<u32> = scan.matches.iter().map(|m| m.id.0).collect();
    assert_eq!(matched, vec![11, 13, 15]);
    assert_eq!(scan.warnings, 0);

    let grouped = scan.grouped();
    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(grouped.groups[0].sender, "noreply@medium.com");
    assert_eq!(grouped.groups[0].messages.len(), 3);
    assert_eq!(grouped.total(), 3);
}

#[test]
fn scan_alone_mutates_nothing() {
    let mut session = MockSession::with_messages(medium_inbox());
    let first = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();
    let second = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();

    // Idempotent while the mailbox is unchanged.
    assert_eq!(first.matches, second.matches);
    assert!(session.marked.is_empty());
    assert!(!session.expunged);
}

#[test]
fn confirm_path_deletes_exactly_the_matches() {
    let mut session = MockSession::with_messages(medium_inbox());
    let scan = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();

    let report = delete_messages(&mut session, &scan.matches, |_, _| {}).unwrap();
    assert_eq!(report.deleted, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(session.marked, vec![11, 13, 15]);
    assert!(session.expunged);
}

#[test]
fn search_is_case_insensitive() {
    let mut session = MockSession::with_messages(medium_inbox());
    let scan = find_matches(&mut session, &senders(&["NoReply@Medium.COM"])).unwrap();
    assert_eq!(scan.matches.len(), 3);
}

#[test]
fn message_matching_two_senders_is_processed_once() {
    let mut session = MockSession::with_messages(vec![
        MockMessage::new(1, "news@shop.com (via promo@ads.com)", "Sale"),
        MockMessage::new(2, "promo@ads.com", "Deals"),
    ]);
    let scan = find_matches(&mut session, &senders(&["news@shop.com", "promo@ads.com"])).unwrap();

    let matched: Vec<u32> = scan.matches.iter().map(|m| m.id.0).collect();
    assert_eq!(matched, vec![1, 2]);
    // Attributed to the first matching sender.
    assert_eq!(scan.matches[0].sender, "news@shop.com");

    let report = delete_messages(&mut session, &scan.matches, |_, _| {}).unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(session.marked, vec![1, 2]);
}

#[test]
fn fetch_failure_keeps_message_eligible_for_deletion() {
    let mut inbox = medium_inbox();
    inbox.push(MockMessage::new(16, "noreply@medium.com", "Broken"));
    inbox.push(MockMessage::new(17, "noreply@medium.com", "Fine"));
    let mut session = MockSession::with_messages(inbox);
    session.fetch_failures.insert(13);

    let scan = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();
    assert_eq!(scan.matches.len(), 5);
    assert_eq!(scan.warnings, 1);
    let broken = scan.matches.iter().find(|m| m.id.0 == 13).unwrap();
    assert_eq!(broken.subject, "(headers unavailable)");

    let report = delete_messages(&mut session, &scan.matches, |_, _| {}).unwrap();
    assert_eq!(report.deleted, 5);
    assert_eq!(report.failed, 0);
}

#[test]
fn encoded_subject_is_decoded_during_scan() {
    let mut session = MockSession::with_messages(vec![MockMessage::new(
        1,
        "news@shop.com",
        "=?utf-8?B?U29sZGVzIGQnw6l0w6k=?=",
    )]);
    let scan = find_matches(&mut session, &senders(&["news@shop.com"])).unwrap();
    assert_eq!(scan.matches[0].subject, "Soldes d'été");
}

#[test]
fn missing_subject_gets_placeholder() {
    let mut session = MockSession::with_messages(vec![MockMessage {
        uid: 1,
        from: "news@shop.com".to_string(),
        raw_header: b"From: news@shop.com\r\n\r\n".to_vec(),
    }]);
    let scan = find_matches(&mut session, &senders(&["news@shop.com"])).unwrap();
    assert_eq!(scan.matches[0].subject, "(no subject)");
}

#[test]
fn search_failure_for_one_sender_is_isolated() {
    let mut session = MockSession::with_messages(medium_inbox());
    session.fail_search_for = Some("broken@x.com".to_string());

    let scan =
        find_matches(&mut session, &senders(&["broken@x.com", "noreply@medium.com"])).unwrap();
    assert_eq!(scan.warnings, 1);
    assert_eq!(scan.matches.len(), 3);
}

#[test]
fn failed_mark_is_skipped_and_expunge_still_runs() {
    let mut session = MockSession::with_messages(medium_inbox());
    session.store_failures.insert(13);

    let scan = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();
    let report = delete_messages(&mut session, &scan.matches, |_, _| {}).unwrap();

    assert_eq!(report.deleted, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(session.marked, vec![11, 15]);
    assert!(session.expunged);
}

#[test]
fn expunge_failure_carries_counts() {
    let mut session = MockSession::with_messages(medium_inbox());
    session.fail_expunge = true;

    let scan = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();
    let err = delete_messages(&mut session, &scan.matches, |_, _| {}).unwrap_err();

    match err {
        Error::Deletion { deleted, failed, .. } => {
            assert_eq!(deleted, 3);
            assert_eq!(failed, 0);
        }
        other => panic!("expected Deletion error, got {other}"),
    }
}

#[test]
fn progress_reports_each_successful_mark() {
    let mut session = MockSession::with_messages(medium_inbox());
    let scan = find_matches(&mut session, &senders(&["noreply@medium.com"])).unwrap();

    let mut calls = Vec::new();
    delete_messages(&mut session, &scan.matches, |done, total| {
        calls.push((done, total));
    })
    .unwrap();
    assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Case-insensitive dedup keeps the first occurrence and never
        /// drops a distinct address.
        #[test]
        fn sender_list_dedup_invariants(addrs in proptest::collection::vec("[a-zA-Z@.]{1,12}", 0..20)) {
            let list = SenderList::from_addresses(addrs.clone());

            let mut seen = HashSet::new();
            for addr in list.addresses() {
                prop_assert!(seen.insert(addr.to_lowercase()), "duplicate survived: {addr}");
            }

            let distinct: HashSet<String> = addrs.iter().map(|a| a.to_lowercase()).collect();
            prop_assert_eq!(list.len(), distinct.len());
        }
    }
}
