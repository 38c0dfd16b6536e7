//! mailsweep - delete inbox messages from non-priority senders.
//!
//! Reads `EMAIL`/`PASSWORD` from the environment (a `.env` file is
//! honored), loads the sender list from `non_priority_senders.json`
//! (or a path given as the single positional argument), scans the
//! Gmail inbox over IMAP, and deletes the matched messages after an
//! interactive confirmation.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod ui;

use std::env;
use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailsweep_core::{
    delete_messages, find_matches, Credentials, Error, MailSession, Result, SenderList,
    DEFAULT_SENDERS_PATH,
};

/// Progress line cadence during deletion.
const PROGRESS_EVERY: usize = 10;

fn main() -> ExitCode {
    // Log to stderr so stdout stays clean for the summary and prompt.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsweep=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Missing .env is fine; the variables may come from the shell.
    dotenvy::dotenv().ok();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Error::Deletion { deleted, failed, .. } = &e {
                eprintln!(
                    "Partially completed: {deleted} messages were marked for deletion \
                     ({failed} failed) but the expunge did not complete; \
                     server-side state is indeterminate."
                );
            }
            exit_code(&e)
        }
    }
}

/// Maps the error taxonomy to exit codes: configuration failures are
/// `2`, everything else fatal is `1`.
fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::Config(_) | Error::Io(_) | Error::SenderList(_) => ExitCode::from(2),
        Error::Session(_) | Error::Deletion { .. } => ExitCode::FAILURE,
    }
}

fn run() -> Result<()> {
    // Configuration first; no network contact on configuration errors.
    let senders_path =
        env::args().nth(1).unwrap_or_else(|| DEFAULT_SENDERS_PATH.to_string());
    let credentials = Credentials::from_env()?;
    let senders = SenderList::load(&senders_path)?;
    println!(
        "Loaded {} non-priority senders from {senders_path}",
        senders.len()
    );

    println!("Connecting to {}...", client::IMAP_HOST);
    let mut session = client::connect(&credentials)?;
    info!(account = %credentials.address, "connected");

    let outcome = sweep(&mut session, &senders);

    // Release the session on every exit path.
    if let Err(e) = session.logout() {
        warn!(error = %e, "logout failed");
    }

    outcome
}

/// Scan, summarize, confirm, delete.
fn sweep<S: MailSession>(session: &mut S, senders: &SenderList) -> Result<()> {
    println!("Searching for messages from {} senders...", senders.len());
    let scan = find_matches(session, senders)?;

    if scan.matches.is_empty() {
        println!("No messages from non-priority senders. Nothing changed.");
        return Ok(());
    }

    ui::present_summary(&scan.grouped());
    if scan.warnings > 0 {
        println!(
            "({} warnings during scan; affected messages are listed with \
             placeholder subjects and remain selected for deletion)",
            scan.warnings
        );
    }

    if !ui::confirm(scan.matches.len())? {
        println!("Deletion cancelled. Nothing changed.");
        return Ok(());
    }

    println!("Deleting {} messages...", scan.matches.len());
    let report = delete_messages(session, &scan.matches, |done, total| {
        if done % PROGRESS_EVERY == 0 {
            println!("  marked {done}/{total} messages...");
        }
    })?;

    if report.failed == 0 {
        println!("Fully completed: deleted {} messages.", report.deleted);
    } else {
        println!(
            "Partially completed: deleted {}, failed to delete {}.",
            report.deleted, report.failed
        );
    }
    Ok(())
}
