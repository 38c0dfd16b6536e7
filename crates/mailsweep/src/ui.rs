//! Interactive output: the grouped summary and the confirmation
//! prompt. Everything here writes to stdout and reads from stdin;
//! nothing touches the mailbox.

use std::io::{self, BufRead, Write};

use mailsweep_core::GroupedSummary;

/// Subjects listed per sender before collapsing into a count.
const MAX_SUBJECTS_SHOWN: usize = 5;

/// Display width a subject is truncated to.
const MAX_SUBJECT_WIDTH: usize = 60;

/// Prints the per-sender summary and a grand total.
pub fn present_summary(grouped: &GroupedSummary) {
    println!(
        "\nFound {} messages from {} non-priority senders:",
        grouped.total(),
        grouped.groups.len()
    );
    println!("{}", "=".repeat(72));

    for group in &grouped.groups {
        println!("\n{} ({} messages):", group.sender, group.messages.len());
        for (i, message) in group.messages.iter().take(MAX_SUBJECTS_SHOWN).enumerate() {
            println!("  {}. {}", i + 1, truncate(&message.subject, MAX_SUBJECT_WIDTH));
        }
        if group.messages.len() > MAX_SUBJECTS_SHOWN {
            println!(
                "  ... and {} more messages",
                group.messages.len() - MAX_SUBJECTS_SHOWN
            );
        }
    }

    println!("\n{}", "=".repeat(72));
}

/// Asks for a yes/no confirmation naming the total count.
///
/// Anything other than `y`/`yes` (including end of input) declines.
///
/// # Errors
///
/// Returns an error if stdin or stdout fails.
pub fn confirm(total: usize) -> io::Result<bool> {
    print!("\nDelete these {total} messages? [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    let read = io::stdin().lock().read_line(&mut answer)?;
    if read == 0 {
        // EOF counts as a decline.
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Truncates to a display width on a character boundary.
fn truncate(subject: &str, width: usize) -> String {
    if subject.chars().count() <= width {
        subject.to_string()
    } else {
        let cut: String = subject.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
