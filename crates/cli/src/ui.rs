//! Terminal UI helpers for consistent colored output.

use owo_colors::OwoColorize;

/// Print a success message with green checkmark.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message with red X.
fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a hint/suggestion (dimmed, indented).
fn hint(msg: &str) {
    eprintln!("  {} {}", "→".dimmed(), msg.dimmed());
}

/// Format a value as bold (for identities, keys, etc.).
pub fn bold(s: &str) -> String {
    s.bold().to_string()
}

/// Format a value as dimmed (for secondary details).
pub fn dimmed(s: &str) -> String {
    s.dimmed().to_string()
}

/// Display an error with contextual hints based on the error message.
pub fn print_error(err: &anyhow::Error) {
    let msg = err.to_string();
    error(&msg);

    if msg.contains("No namespace") {
        // Already has suggestion in message
    } else if msg.contains("unrecognised window") {
        hint("Windows: today, yesterday, week, month, <n>d (e.g. 7d), YYYYMMDD");
    } else if msg.contains("negative score delta") {
        hint("Negative deltas are disabled. Set RANKING_ALLOW_NEGATIVE_DELTAS=true to allow them.");
    } else if msg.contains("WRONGTYPE") {
        hint("A key in this namespace holds a non sorted-set value.");
    } else if msg.contains("store unavailable")
        || msg.contains("Connection")
        || msg.contains("connection")
        || msg.contains("timed out")
    {
        hint("Check that Redis is running and RANKING_REDIS_URL points at it.");
    }
}
