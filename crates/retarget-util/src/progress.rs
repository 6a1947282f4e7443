//! Cargo-style status lines on stderr.

use std::io::Write;

use console::Style;

fn print_status(style: Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        style.bold().apply_to(label),
    );
}

/// Print an action status line: `    Updating app (app/Retarget.toml)`
///
/// The `label` is right-aligned to 12 columns in bold green.
pub fn status(label: &str, message: &str) {
    print_status(Style::new().green(), label, message);
}

/// Like [`status`] but bold cyan, for informational (non-action) messages.
pub fn status_info(label: &str, message: &str) {
    print_status(Style::new().cyan(), label, message);
}

/// Bold yellow label for drift and fallbacks.
pub fn status_warn(label: &str, message: &str) {
    print_status(Style::new().yellow(), label, message);
}
