//! Styled terminal output for the caiconv CLI

use owo_colors::OwoColorize;

/// Print a success message with additional details in dim text
pub fn success_with_details(message: &str, details: &str) {
    println!(
        "{} {} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white(),
        details.truecolor(160, 160, 160)
    );
}

/// Print an error message with a red X
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

/// Print a warning message with a yellow warning symbol
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

/// Print a debug diagnostic, shown only when CAICONV_LOG=debug.
/// Used for skip-level events like unregistered asset types.
pub fn debug(message: &str) {
    if debug_enabled() {
        eprintln!("{} {}", "·".truecolor(160, 160, 160), message.truecolor(160, 160, 160));
    }
}

fn debug_enabled() -> bool {
    std::env::var("CAICONV_LOG").is_ok_and(|v| v.eq_ignore_ascii_case("debug"))
}
