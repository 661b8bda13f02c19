//! GitHub Actions workflow commands.

/// Formats an `::error::` command that annotates the run with `message`.
///
/// Newlines would otherwise end the command, so the data is escaped the way
/// the runner expects.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
