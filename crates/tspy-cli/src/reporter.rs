//! Colored terminal reporting for the driver.

use colored::Colorize;

/// User-facing progress and error messages. `info` output only appears
/// with `--verbose`; pipeline diagnostics are rendered elsewhere and
/// passed here as plain text.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbose: bool,
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
impl Reporter {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Reporter { verbose }
    }

    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {message}", "info:".cyan().bold());
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {message}", "success:".green().bold());
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "error:".red().bold());
    }
}
