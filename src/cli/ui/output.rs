use console::style;

/// Status lines for the terminal. Reports go to stdout; everything here
/// goes to stderr so piped output stays clean.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn header(&self, message: &str) {
        if !self.quiet {
            eprintln!("\n{}", style(message).bold().underlined());
        }
    }

    /// Aligned `key: value` line
    pub fn field(&self, key: &str, value: &str) {
        if !self.quiet {
            eprintln!("  {:<12} {}", style(format!("{}:", key)).dim(), value);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
