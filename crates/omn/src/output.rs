//! Colored terminal output on stderr.

use std::fmt::Display;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    label: Style,
    success: Style,
    warning: Style,
    error: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
        }
    }

    /// Print `label: value` with a dimmed label.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.label.apply_to(format!("{label}:"))));
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&self.success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.error, msg);
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
