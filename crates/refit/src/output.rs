//! Console reporting for the `refit` commands.
//!
//! Diagnostics (warnings about unhandled nodes, errors, where a file was
//! written) go to stderr. Rendered documents and listings go to stdout, so
//! `refit render doc.json > out.html` captures only the document.

use console::{Style, Term};

/// Writes diagnostics to stderr and results to stdout.
pub(crate) struct Output {
    diagnostics: Term,
    results: Term,
    warning: Style,
    failure: Style,
    done: Style,
    emphasis: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            diagnostics: Term::stderr(),
            results: Term::stdout(),
            warning: Style::new().yellow(),
            failure: Style::new().red(),
            done: Style::new().green(),
            emphasis: Style::new().cyan().bold(),
        }
    }

    /// Unstyled diagnostic, shown with `--verbose`.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.diagnostics.write_line(msg);
    }

    /// Reports a written output file.
    pub(crate) fn success(&self, msg: &str) {
        self.diagnostic(&self.done, msg);
    }

    /// Reports a node the writer had to drop.
    pub(crate) fn warning(&self, msg: &str) {
        self.diagnostic(&self.warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.diagnostic(&self.failure, msg);
    }

    /// Result line that stands out, such as the default format in `refit formats`.
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .results
            .write_line(&self.emphasis.apply_to(msg).to_string());
    }

    pub(crate) fn line(&self, msg: &str) {
        let _ = self.results.write_line(msg);
    }

    fn diagnostic(&self, style: &Style, msg: &str) {
        let _ = self.diagnostics.write_line(&style.apply_to(msg).to_string());
    }
}
