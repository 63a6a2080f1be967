//! Output format resolution.

use std::fmt;

use refit_ast::Meta;
use refit_backend::BASELINE_FORMAT;

/// Document metadata key that selects the output format.
pub const FORMAT_META_KEY: &str = "custom_writer_format";

/// Name of the format every node of one document run is rendered in.
///
/// Resolved once per document. Empty metadata values count as absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFormat(String);

impl OutputFormat {
    /// Pick the format from document metadata, falling back to `default`
    /// and then to the baseline format.
    #[must_use]
    pub fn resolve(meta: &Meta, default: &str) -> Self {
        let name = match meta.get_str(FORMAT_META_KEY) {
            Some(name) if !name.is_empty() => name,
            _ if !default.is_empty() => default,
            _ => BASELINE_FORMAT,
        };
        Self(name.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self(BASELINE_FORMAT.to_owned())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OutputFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
