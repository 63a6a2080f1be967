//! Backend trait definition.

use refit_ast::DocumentView;

/// Error returned by a backend or the registry.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No backend is registered under the requested name.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// The backend cannot express part of the document.
    #[error("{format} backend cannot render document: {reason}")]
    Unsupported {
        /// Backend name.
        format: String,
        /// What could not be rendered.
        reason: String,
    },
}

impl BackendError {
    pub(crate) fn unsupported(format: &str, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            format: format.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Settings shared by all backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// Render double quotes as `<q>` elements in HTML.
    pub html_q_tags: bool,
    /// Marker used for bullet list items in markdown.
    pub bullet_marker: char,
    /// Class of the container holding collected footnotes.
    pub footnotes_class: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            html_q_tags: false,
            bullet_marker: '-',
            footnotes_class: "footnotes".to_owned(),
        }
    }
}

/// A serializer for one output format.
///
/// Implementors turn a whole document into text. Output always ends with a
/// single line terminator.
pub trait Backend: Send + Sync {
    /// Format name used for lookup and for matching raw content.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Separator placed between consecutive top-level blocks.
    fn block_separator(&self) -> &str {
        "\n"
    }

    /// Whether raw content tagged with `format` is emitted verbatim.
    fn accepts_raw(&self, format: &str) -> bool {
        format == self.name()
    }

    /// Serialize a document.
    fn serialize(
        &self,
        doc: DocumentView<'_>,
        options: &WriterOptions,
    ) -> Result<String, BackendError>;
}
