//! Writer error types.

use refit_ast::{AttrError, NodeKind};
use refit_backend::BackendError;

/// Errors raised while rendering nodes.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A handler received an attribute list that cannot form an [`refit_ast::Attr`].
    #[error(transparent)]
    MalformedAttributes(#[from] AttrError),

    /// The format backend failed or is not registered.
    #[error("serialization failed: {0}")]
    Backend(#[from] BackendError),

    /// The table uses cell features the simple table shape cannot carry.
    #[error("table cannot be rendered: {0}")]
    UnsupportedTable(String),

    /// A handler was registered under a kind whose elements it cannot build.
    #[error("handler `{handler}` cannot render a {found} element")]
    ElementMismatch {
        handler: &'static str,
        found: NodeKind,
    },
}
