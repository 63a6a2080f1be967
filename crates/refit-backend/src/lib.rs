//! Pluggable document serializers.
//!
//! Every output format is a [`Backend`]: it turns a whole document into text.
//! Backends are looked up by name through a [`BackendRegistry`].
//!
//! # Built-in backends
//!
//! - [`HtmlBackend`] (`html`): HTML5 fragments, the baseline format
//! - [`MarkdownBackend`] (`markdown`): CommonMark with common extensions
//! - [`PlainBackend`] (`plain`): text without markup
//!
//! # Example
//!
//! ```
//! use refit_ast::{Block, DocumentView, Inline, Meta};
//! use refit_backend::{BackendRegistry, WriterOptions};
//!
//! let registry = BackendRegistry::with_defaults();
//! let meta = Meta::new();
//! let blocks = [Block::Para(vec![Inline::str("Hello")])];
//! let html = registry
//!     .serialize(DocumentView::new(&meta, &blocks), "html", &WriterOptions::default())
//!     .unwrap();
//! assert_eq!(html, "<p>Hello</p>\n");
//! ```

mod backend;
mod html;
mod markdown;
mod plain;
mod registry;
mod util;

pub use backend::{Backend, BackendError, WriterOptions};
pub use html::HtmlBackend;
pub use markdown::MarkdownBackend;
pub use plain::PlainBackend;
pub use registry::BackendRegistry;
pub use util::escape_html;

/// Format used when a document does not select one.
pub const BASELINE_FORMAT: &str = "html";
