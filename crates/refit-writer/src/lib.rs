//! Per-node re-targeting document writer.
//!
//! The writer renders a document bottom-up. Each node is rebuilt around its
//! already rendered children, wrapped in a one-node document and serialized by
//! the backend for the document's output format. Footnotes met along the way
//! are numbered in document order and emitted as one block at the end.
//!
//! # Example
//!
//! ```
//! use refit_ast::{Block, Document, Inline, Meta};
//! use refit_backend::BackendRegistry;
//! use refit_writer::{WriterSettings, render_document};
//!
//! let registry = BackendRegistry::with_defaults();
//! let doc = Document::new(
//!     Meta::new(),
//!     vec![Block::Para(vec![
//!         Inline::str("Text"),
//!         Inline::Note(vec![Block::Plain(vec![Inline::str("note")])]),
//!     ])],
//! );
//! let result = render_document(&registry, &doc, &WriterSettings::default()).unwrap();
//! assert_eq!(result.footnotes, 1);
//! assert!(result.output.starts_with(r##"<p>Text<sup><a href="#fn1" id="fnref1">1</a></sup></p>"##));
//! ```

mod dispatch;
mod element;
mod engine;
mod error;
mod footnotes;
mod format;
mod handlers;
mod render;

pub use dispatch::{DispatchTable, Handler};
pub use element::Element;
pub use engine::{Fragment, WriteOptions, Writer, WriterSettings};
pub use error::WriteError;
pub use footnotes::{Footnote, FootnoteCollector};
pub use format::{FORMAT_META_KEY, OutputFormat};
pub use render::{RenderResult, render_document};
