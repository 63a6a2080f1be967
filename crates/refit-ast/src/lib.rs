//! Document model for the refit writer.
//!
//! A [`Document`] is metadata plus a tree of [`Block`] and [`Inline`] nodes.
//! Nodes are plain values: the writer builds fresh ones for every render
//! call and never mutates a node after construction.
//!
//! The serialized form follows the familiar `{"t": tag, "c": contents}`
//! layout so hosts can hand over trees as JSON.

mod attr;
mod document;
mod node;
mod table;

pub use attr::{Attr, AttrError, AttrList};
pub use document::{Document, DocumentView, Meta, MetaValue};
pub use node::{
    Block, Citation, CitationMode, DefinitionItem, Inline, ListAttributes, ListNumberDelim,
    ListNumberStyle, MathType, NodeKind, QuoteType, Target, stringify,
};
pub use table::{Alignment, Cell, ColSpec, Row, SimpleTable, Table};
