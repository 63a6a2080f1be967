//! Documents and document metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::Block;

/// Metadata value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    String(String),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

/// Document metadata keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(BTreeMap<String, MetaValue>);

impl Meta {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    /// String value of `key`, if present and a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            MetaValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style variant of [`insert`](Self::insert) for string values.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), MetaValue::String(value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A complete document: metadata plus top-level blocks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub meta: Meta,
    pub blocks: Vec<Block>,
}

impl Document {
    #[must_use]
    pub fn new(meta: Meta, blocks: Vec<Block>) -> Self {
        Self { meta, blocks }
    }

    /// Borrowed view of the document.
    #[must_use]
    pub fn view(&self) -> DocumentView<'_> {
        DocumentView {
            meta: &self.meta,
            blocks: &self.blocks,
        }
    }
}

/// Borrowed document handed to backends.
///
/// Building one is free: it only points at metadata and blocks owned
/// elsewhere.
#[derive(Clone, Copy, Debug)]
pub struct DocumentView<'a> {
    pub meta: &'a Meta,
    pub blocks: &'a [Block],
}

impl<'a> DocumentView<'a> {
    #[must_use]
    pub fn new(meta: &'a Meta, blocks: &'a [Block]) -> Self {
        Self { meta, blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Inline;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_str() {
        let meta = Meta::new().with("custom_writer_format", "markdown");
        assert_eq!(meta.get_str("custom_writer_format"), Some("markdown"));
        assert_eq!(meta.get_str("missing"), None);
    }

    #[test]
    fn test_get_str_ignores_non_strings() {
        let mut meta = Meta::new();
        meta.insert("draft", MetaValue::Bool(true));
        assert_eq!(meta.get_str("draft"), None);
        assert!(meta.get("draft").is_some());
    }

    #[test]
    fn test_document_from_json() {
        let json = r#"{
            "meta": {"custom_writer_format": "plain", "tags": ["a", "b"]},
            "blocks": [{"t": "Para", "c": [{"t": "Str", "c": "hi"}]}]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.meta.get_str("custom_writer_format"), Some("plain"));
        assert_eq!(
            doc.meta.get("tags"),
            Some(&MetaValue::List(vec![
                MetaValue::String("a".to_owned()),
                MetaValue::String("b".to_owned())
            ]))
        );
        assert_eq!(doc.blocks, vec![Block::Para(vec![Inline::str("hi")])]);
    }

    #[test]
    fn test_document_meta_optional() {
        let doc: Document = serde_json::from_str(r#"{"blocks": []}"#).unwrap();
        assert!(doc.meta.is_empty());
        assert!(doc.view().blocks.is_empty());
    }
}
