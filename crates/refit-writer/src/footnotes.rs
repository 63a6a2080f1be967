//! Footnote collection across one document render.
//!
//! Footnote bodies are rendered where they occur but emitted only once, at the
//! end of the document. The collector keeps them in registration order; the
//! writer turns each into a numbered marker now and a list entry later.

use refit_ast::{Attr, Block, Inline, Target};

/// One registered footnote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footnote {
    index: usize,
    content: String,
}

impl Footnote {
    pub(crate) fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }

    /// 1-based position in registration order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Body already rendered in the output format.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Identifier of the entry in the end-of-document list.
    #[must_use]
    pub fn anchor_id(&self) -> String {
        format!("fn{}", self.index)
    }

    /// Identifier of the in-text marker.
    #[must_use]
    pub fn backref_id(&self) -> String {
        format!("fnref{}", self.index)
    }

    /// Superscripted link from the text to the entry.
    pub(crate) fn marker(&self) -> Inline {
        Inline::Superscript(vec![Inline::Link {
            attr: Attr::with_id(self.backref_id()),
            content: vec![Inline::str(self.index.to_string())],
            target: Target::new(format!("#{}", self.anchor_id()), ""),
        }])
    }

    /// List item holding the body, linked back to the marker.
    pub(crate) fn entry(&self, format: &str) -> Vec<Block> {
        vec![Block::Plain(vec![Inline::Link {
            attr: Attr::with_id(self.anchor_id()),
            content: vec![Inline::raw(format, self.content.clone())],
            target: Target::new(format!("#{}", self.backref_id()), ""),
        }])]
    }
}

/// Ordered footnote bodies of the document being rendered.
#[derive(Clone, Debug, Default)]
pub struct FootnoteCollector {
    notes: Vec<Footnote>,
}

impl FootnoteCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next registered footnote will get.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.notes.len() + 1
    }

    pub(crate) fn push(&mut self, note: Footnote) {
        debug_assert_eq!(note.index, self.next_index());
        self.notes.push(note);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Footnote> {
        self.notes.iter()
    }

    /// Remove and return every footnote, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Footnote> {
        std::mem::take(&mut self.notes)
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}
