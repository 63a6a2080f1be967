//! Node kind to handler lookup.

use std::collections::HashMap;

use refit_ast::NodeKind;

use crate::element::Element;
use crate::engine::Writer;
use crate::error::WriteError;
use crate::handlers;

/// Renders one element. Handlers may register footnotes on the writer.
pub type Handler = fn(&mut Writer<'_>, Element) -> Result<String, WriteError>;

/// Handlers keyed by node kind.
///
/// Kinds without a handler are not an error: the writer logs a warning and
/// renders them as empty text.
#[derive(Clone, Debug, Default)]
pub struct DispatchTable {
    handlers: HashMap<NodeKind, Handler>,
}

impl DispatchTable {
    /// Create a table with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with a handler for every node kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        for kind in [
            NodeKind::Plain,
            NodeKind::Para,
            NodeKind::BlockQuote,
            NodeKind::Emph,
            NodeKind::Strong,
            NodeKind::Subscript,
            NodeKind::Superscript,
            NodeKind::SmallCaps,
            NodeKind::Strikeout,
        ] {
            table.register(kind, handlers::wrap_content);
        }

        table.register(NodeKind::Document, handlers::document);
        table.register(NodeKind::LineBlock, handlers::line_block);
        table.register(NodeKind::CodeBlock, handlers::code_block);
        table.register(NodeKind::RawBlock, handlers::raw_block);
        table.register(NodeKind::OrderedList, handlers::ordered_list);
        table.register(NodeKind::BulletList, handlers::bullet_list);
        table.register(NodeKind::DefinitionList, handlers::definition_list);
        table.register(NodeKind::Header, handlers::header);
        table.register(NodeKind::HorizontalRule, handlers::horizontal_rule);
        table.register(NodeKind::Table, handlers::table);
        table.register(NodeKind::CaptionedImage, handlers::captioned_image);
        table.register(NodeKind::Div, handlers::div);
        table.register(NodeKind::Str, handlers::text);
        table.register(NodeKind::Quoted, handlers::quoted);
        table.register(NodeKind::Cite, handlers::cite);
        table.register(NodeKind::Code, handlers::code);
        table.register(NodeKind::Space, handlers::space);
        table.register(NodeKind::SoftBreak, handlers::soft_break);
        table.register(NodeKind::LineBreak, handlers::line_break);
        table.register(NodeKind::Math, handlers::math);
        table.register(NodeKind::RawInline, handlers::raw_inline);
        table.register(NodeKind::Link, handlers::link);
        table.register(NodeKind::Image, handlers::image);
        table.register(NodeKind::Note, handlers::note);
        table.register(NodeKind::Span, handlers::span);
        table
    }

    /// Set the handler for `kind`, returning the one it replaces.
    pub fn register(&mut self, kind: NodeKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert(kind, handler)
    }

    /// Remove the handler for `kind`.
    pub fn remove(&mut self, kind: NodeKind) -> Option<Handler> {
        self.handlers.remove(&kind)
    }

    #[must_use]
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    #[must_use]
    pub fn get(&self, kind: NodeKind) -> Option<Handler> {
        self.handlers.get(&kind).copied()
    }

    /// Kinds that have no handler, in declaration order.
    #[must_use]
    pub fn missing(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.contains(*kind))
            .collect()
    }
}

impl Writer<'_> {
    /// Run the handler registered for the element's kind.
    ///
    /// An unhandled kind yields an empty string and one recorded warning.
    pub fn dispatch(&mut self, element: Element) -> Result<String, WriteError> {
        let kind = element.kind();
        match self.table.get(kind) {
            Some(handler) => handler(self, element),
            None => Ok(self.undefined(kind)),
        }
    }

    fn undefined(&mut self, kind: NodeKind) -> String {
        tracing::warn!(kind = %kind, "No handler for node kind, output dropped");
        self.warnings
            .push(format!("no handler for node kind `{kind}`, output dropped"));
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refit_ast::Meta;
    use refit_backend::BackendRegistry;

    use crate::engine::WriterSettings;

    fn shout(_writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
        match element {
            Element::Str(text) => Ok(text.to_uppercase()),
            other => Ok(format!("<{}>", other.kind())),
        }
    }

    #[test]
    fn test_standard_covers_every_kind() {
        assert_eq!(DispatchTable::standard().missing(), Vec::<NodeKind>::new());
    }

    #[test]
    fn test_new_is_empty() {
        let table = DispatchTable::new();
        assert_eq!(table.missing().len(), NodeKind::ALL.len());
    }

    #[test]
    fn test_register_and_remove() {
        let mut table = DispatchTable::new();
        assert!(table.register(NodeKind::Str, shout).is_none());
        assert!(table.contains(NodeKind::Str));
        assert!(table.register(NodeKind::Str, shout).is_some());
        assert!(table.remove(NodeKind::Str).is_some());
        assert!(!table.contains(NodeKind::Str));
    }

    #[test]
    fn test_dispatch_uses_registered_handler() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let mut writer = Writer::new(&registry, &meta, &WriterSettings::default()).unwrap();
        writer.table_mut().register(NodeKind::Str, shout);
        let out = writer.dispatch(Element::Str("quiet".to_owned())).unwrap();
        assert_eq!(out, "QUIET");
    }

    #[test]
    fn test_undefined_kind_is_empty_with_one_warning() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let mut writer = Writer::new(&registry, &meta, &WriterSettings::default())
            .unwrap()
            .with_table(DispatchTable::new());
        let out = writer.dispatch(Element::HorizontalRule).unwrap();
        assert_eq!(out, "");
        assert_eq!(writer.warnings().len(), 1);
        assert!(writer.warnings()[0].contains("HorizontalRule"));
    }
}
