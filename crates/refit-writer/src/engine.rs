//! The render engine.
//!
//! Every node is rendered by wrapping it in a throwaway one-node document and
//! handing that to the format backend. The [`Writer`] owns everything that
//! outlives a single node: the resolved format, the dispatch table, collected
//! footnotes and warnings.

use refit_ast::{Attr, Block, DocumentView, Inline, ListAttributes, Meta};
use refit_backend::{BASELINE_FORMAT, Backend, BackendRegistry, WriterOptions};

use crate::dispatch::DispatchTable;
use crate::error::WriteError;
use crate::footnotes::{Footnote, FootnoteCollector};
use crate::format::OutputFormat;

/// Settings a writer is created with.
#[derive(Clone, Debug)]
pub struct WriterSettings {
    /// Format used when document metadata does not pick one.
    pub default_format: String,
    pub options: WriterOptions,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            default_format: BASELINE_FORMAT.to_owned(),
            options: WriterOptions::default(),
        }
    }
}

/// Per-call overrides for [`Writer::write_with`].
///
/// Unset fields fall back to the writer's own metadata, format and options.
#[derive(Clone, Copy, Debug, Default)]
pub struct WriteOptions<'o> {
    pub meta: Option<&'o Meta>,
    pub format: Option<&'o str>,
    pub writer_options: Option<&'o WriterOptions>,
}

/// A node or node list accepted by [`Writer::write`].
///
/// Inline content is wrapped in a single [`Block::Plain`] before serializing.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Block(Block),
    Blocks(Vec<Block>),
    Inline(Inline),
    Inlines(Vec<Inline>),
}

impl Fragment {
    fn into_blocks(self) -> Vec<Block> {
        match self {
            Self::Block(block) => vec![block],
            Self::Blocks(blocks) => blocks,
            Self::Inline(inline) => vec![Block::Plain(vec![inline])],
            Self::Inlines(inlines) => vec![Block::Plain(inlines)],
        }
    }
}

impl From<Block> for Fragment {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<Vec<Block>> for Fragment {
    fn from(blocks: Vec<Block>) -> Self {
        Self::Blocks(blocks)
    }
}

impl From<Inline> for Fragment {
    fn from(inline: Inline) -> Self {
        Self::Inline(inline)
    }
}

impl From<Vec<Inline>> for Fragment {
    fn from(inlines: Vec<Inline>) -> Self {
        Self::Inlines(inlines)
    }
}

/// Renders nodes of one document into a single output format.
pub struct Writer<'a> {
    registry: &'a BackendRegistry,
    backend: &'a dyn Backend,
    meta: &'a Meta,
    format: OutputFormat,
    options: WriterOptions,
    pub(crate) table: DispatchTable,
    pub(crate) footnotes: FootnoteCollector,
    pub(crate) warnings: Vec<String>,
}

impl<'a> Writer<'a> {
    /// Create a writer for the document described by `meta`.
    ///
    /// The output format is resolved here, once, and must name a registered
    /// backend.
    pub fn new(
        registry: &'a BackendRegistry,
        meta: &'a Meta,
        settings: &WriterSettings,
    ) -> Result<Self, WriteError> {
        let format = OutputFormat::resolve(meta, &settings.default_format);
        let backend = registry.get(format.as_str())?;
        tracing::debug!(format = %format, "Resolved output format");

        Ok(Self {
            registry,
            backend,
            meta,
            format,
            options: settings.options.clone(),
            table: DispatchTable::standard(),
            footnotes: FootnoteCollector::new(),
            warnings: Vec::new(),
        })
    }

    /// Replace the dispatch table.
    #[must_use]
    pub fn with_table(mut self, table: DispatchTable) -> Self {
        self.table = table;
        self
    }

    pub fn table_mut(&mut self) -> &mut DispatchTable {
        &mut self.table
    }

    #[must_use]
    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Separator placed between sibling block outputs.
    #[must_use]
    pub fn block_separator(&self) -> &str {
        self.backend.block_separator()
    }

    #[must_use]
    pub fn footnotes(&self) -> &FootnoteCollector {
        &self.footnotes
    }

    /// Warnings recorded since the last render started.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Serialize a fragment in the writer's format.
    pub fn write(&self, fragment: impl Into<Fragment>) -> Result<String, WriteError> {
        self.write_with(fragment, WriteOptions::default())
    }

    /// Serialize a fragment as a one-node document.
    ///
    /// Exactly one trailing line terminator is removed from the backend output
    /// so results can be nested inside other nodes.
    pub fn write_with(
        &self,
        fragment: impl Into<Fragment>,
        overrides: WriteOptions<'_>,
    ) -> Result<String, WriteError> {
        let blocks = fragment.into().into_blocks();
        let meta = overrides.meta.unwrap_or(self.meta);
        let options = overrides.writer_options.unwrap_or(&self.options);
        let backend = match overrides.format {
            Some(name) => self.registry.get(name)?,
            None => self.backend,
        };

        let mut out = backend.serialize(DocumentView::new(meta, &blocks), options)?;
        strip_line_terminator(&mut out);
        Ok(out)
    }

    /// Mark already rendered text as inline content of the output format.
    #[must_use]
    pub fn raw_inline(&self, text: impl Into<String>) -> Inline {
        Inline::raw(self.format.as_str(), text)
    }

    /// Mark already rendered text as block content of the output format.
    #[must_use]
    pub fn raw_block(&self, text: impl Into<String>) -> Block {
        Block::raw(self.format.as_str(), text)
    }

    /// Record a footnote body and return its rendered in-text marker.
    ///
    /// Nothing is recorded if the marker fails to render.
    pub fn register_footnote(&mut self, content: impl Into<String>) -> Result<String, WriteError> {
        let note = Footnote::new(self.footnotes.next_index(), content);
        let marker = self.write(note.marker())?;
        self.footnotes.push(note);
        Ok(marker)
    }

    /// Render all collected footnotes as one trailing block.
    ///
    /// Returns an empty string when nothing was collected, otherwise the block
    /// separator followed by the footnote container. The collector is drained.
    pub fn flush_footnotes(&mut self) -> Result<String, WriteError> {
        if self.footnotes.is_empty() {
            return Ok(String::new());
        }

        let items = self
            .footnotes
            .iter()
            .map(|note| note.entry(self.format.as_str()))
            .collect();
        let container = Block::Div {
            attr: Attr::with_classes([self.options.footnotes_class.as_str()]),
            content: vec![Block::OrderedList {
                attrs: ListAttributes::default(),
                items,
            }],
        };
        let block = self.write(container)?;

        let count = self.footnotes.take().len();
        tracing::debug!(count, "Flushed footnotes");
        Ok(format!("{}{block}", self.block_separator()))
    }

    /// Forget collected footnotes and warnings.
    pub fn reset(&mut self) {
        self.footnotes.clear();
        self.warnings.clear();
    }
}

fn strip_line_terminator(out: &mut String) {
    if out.ends_with("\r\n") {
        out.truncate(out.len() - 2);
    } else if out.ends_with('\n') {
        out.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refit_backend::{BackendError, MarkdownBackend};

    use crate::format::FORMAT_META_KEY;

    fn writer<'a>(registry: &'a BackendRegistry, meta: &'a Meta) -> Writer<'a> {
        Writer::new(registry, meta, &WriterSettings::default()).unwrap()
    }

    #[test]
    fn test_write_strips_one_line_terminator() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let writer = writer(&registry, &meta);
        let out = writer.write(Block::Para(vec![Inline::str("x")])).unwrap();
        assert_eq!(out, "<p>x</p>");
        assert_eq!(writer.write(Inline::SoftBreak).unwrap(), "\n");
    }

    #[test]
    fn test_strip_line_terminator() {
        let mut crlf = "a\r\n".to_owned();
        strip_line_terminator(&mut crlf);
        assert_eq!(crlf, "a");
        let mut twice = "a\n\n".to_owned();
        strip_line_terminator(&mut twice);
        assert_eq!(twice, "a\n");
        let mut bare = "a".to_owned();
        strip_line_terminator(&mut bare);
        assert_eq!(bare, "a");
    }

    #[test]
    fn test_write_inlines_wrapped_in_plain() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let writer = writer(&registry, &meta);
        let out = writer
            .write(vec![Inline::str("a"), Inline::Space, Inline::str("b")])
            .unwrap();
        assert_eq!(out, "a b");
    }

    #[test]
    fn test_raw_rewrap_is_identity() {
        let registry = BackendRegistry::with_defaults();
        for format in ["html", "markdown", "plain"] {
            let meta = Meta::new().with(FORMAT_META_KEY, format);
            let writer = writer(&registry, &meta);
            let rendered = writer
                .write(Block::Para(vec![Inline::Emph(vec![Inline::str("a & b")])]))
                .unwrap();
            let rewrapped = writer.write(writer.raw_inline(rendered.clone())).unwrap();
            assert_eq!(rewrapped, rendered, "format {format}");
        }
    }

    #[test]
    fn test_raw_for_other_format_dropped() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let writer = writer(&registry, &meta);
        assert_eq!(writer.write(Inline::raw("latex", "\\emph{x}")).unwrap(), "");
    }

    #[test]
    fn test_write_with_overrides() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let writer = writer(&registry, &meta);
        let node = Inline::Strong(vec![Inline::str("x")]);

        let markdown = writer
            .write_with(
                node.clone(),
                WriteOptions {
                    format: Some("markdown"),
                    ..WriteOptions::default()
                },
            )
            .unwrap();
        assert_eq!(markdown, "**x**");

        let quoted = Inline::Quoted {
            kind: refit_ast::QuoteType::DoubleQuote,
            content: vec![Inline::str("q")],
        };
        let options = WriterOptions {
            html_q_tags: true,
            ..WriterOptions::default()
        };
        let html = writer
            .write_with(
                quoted,
                WriteOptions {
                    writer_options: Some(&options),
                    ..WriteOptions::default()
                },
            )
            .unwrap();
        assert_eq!(html, "<q>q</q>");
    }

    #[test]
    fn test_write_with_unknown_format_fails() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let writer = writer(&registry, &meta);
        let err = writer
            .write_with(
                Inline::str("x"),
                WriteOptions {
                    format: Some("docx"),
                    ..WriteOptions::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            WriteError::Backend(BackendError::UnknownFormat(name)) if name == "docx"
        ));
    }

    #[test]
    fn test_new_rejects_unknown_format() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new().with(FORMAT_META_KEY, "docx");
        let result = Writer::new(&registry, &meta, &WriterSettings::default());
        assert!(matches!(
            result,
            Err(WriteError::Backend(BackendError::UnknownFormat(_)))
        ));
    }

    #[test]
    fn test_new_uses_configured_default() {
        let mut registry = BackendRegistry::new();
        registry.register(MarkdownBackend);
        let meta = Meta::new();
        let settings = WriterSettings {
            default_format: "markdown".to_owned(),
            ..WriterSettings::default()
        };
        let writer = Writer::new(&registry, &meta, &settings).unwrap();
        assert_eq!(writer.format().as_str(), "markdown");
        assert_eq!(writer.block_separator(), "\n\n");
    }

    #[test]
    fn test_footnote_markers_count_up() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let mut writer = writer(&registry, &meta);
        let first = writer.register_footnote("a").unwrap();
        let second = writer.register_footnote("b").unwrap();
        assert_eq!(first, r##"<sup><a href="#fn1" id="fnref1">1</a></sup>"##);
        assert_eq!(second, r##"<sup><a href="#fn2" id="fnref2">2</a></sup>"##);
        assert_eq!(writer.footnotes().len(), 2);
    }

    #[test]
    fn test_flush_without_footnotes_is_empty() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let mut writer = writer(&registry, &meta);
        assert_eq!(writer.flush_footnotes().unwrap(), "");
    }

    #[test]
    fn test_flush_footnotes_html() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let mut writer = writer(&registry, &meta);
        writer.register_footnote("note <b>one</b>").unwrap();
        writer.register_footnote("two").unwrap();
        let block = writer.flush_footnotes().unwrap();
        assert_eq!(
            block,
            concat!(
                "\n<div class=\"footnotes\">\n<ol>\n",
                "<li><a href=\"#fnref1\" id=\"fn1\">note <b>one</b></a></li>\n",
                "<li><a href=\"#fnref2\" id=\"fn2\">two</a></li>\n",
                "</ol>\n</div>",
            )
        );
        assert!(writer.footnotes().is_empty());
    }

    #[test]
    fn test_flush_uses_footnotes_class() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let settings = WriterSettings {
            options: WriterOptions {
                footnotes_class: "endnotes".to_owned(),
                ..WriterOptions::default()
            },
            ..WriterSettings::default()
        };
        let mut writer = Writer::new(&registry, &meta, &settings).unwrap();
        writer.register_footnote("x").unwrap();
        assert!(
            writer
                .flush_footnotes()
                .unwrap()
                .starts_with("\n<div class=\"endnotes\">")
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new();
        let mut writer = writer(&registry, &meta);
        writer.register_footnote("x").unwrap();
        writer.warnings.push("w".to_owned());
        writer.reset();
        assert!(writer.footnotes().is_empty());
        assert!(writer.warnings().is_empty());
        assert_eq!(writer.flush_footnotes().unwrap(), "");
    }
}
