//! Whole-document traversal.
//!
//! Walks the tree depth-first, renders children before their parent and hands
//! each node to its handler as an [`Element`]. Sibling blocks are joined with
//! the backend's block separator, sibling inlines are concatenated.

use refit_ast::{Alignment, AttrList, Block, Document, Inline, Row, Table, stringify};
use refit_backend::BackendRegistry;

use crate::element::Element;
use crate::engine::{Writer, WriterSettings};
use crate::error::WriteError;
use crate::format::OutputFormat;

/// Outcome of rendering one document.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub output: String,
    pub format: OutputFormat,
    /// Number of footnotes collected and emitted.
    pub footnotes: usize,
    /// One entry per node that had no handler.
    pub warnings: Vec<String>,
}

/// Render `document` with a fresh writer.
pub fn render_document(
    registry: &BackendRegistry,
    document: &Document,
    settings: &WriterSettings,
) -> Result<RenderResult, WriteError> {
    Writer::new(registry, &document.meta, settings)?.render(&document.blocks)
}

impl Writer<'_> {
    /// Render a document body, including its footnote block.
    ///
    /// Footnotes and warnings from earlier renders are discarded first.
    pub fn render(&mut self, blocks: &[Block]) -> Result<RenderResult, WriteError> {
        self.reset();
        let body = self.render_blocks(blocks)?;
        let footnotes = self.footnotes.len();
        let output = self.dispatch(Element::Document { body })?;

        Ok(RenderResult {
            output,
            format: self.format().clone(),
            footnotes,
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    /// Render sibling blocks. Empty outputs get no separator.
    pub fn render_blocks(&mut self, blocks: &[Block]) -> Result<String, WriteError> {
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            let rendered = self.render_block(block)?;
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        Ok(parts.join(self.block_separator()))
    }

    pub fn render_inlines(&mut self, inlines: &[Inline]) -> Result<String, WriteError> {
        let mut out = String::new();
        for inline in inlines {
            out.push_str(&self.render_inline(inline)?);
        }
        Ok(out)
    }

    fn render_items(&mut self, items: &[Vec<Block>]) -> Result<Vec<String>, WriteError> {
        items.iter().map(|item| self.render_blocks(item)).collect()
    }

    fn render_row(&mut self, row: &Row) -> Result<Vec<String>, WriteError> {
        row.cells
            .iter()
            .map(|cell| self.render_blocks(&cell.content))
            .collect()
    }

    fn render_rows(&mut self, rows: &[Row]) -> Result<Vec<Vec<String>>, WriteError> {
        rows.iter().map(|row| self.render_row(row)).collect()
    }

    pub fn render_block(&mut self, block: &Block) -> Result<String, WriteError> {
        let element = match block {
            Block::Plain(inlines) => Element::Plain(self.render_inlines(inlines)?),
            Block::Para(inlines) => Element::Para(self.render_inlines(inlines)?),
            Block::LineBlock(lines) => Element::LineBlock(
                lines
                    .iter()
                    .map(|line| self.render_inlines(line))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Block::CodeBlock { attr, text } => Element::CodeBlock {
                text: text.clone(),
                attrs: AttrList::from(attr),
            },
            Block::RawBlock { format, text } => Element::RawBlock {
                format: format.clone(),
                text: text.clone(),
            },
            Block::BlockQuote(blocks) => Element::BlockQuote(self.render_blocks(blocks)?),
            Block::OrderedList { attrs, items } => Element::OrderedList {
                items: self.render_items(items)?,
                attrs: attrs.clone(),
            },
            Block::BulletList(items) => Element::BulletList(self.render_items(items)?),
            Block::DefinitionList(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for item in items {
                    let term = self.render_inlines(&item.term)?;
                    entries.push((term, self.render_items(&item.definitions)?));
                }
                Element::DefinitionList(entries)
            }
            Block::Header {
                level,
                attr,
                content,
            } => Element::Header {
                level: *level,
                content: self.render_inlines(content)?,
                attrs: AttrList::from(attr),
            },
            Block::HorizontalRule => Element::HorizontalRule,
            Block::Table(table) => {
                check_simple_cells(table)?;
                let caption = self.render_blocks(&table.caption)?;
                let (headers, subheaders) = match table.head.split_first() {
                    Some((first, rest)) => (self.render_row(first)?, self.render_rows(rest)?),
                    None => (vec![String::new(); table.columns()], Vec::new()),
                };
                Element::Table {
                    caption,
                    aligns: table.col_specs.iter().map(|spec| spec.align).collect(),
                    widths: table
                        .col_specs
                        .iter()
                        .map(|spec| spec.width.unwrap_or(0.0))
                        .collect(),
                    headers,
                    rows: self.render_rows(&table.body)?,
                    subheaders,
                    footer: self.render_rows(&table.foot)?,
                    attrs: AttrList::from(&table.attr),
                }
            }
            Block::CaptionedImage {
                attr,
                src,
                title,
                caption,
            } => Element::CaptionedImage {
                src: src.clone(),
                title: title.clone(),
                caption: self.render_inlines(caption)?,
                caption_text: stringify(caption),
                attrs: AttrList::from(attr),
            },
            Block::Div { attr, content } => Element::Div {
                content: self.render_blocks(content)?,
                attrs: AttrList::from(attr),
            },
        };
        self.dispatch(element)
    }

    pub fn render_inline(&mut self, inline: &Inline) -> Result<String, WriteError> {
        let element = match inline {
            Inline::Str(text) => Element::Str(text.clone()),
            Inline::Emph(content) => Element::Emph(self.render_inlines(content)?),
            Inline::Strong(content) => Element::Strong(self.render_inlines(content)?),
            Inline::Subscript(content) => Element::Subscript(self.render_inlines(content)?),
            Inline::Superscript(content) => Element::Superscript(self.render_inlines(content)?),
            Inline::SmallCaps(content) => Element::SmallCaps(self.render_inlines(content)?),
            Inline::Strikeout(content) => Element::Strikeout(self.render_inlines(content)?),
            Inline::Quoted { kind, content } => Element::Quoted {
                kind: *kind,
                content: self.render_inlines(content)?,
            },
            Inline::Cite { citations, content } => Element::Cite {
                content: self.render_inlines(content)?,
                citations: citations.clone(),
            },
            Inline::Code { attr, text } => Element::Code {
                text: text.clone(),
                attrs: AttrList::from(attr),
            },
            Inline::Space => Element::Space,
            Inline::SoftBreak => Element::SoftBreak,
            Inline::LineBreak => Element::LineBreak,
            Inline::Math { kind, text } => Element::Math {
                kind: *kind,
                text: text.clone(),
            },
            Inline::RawInline { format, text } => Element::RawInline {
                format: format.clone(),
                text: text.clone(),
            },
            Inline::Link {
                attr,
                content,
                target,
            } => Element::Link {
                content: self.render_inlines(content)?,
                url: target.url.clone(),
                title: target.title.clone(),
                attrs: AttrList::from(attr),
            },
            Inline::Image {
                attr,
                content,
                target,
            } => Element::Image {
                content: self.render_inlines(content)?,
                src: target.url.clone(),
                title: target.title.clone(),
                alt_text: stringify(content),
                attrs: AttrList::from(attr),
            },
            Inline::Note(blocks) => Element::Note(self.render_blocks(blocks)?),
            Inline::Span { attr, content } => Element::Span {
                content: self.render_inlines(content)?,
                attrs: AttrList::from(attr),
            },
        };
        self.dispatch(element)
    }
}

/// Spans and per-cell alignment have no place in the simple table shape.
fn check_simple_cells(table: &Table) -> Result<(), WriteError> {
    let cells = table
        .head
        .iter()
        .chain(&table.body)
        .chain(&table.foot)
        .flat_map(|row| &row.cells);
    for cell in cells {
        if cell.row_span != 1 || cell.col_span != 1 {
            return Err(WriteError::UnsupportedTable(format!(
                "cell spans {} rows and {} columns",
                cell.row_span, cell.col_span
            )));
        }
        if cell.align != Alignment::AlignDefault {
            return Err(WriteError::UnsupportedTable(format!(
                "cell overrides column alignment with {:?}",
                cell.align
            )));
        }
    }
    Ok(())
}
