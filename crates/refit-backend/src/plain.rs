//! Plain text backend.
//!
//! Drops all markup and keeps readable text. Used directly as an output format
//! and whenever the writer needs a markup-free rendering.

use std::fmt::Write;

use refit_ast::{Block, Cell, DocumentView, Inline, ListNumberDelim, MathType, QuoteType, Table};

use crate::backend::{Backend, BackendError, WriterOptions};
use crate::util::indent;

const NAME: &str = "plain";

/// Plain text render backend.
pub struct PlainBackend;

impl Backend for PlainBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Plain text without markup"
    }

    fn block_separator(&self) -> &str {
        "\n\n"
    }

    fn serialize(
        &self,
        doc: DocumentView<'_>,
        _options: &WriterOptions,
    ) -> Result<String, BackendError> {
        let mut writer = PlainWriter {
            backend: self,
            notes: Vec::new(),
        };
        let mut out = writer.blocks(doc.blocks);
        for (i, note) in writer.notes.iter().enumerate() {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&indent(note, &format!("[{}] ", i + 1), "    "));
        }
        out.push('\n');
        Ok(out)
    }
}

struct PlainWriter<'a> {
    backend: &'a PlainBackend,
    notes: Vec<String>,
}

impl PlainWriter<'_> {
    fn blocks(&mut self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.block(block))
            .filter(|rendered| !rendered.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn block(&mut self, block: &Block) -> String {
        match block {
            Block::Plain(inlines) | Block::Para(inlines) | Block::Header { content: inlines, .. } => {
                self.inlines(inlines)
            }
            Block::LineBlock(lines) => lines
                .iter()
                .map(|line| self.inlines(line))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::CodeBlock { text, .. } => indent(text, "    ", "    "),
            Block::RawBlock { format, text } => {
                if self.backend.accepts_raw(format) {
                    text.clone()
                } else {
                    String::new()
                }
            }
            Block::BlockQuote(blocks) => indent(&self.blocks(blocks), "  ", "  "),
            Block::OrderedList { attrs, items } => {
                let mut rendered = Vec::with_capacity(items.len());
                for (number, item) in (u64::from(attrs.start)..).zip(items) {
                    let marker = match attrs.delim {
                        ListNumberDelim::OneParen => format!("{number}) "),
                        ListNumberDelim::TwoParens => format!("({number}) "),
                        ListNumberDelim::Period | ListNumberDelim::DefaultDelim => {
                            format!("{number}. ")
                        }
                    };
                    let pad = " ".repeat(marker.len());
                    rendered.push(indent(&self.blocks(item), &marker, &pad));
                }
                rendered.join("\n")
            }
            Block::BulletList(items) => items
                .iter()
                .map(|item| indent(&self.blocks(item), "- ", "  "))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::DefinitionList(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    let mut entry = self.inlines(&item.term);
                    for definition in &item.definitions {
                        entry.push('\n');
                        entry.push_str(&indent(&self.blocks(definition), "    ", "    "));
                    }
                    rendered.push(entry);
                }
                rendered.join("\n\n")
            }
            Block::HorizontalRule => "--------".to_owned(),
            Block::Table(table) => self.table(table),
            Block::CaptionedImage { caption, .. } => self.inlines(caption),
            Block::Div { content, .. } => self.blocks(content),
        }
    }

    fn table(&mut self, table: &Table) -> String {
        let mut lines = Vec::new();
        for row in &table.head {
            let line = self.row_line(&row.cells);
            let rule = "-".repeat(line.chars().count());
            lines.push(line);
            lines.push(rule);
        }
        for row in table.body.iter().chain(&table.foot) {
            lines.push(self.row_line(&row.cells));
        }
        if !table.caption.is_empty() {
            lines.push(String::new());
            lines.push(self.blocks(&table.caption));
        }
        lines.join("\n")
    }

    fn row_line(&mut self, cells: &[Cell]) -> String {
        cells
            .iter()
            .map(|cell| self.blocks(&cell.content).replace('\n', " "))
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn inlines(&mut self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            self.inline(inline, &mut out);
        }
        out
    }

    fn inline(&mut self, inline: &Inline, out: &mut String) {
        match inline {
            Inline::Str(text) | Inline::Code { text, .. } => out.push_str(text),
            Inline::Math { kind, text } => match kind {
                MathType::InlineMath => out.push_str(text),
                MathType::DisplayMath => {
                    out.push('\n');
                    out.push_str(text);
                    out.push('\n');
                }
            },
            Inline::Emph(content)
            | Inline::Strong(content)
            | Inline::Subscript(content)
            | Inline::Superscript(content)
            | Inline::SmallCaps(content)
            | Inline::Strikeout(content)
            | Inline::Cite { content, .. }
            | Inline::Link { content, .. }
            | Inline::Image { content, .. }
            | Inline::Span { content, .. } => {
                let rendered = self.inlines(content);
                out.push_str(&rendered);
            }
            Inline::Quoted { kind, content } => {
                let (open, close) = match kind {
                    QuoteType::SingleQuote => ('\u{2018}', '\u{2019}'),
                    QuoteType::DoubleQuote => ('\u{201C}', '\u{201D}'),
                };
                out.push(open);
                let rendered = self.inlines(content);
                out.push_str(&rendered);
                out.push(close);
            }
            Inline::Space | Inline::SoftBreak => out.push(' '),
            Inline::LineBreak => out.push('\n'),
            Inline::RawInline { format, text } => {
                if self.backend.accepts_raw(format) {
                    out.push_str(text);
                }
            }
            Inline::Note(blocks) => {
                let number = self.notes.len() + 1;
                self.notes.push(String::new());
                let body = self.blocks(blocks);
                self.notes[number - 1] = body;
                write!(out, "[{number}]").unwrap();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refit_ast::{Alignment, Attr, ListAttributes, Meta, SimpleTable};

    fn render(blocks: &[Block]) -> String {
        let meta = Meta::new();
        PlainBackend
            .serialize(DocumentView::new(&meta, blocks), &WriterOptions::default())
            .unwrap()
    }

    fn plain(text: &str) -> Vec<Block> {
        vec![Block::Plain(vec![Inline::str(text)])]
    }

    #[test]
    fn test_markup_dropped() {
        let out = render(&[Block::Para(vec![
            Inline::Strong(vec![Inline::Emph(vec![Inline::str("foo")])]),
            Inline::str(" & "),
            Inline::Superscript(vec![Inline::str("bar")]),
        ])]);
        assert_eq!(out, "foo & bar\n");
    }

    #[test]
    fn test_header_and_paragraph() {
        let out = render(&[
            Block::Header {
                level: 1,
                attr: Attr::default(),
                content: vec![Inline::str("Title")],
            },
            Block::Para(vec![Inline::str("Body")]),
        ]);
        assert_eq!(out, "Title\n\nBody\n");
    }

    #[test]
    fn test_ordered_list() {
        let out = render(&[Block::OrderedList {
            attrs: ListAttributes {
                start: 9,
                ..ListAttributes::default()
            },
            items: vec![plain("nine"), plain("ten")],
        }]);
        assert_eq!(out, "9. nine\n10. ten\n");
    }

    #[test]
    fn test_raw_only_for_plain() {
        let out = render(&[Block::Plain(vec![
            Inline::raw("plain", "kept"),
            Inline::raw("html", "<b>dropped</b>"),
        ])]);
        assert_eq!(out, "kept\n");
    }

    #[test]
    fn test_table() {
        let table = refit_ast::Table::from(SimpleTable {
            aligns: vec![Alignment::AlignDefault; 2],
            headers: vec![plain("a"), plain("b")],
            rows: vec![vec![plain("1"), plain("2")]],
            ..SimpleTable::default()
        });
        assert_eq!(render(&[Block::Table(Box::new(table))]), "a  b\n----\n1  2\n");
    }

    #[test]
    fn test_ordered_list_starting_at_u32_max() {
        let out = render(&[Block::OrderedList {
            attrs: ListAttributes {
                start: u32::MAX,
                ..ListAttributes::default()
            },
            items: vec![plain("x"), plain("y")],
        }]);
        assert_eq!(out, "4294967295. x\n4294967296. y\n");
    }

    #[test]
    fn test_notes() {
        let out = render(&[Block::Para(vec![
            Inline::str("x"),
            Inline::Note(plain("y")),
        ])]);
        assert_eq!(out, "x[1]\n\n[1] y\n");
    }
}
