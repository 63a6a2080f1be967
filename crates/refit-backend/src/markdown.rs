//! Markdown backend.
//!
//! Emits CommonMark with the common extensions (pipe tables, fenced divs,
//! bracketed spans, footnotes). Blocks are separated by blank lines.

use std::fmt::Write;

use refit_ast::{
    Alignment, Attr, Block, Cell, Citation, CitationMode, DocumentView, Inline, ListAttributes,
    ListNumberDelim, ListNumberStyle, MathType, QuoteType, Table, Target,
};

use crate::backend::{Backend, BackendError, WriterOptions};
use crate::util::{alpha, check_header_level, indent, roman, without_extra};

const NAME: &str = "markdown";

/// Markdown render backend.
pub struct MarkdownBackend;

impl Backend for MarkdownBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "CommonMark with pandoc-style extensions"
    }

    fn block_separator(&self) -> &str {
        "\n\n"
    }

    fn accepts_raw(&self, format: &str) -> bool {
        matches!(format, "markdown" | "commonmark" | "gfm")
    }

    fn serialize(
        &self,
        doc: DocumentView<'_>,
        options: &WriterOptions,
    ) -> Result<String, BackendError> {
        let mut writer = MarkdownWriter {
            backend: self,
            options,
            notes: Vec::new(),
        };
        let mut out = writer.blocks(doc.blocks)?;
        for (i, note) in writer.notes.iter().enumerate() {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            let marker = format!("[^{}]: ", i + 1);
            out.push_str(&indent(note, &marker, "    "));
        }
        out.push('\n');
        Ok(out)
    }
}

struct MarkdownWriter<'a> {
    backend: &'a MarkdownBackend,
    options: &'a WriterOptions,
    notes: Vec<String>,
}

impl MarkdownWriter<'_> {
    fn blocks(&mut self, blocks: &[Block]) -> Result<String, BackendError> {
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            let rendered = self.block(block)?;
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        Ok(parts.join("\n\n"))
    }

    fn block(&mut self, block: &Block) -> Result<String, BackendError> {
        let out = match block {
            Block::Plain(inlines) | Block::Para(inlines) => self.inlines(inlines)?,
            Block::LineBlock(lines) => {
                let mut rendered = Vec::with_capacity(lines.len());
                for line in lines {
                    rendered.push(format!("| {}", self.inlines(line)?));
                }
                rendered.join("\n")
            }
            Block::CodeBlock { attr, text } => {
                let fence = "`".repeat(longest_backtick_run(text).max(2) + 1);
                let info = match (attr.identifier.is_empty(), attr.classes.as_slice()) {
                    (true, []) if attr.extras.is_empty() => String::new(),
                    (true, [lang]) if attr.extras.is_empty() => lang.clone(),
                    _ => format!(" {}", attributes(attr)),
                };
                format!("{fence}{info}\n{text}\n{fence}")
            }
            Block::RawBlock { format, text } => {
                if self.backend.accepts_raw(format) {
                    text.clone()
                } else {
                    String::new()
                }
            }
            Block::BlockQuote(blocks) => indent(&self.blocks(blocks)?, "> ", "> "),
            Block::OrderedList { attrs, items } => {
                let mut rendered = Vec::with_capacity(items.len());
                // Widened so a start near `u32::MAX` keeps counting.
                for (number, item) in (u64::from(attrs.start)..).zip(items) {
                    let marker = ordered_marker(attrs, number);
                    let pad = " ".repeat(marker.len() + 1);
                    rendered.push(indent(&self.blocks(item)?, &format!("{marker} "), &pad));
                }
                rendered.join(list_separator(items))
            }
            Block::BulletList(items) => {
                let marker = format!("{} ", self.options.bullet_marker);
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(indent(&self.blocks(item)?, &marker, "  "));
                }
                rendered.join(list_separator(items))
            }
            Block::DefinitionList(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    let mut entry = self.inlines(&item.term)?;
                    for definition in &item.definitions {
                        entry.push('\n');
                        entry.push_str(&indent(&self.blocks(definition)?, ":   ", "    "));
                    }
                    rendered.push(entry);
                }
                rendered.join("\n\n")
            }
            Block::Header {
                level,
                attr,
                content,
            } => {
                check_header_level(NAME, *level)?;
                let mut out = format!(
                    "{} {}",
                    "#".repeat(usize::from(*level)),
                    self.inlines(content)?
                );
                if !attr.is_empty() {
                    write!(out, " {}", attributes(attr)).unwrap();
                }
                out
            }
            Block::HorizontalRule => "* * *".to_owned(),
            Block::Table(table) => self.table(table)?,
            Block::CaptionedImage {
                attr,
                src,
                title,
                caption,
            } => {
                let target = Target::new(src.clone(), title.clone());
                format!(
                    "!{}",
                    self.link(caption, &target, &without_extra(attr, "alt"))?
                )
            }
            Block::Div { attr, content } => {
                let open = if attr.is_empty() {
                    ":::".to_owned()
                } else {
                    format!("::: {}", attributes(attr))
                };
                format!("{open}\n{}\n:::", self.blocks(content)?)
            }
        };
        Ok(out)
    }

    fn table(&mut self, table: &Table) -> Result<String, BackendError> {
        let columns = table.columns();
        let mut lines = Vec::new();

        let (first, rest) = match table.head.split_first() {
            Some((first, rest)) => (Some(first), rest),
            None => (None, &[][..]),
        };
        let header = match first {
            Some(row) => self.table_row(&row.cells, columns)?,
            None => vec![String::new(); columns],
        };
        lines.push(format!("| {} |", header.join(" | ")));

        let rule: Vec<&str> = table
            .col_specs
            .iter()
            .map(|spec| match spec.align {
                Alignment::AlignLeft => ":---",
                Alignment::AlignRight => "---:",
                Alignment::AlignCenter => ":---:",
                Alignment::AlignDefault => "---",
            })
            .collect();
        lines.push(format!("|{}|", rule.join("|")));

        // Pipe tables have a single header line; later head rows lead the body.
        for row in rest.iter().chain(&table.body).chain(&table.foot) {
            let cells = self.table_row(&row.cells, columns)?;
            lines.push(format!("| {} |", cells.join(" | ")));
        }

        if !table.caption.is_empty() {
            lines.push(String::new());
            lines.push(format!(": {}", self.blocks(&table.caption)?.replace('\n', " ")));
        }
        Ok(lines.join("\n"))
    }

    /// Render cells onto a single line each, padding short rows.
    fn table_row(
        &mut self,
        cells: &[Cell],
        columns: usize,
    ) -> Result<Vec<String>, BackendError> {
        let mut rendered = Vec::with_capacity(columns);
        for cell in cells {
            rendered.push(self.blocks(&cell.content)?.replace('\n', " "));
        }
        if rendered.len() < columns {
            rendered.resize(columns, String::new());
        }
        Ok(rendered)
    }

    fn inlines(&mut self, inlines: &[Inline]) -> Result<String, BackendError> {
        let mut out = String::new();
        for inline in inlines {
            self.inline(inline, &mut out)?;
        }
        Ok(out)
    }

    fn inline(&mut self, inline: &Inline, out: &mut String) -> Result<(), BackendError> {
        match inline {
            Inline::Str(text) => out.push_str(&escape_markdown(text)),
            Inline::Emph(content) => self.delimit("*", content, out)?,
            Inline::Strong(content) => self.delimit("**", content, out)?,
            Inline::Subscript(content) => self.delimit("~", content, out)?,
            Inline::Superscript(content) => self.delimit("^", content, out)?,
            Inline::Strikeout(content) => self.delimit("~~", content, out)?,
            Inline::SmallCaps(content) => {
                write!(out, "[{}]{{.smallcaps}}", self.inlines(content)?).unwrap();
            }
            Inline::Quoted { kind, content } => {
                let mark = match kind {
                    QuoteType::SingleQuote => '\'',
                    QuoteType::DoubleQuote => '"',
                };
                write!(out, "{mark}{}{mark}", self.inlines(content)?).unwrap();
            }
            Inline::Cite { citations, content } => {
                if citations.is_empty() {
                    out.push_str(&self.inlines(content)?);
                } else {
                    out.push_str(&self.citations(citations)?);
                }
            }
            Inline::Code { attr, text } => {
                let fence = "`".repeat(longest_backtick_run(text) + 1);
                let pad = if text.starts_with('`') || text.ends_with('`') {
                    " "
                } else {
                    ""
                };
                write!(out, "{fence}{pad}{text}{pad}{fence}").unwrap();
                if !attr.is_empty() {
                    out.push_str(&attributes(attr));
                }
            }
            Inline::Space => out.push(' '),
            Inline::SoftBreak => out.push('\n'),
            Inline::LineBreak => out.push_str("\\\n"),
            Inline::Math { kind, text } => match kind {
                MathType::InlineMath => write!(out, "${text}$").unwrap(),
                MathType::DisplayMath => write!(out, "$${text}$$").unwrap(),
            },
            Inline::RawInline { format, text } => {
                if self.backend.accepts_raw(format) {
                    out.push_str(text);
                }
            }
            Inline::Link {
                attr,
                content,
                target,
            } => out.push_str(&self.link(content, target, attr)?),
            Inline::Image {
                attr,
                content,
                target,
            } => {
                // The bracketed content already is the alternative text.
                out.push('!');
                out.push_str(&self.link(content, target, &without_extra(attr, "alt"))?);
            }
            Inline::Note(blocks) => {
                let number = self.notes.len() + 1;
                self.notes.push(String::new());
                let body = self.blocks(blocks)?;
                self.notes[number - 1] = body;
                write!(out, "[^{number}]").unwrap();
            }
            Inline::Span { attr, content } => {
                write!(out, "[{}]{}", self.inlines(content)?, attributes(attr)).unwrap();
            }
        }
        Ok(())
    }

    fn delimit(
        &mut self,
        mark: &str,
        content: &[Inline],
        out: &mut String,
    ) -> Result<(), BackendError> {
        write!(out, "{mark}{}{mark}", self.inlines(content)?).unwrap();
        Ok(())
    }

    fn link(
        &mut self,
        content: &[Inline],
        target: &Target,
        attr: &Attr,
    ) -> Result<String, BackendError> {
        let mut out = format!("[{}]({}", self.inlines(content)?, target.url);
        if !target.title.is_empty() {
            write!(out, " \"{}\"", target.title.replace('"', "\\\"")).unwrap();
        }
        out.push(')');
        if !attr.is_empty() {
            out.push_str(&attributes(attr));
        }
        Ok(out)
    }

    fn citations(&mut self, citations: &[Citation]) -> Result<String, BackendError> {
        if let [citation] = citations
            && citation.mode == CitationMode::AuthorInText
        {
            let mut out = format!("@{}", citation.id);
            if !citation.suffix.is_empty() {
                write!(out, " [{}]", self.inlines(&citation.suffix)?.trim()).unwrap();
            }
            return Ok(out);
        }

        let mut parts = Vec::with_capacity(citations.len());
        for citation in citations {
            let mut part = String::new();
            if !citation.prefix.is_empty() {
                write!(part, "{} ", self.inlines(&citation.prefix)?.trim()).unwrap();
            }
            if citation.mode == CitationMode::SuppressAuthor {
                part.push('-');
            }
            write!(part, "@{}", citation.id).unwrap();
            if !citation.suffix.is_empty() {
                write!(part, " {}", self.inlines(&citation.suffix)?.trim()).unwrap();
            }
            parts.push(part);
        }
        Ok(format!("[{}]", parts.join("; ")))
    }
}

/// Tight lists keep items on consecutive lines.
fn list_separator(items: &[Vec<Block>]) -> &'static str {
    let tight = items
        .iter()
        .all(|item| matches!(item.as_slice(), [Block::Plain(_)] | []));
    if tight { "\n" } else { "\n\n" }
}

fn ordered_marker(attrs: &ListAttributes, number: u64) -> String {
    let label = match attrs.style {
        ListNumberStyle::LowerAlpha => alpha(number),
        ListNumberStyle::UpperAlpha => alpha(number).to_uppercase(),
        ListNumberStyle::LowerRoman => roman(number),
        ListNumberStyle::UpperRoman => roman(number).to_uppercase(),
        ListNumberStyle::Decimal | ListNumberStyle::DefaultStyle | ListNumberStyle::Example => {
            number.to_string()
        }
    };
    match attrs.delim {
        ListNumberDelim::OneParen => format!("{label})"),
        ListNumberDelim::TwoParens => format!("({label})"),
        ListNumberDelim::Period | ListNumberDelim::DefaultDelim => format!("{label}."),
    }
}

/// `{#id .class key="value"}`.
fn attributes(attr: &Attr) -> String {
    let mut parts = Vec::new();
    if !attr.identifier.is_empty() {
        parts.push(format!("#{}", attr.identifier));
    }
    parts.extend(attr.classes.iter().map(|class| format!(".{class}")));
    parts.extend(
        attr.extras
            .iter()
            .map(|(key, value)| format!("{key}=\"{}\"", value.replace('"', "\\\""))),
    );
    format!("{{{}}}", parts.join(" "))
}

fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '~' | '^' | '|' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refit_ast::{DefinitionItem, Meta, SimpleTable};

    fn render(blocks: &[Block]) -> String {
        let meta = Meta::new();
        MarkdownBackend
            .serialize(DocumentView::new(&meta, blocks), &WriterOptions::default())
            .unwrap()
    }

    fn plain(text: &str) -> Vec<Block> {
        vec![Block::Plain(vec![Inline::str(text)])]
    }

    #[test]
    fn test_inline_markup() {
        let out = render(&[Block::Para(vec![
            Inline::Strong(vec![Inline::Emph(vec![Inline::str("foo")])]),
            Inline::str(" & "),
            Inline::Superscript(vec![Inline::str("bar")]),
        ])]);
        assert_eq!(out, "***foo*** & ^bar^\n");
    }

    #[test]
    fn test_text_is_escaped() {
        let out = render(&[Block::Plain(vec![Inline::str("a*b_[c]")])]);
        assert_eq!(out, "a\\*b\\_\\[c\\]\n");
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let out = render(&[
            Block::Header {
                level: 2,
                attr: Attr::with_id("intro"),
                content: vec![Inline::str("Intro")],
            },
            Block::Para(vec![Inline::str("text")]),
        ]);
        assert_eq!(out, "## Intro {#intro}\n\ntext\n");
    }

    #[test]
    fn test_lists() {
        let out = render(&[
            Block::BulletList(vec![plain("a"), plain("b")]),
            Block::OrderedList {
                attrs: ListAttributes {
                    start: 2,
                    style: ListNumberStyle::LowerAlpha,
                    delim: ListNumberDelim::OneParen,
                },
                items: vec![plain("x"), plain("y")],
            },
        ]);
        assert_eq!(out, "- a\n- b\n\nb) x\nc) y\n");
    }

    #[test]
    fn test_definition_list() {
        let out = render(&[Block::DefinitionList(vec![DefinitionItem {
            term: vec![Inline::str("term")],
            definitions: vec![plain("meaning")],
        }])]);
        assert_eq!(out, "term\n:   meaning\n");
    }

    #[test]
    fn test_code_block_fence() {
        let out = render(&[Block::CodeBlock {
            attr: Attr::with_classes(["rust"]),
            text: "let x = 1;".to_owned(),
        }]);
        assert_eq!(out, "```rust\nlet x = 1;\n```\n");
    }

    #[test]
    fn test_inline_code_with_backticks() {
        let out = render(&[Block::Plain(vec![Inline::Code {
            attr: Attr::default(),
            text: "a`b".to_owned(),
        }])]);
        assert_eq!(out, "``a`b``\n");
    }

    #[test]
    fn test_blockquote() {
        let out = render(&[Block::BlockQuote(vec![
            Block::Para(vec![Inline::str("one")]),
            Block::Para(vec![Inline::str("two")]),
        ])]);
        assert_eq!(out, "> one\n>\n> two\n");
    }

    #[test]
    fn test_ordered_list_past_u32_max() {
        let out = render(&[Block::OrderedList {
            attrs: ListAttributes {
                start: u32::MAX,
                style: ListNumberStyle::LowerRoman,
                delim: ListNumberDelim::OneParen,
            },
            items: vec![plain("x")],
        }]);
        assert!(out.ends_with("mmmmccxcv) x\n"), "{}", &out[out.len() - 20..]);
    }

    #[test]
    fn test_pipe_table_later_head_rows_lead_body() {
        let table = Table::from(SimpleTable {
            aligns: vec![Alignment::AlignDefault],
            headers: vec![plain("H1")],
            subheaders: vec![vec![plain("H2")]],
            rows: vec![vec![plain("B")]],
            footer: vec![vec![plain("TOTAL")]],
            ..SimpleTable::default()
        });
        let out = render(&[Block::Table(Box::new(table))]);
        assert_eq!(out, "| H1 |\n|---|\n| H2 |\n| B |\n| TOTAL |\n");
    }

    #[test]
    fn test_pipe_table() {
        let table = Table::from(SimpleTable {
            caption: vec![Inline::str("Prices")],
            aligns: vec![Alignment::AlignLeft, Alignment::AlignRight],
            widths: vec![0.0, 0.0],
            headers: vec![plain("Item"), plain("Cost")],
            rows: vec![vec![plain("tea"), plain("2")]],
            ..SimpleTable::default()
        });
        let out = render(&[Block::Table(Box::new(table))]);
        assert_eq!(
            out,
            "| Item | Cost |\n|:---|---:|\n| tea | 2 |\n\n: Prices\n"
        );
    }

    #[test]
    fn test_link_with_attributes() {
        let out = render(&[Block::Plain(vec![Inline::Link {
            attr: Attr::with_id("fnref1"),
            content: vec![Inline::str("1")],
            target: Target::new("#fn1", ""),
        }])]);
        assert_eq!(out, "[1](#fn1){#fnref1}\n");
    }

    #[test]
    fn test_citations() {
        let cite = |id: &str, mode| Citation {
            id: id.to_owned(),
            mode,
            ..Citation::default()
        };
        let out = render(&[Block::Plain(vec![
            Inline::Cite {
                citations: vec![cite("knuth", CitationMode::AuthorInText)],
                content: Vec::new(),
            },
            Inline::Space,
            Inline::Cite {
                citations: vec![
                    cite("a", CitationMode::NormalCitation),
                    cite("b", CitationMode::SuppressAuthor),
                ],
                content: Vec::new(),
            },
        ])]);
        assert_eq!(out, "@knuth [@a; -@b]\n");
    }

    #[test]
    fn test_native_notes() {
        let out = render(&[Block::Para(vec![
            Inline::str("see"),
            Inline::Note(plain("the note")),
        ])]);
        assert_eq!(out, "see[^1]\n\n[^1]: the note\n");
    }
}
