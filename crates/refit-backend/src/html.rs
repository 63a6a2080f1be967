//! HTML backend.
//!
//! Produces HTML5 fragments: one element per top-level block, each on its own
//! line. Footnotes found in the document are numbered in reading order and
//! emitted as a trailing `<section>`.

use std::fmt::Write;

use refit_ast::{
    Alignment, Attr, Block, DocumentView, Inline, ListAttributes, ListNumberStyle, MathType,
    QuoteType, Table, Target, stringify,
};

use crate::backend::{Backend, BackendError, WriterOptions};
use crate::util::{check_header_level, escape_html, without_extra};

const NAME: &str = "html";

/// HTML render backend.
pub struct HtmlBackend;

impl Backend for HtmlBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "HTML5 fragments"
    }

    fn accepts_raw(&self, format: &str) -> bool {
        matches!(format, "html" | "html5" | "html4")
    }

    fn serialize(
        &self,
        doc: DocumentView<'_>,
        options: &WriterOptions,
    ) -> Result<String, BackendError> {
        let mut writer = HtmlWriter {
            backend: self,
            options,
            notes: Vec::new(),
        };
        let mut out = writer.blocks(doc.blocks)?;
        if !writer.notes.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            writer.write_notes(&mut out);
        }
        out.push('\n');
        Ok(out)
    }
}

struct HtmlWriter<'a> {
    backend: &'a HtmlBackend,
    options: &'a WriterOptions,
    notes: Vec<String>,
}

impl HtmlWriter<'_> {
    fn blocks(&mut self, blocks: &[Block]) -> Result<String, BackendError> {
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            let rendered = self.block(block)?;
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        Ok(parts.join("\n"))
    }

    #[allow(clippy::too_many_lines)]
    fn block(&mut self, block: &Block) -> Result<String, BackendError> {
        let mut out = String::new();
        match block {
            Block::Plain(inlines) => out.push_str(&self.inlines(inlines)?),
            Block::Para(inlines) => {
                write!(out, "<p>{}</p>", self.inlines(inlines)?).unwrap();
            }
            Block::LineBlock(lines) => {
                let mut rendered = Vec::with_capacity(lines.len());
                for line in lines {
                    rendered.push(self.inlines(line)?);
                }
                write!(
                    out,
                    r#"<div class="line-block">{}</div>"#,
                    rendered.join("<br />\n")
                )
                .unwrap();
            }
            Block::CodeBlock { attr, text } => {
                write!(
                    out,
                    "<pre{}><code>{}</code></pre>",
                    attributes(attr),
                    escape_html(text)
                )
                .unwrap();
            }
            Block::RawBlock { format, text } => {
                if self.backend.accepts_raw(format) {
                    out.push_str(text);
                }
            }
            Block::BlockQuote(blocks) => {
                write!(out, "<blockquote>\n{}\n</blockquote>", self.blocks(blocks)?).unwrap();
            }
            Block::OrderedList { attrs, items } => {
                write!(out, "<ol{}>", list_attributes(attrs)).unwrap();
                self.list_items(items, &mut out)?;
                out.push_str("\n</ol>");
            }
            Block::BulletList(items) => {
                out.push_str("<ul>");
                self.list_items(items, &mut out)?;
                out.push_str("\n</ul>");
            }
            Block::DefinitionList(items) => {
                out.push_str("<dl>");
                for item in items {
                    write!(out, "\n<dt>{}</dt>", self.inlines(&item.term)?).unwrap();
                    for definition in &item.definitions {
                        write!(out, "\n<dd>{}</dd>", self.item_body(definition)?).unwrap();
                    }
                }
                out.push_str("\n</dl>");
            }
            Block::Header {
                level,
                attr,
                content,
            } => {
                check_header_level(NAME, *level)?;
                write!(
                    out,
                    "<h{level}{}>{}</h{level}>",
                    attributes(attr),
                    self.inlines(content)?
                )
                .unwrap();
            }
            Block::HorizontalRule => out.push_str("<hr />"),
            Block::Table(table) => self.table(table, &mut out)?,
            Block::CaptionedImage {
                attr,
                src,
                title,
                caption,
            } => {
                let container = Attr {
                    identifier: attr.identifier.clone(),
                    classes: attr.classes.clone(),
                    extras: Vec::new(),
                };
                let image = Attr {
                    extras: attr.extras.clone(),
                    ..Attr::default()
                };
                write!(
                    out,
                    "<figure{}>\n{}\n<figcaption>{}</figcaption>\n</figure>",
                    attributes(&container),
                    image_tag(&image, caption, &Target::new(src.clone(), title.clone())),
                    self.inlines(caption)?
                )
                .unwrap();
            }
            Block::Div { attr, content } => {
                write!(
                    out,
                    "<div{}>\n{}\n</div>",
                    attributes(attr),
                    self.blocks(content)?
                )
                .unwrap();
            }
        }
        Ok(out)
    }

    fn list_items(&mut self, items: &[Vec<Block>], out: &mut String) -> Result<(), BackendError> {
        for item in items {
            write!(out, "\n<li>{}</li>", self.item_body(item)?).unwrap();
        }
        Ok(())
    }

    /// A single `Plain` block stays inline; anything else goes on its own lines.
    fn item_body(&mut self, blocks: &[Block]) -> Result<String, BackendError> {
        match blocks {
            [Block::Plain(inlines)] => self.inlines(inlines),
            _ => Ok(format!("\n{}\n", self.blocks(blocks)?)),
        }
    }

    fn table(&mut self, table: &Table, out: &mut String) -> Result<(), BackendError> {
        write!(out, "<table{}>", attributes(&table.attr)).unwrap();
        if !table.caption.is_empty() {
            write!(out, "\n<caption>{}</caption>", self.blocks(&table.caption)?).unwrap();
        }
        if table.col_specs.iter().any(|spec| spec.width.is_some()) {
            out.push_str("\n<colgroup>");
            for spec in &table.col_specs {
                match spec.width {
                    Some(width) => {
                        write!(out, "\n<col style=\"width: {:.0}%\" />", width * 100.0).unwrap();
                    }
                    None => out.push_str("\n<col />"),
                }
            }
            out.push_str("\n</colgroup>");
        }

        let sections = [
            ("thead", "th", &table.head),
            ("tbody", "td", &table.body),
            ("tfoot", "td", &table.foot),
        ];
        for (section, cell_tag, rows) in sections {
            if rows.is_empty() {
                continue;
            }
            write!(out, "\n<{section}>").unwrap();
            for row in rows.iter() {
                out.push_str("\n<tr>");
                for (col, cell) in row.cells.iter().enumerate() {
                    // Cell alignment wins over the column default.
                    let align = match cell.align {
                        Alignment::AlignDefault => table
                            .col_specs
                            .get(col)
                            .map_or(Alignment::AlignDefault, |spec| spec.align),
                        align => align,
                    };
                    let mut attrs = String::new();
                    if let Some(name) = align_name(align) {
                        write!(attrs, " style=\"text-align: {name};\"").unwrap();
                    }
                    if cell.row_span > 1 {
                        write!(attrs, " rowspan=\"{}\"", cell.row_span).unwrap();
                    }
                    if cell.col_span > 1 {
                        write!(attrs, " colspan=\"{}\"", cell.col_span).unwrap();
                    }
                    write!(
                        out,
                        "\n<{cell_tag}{attrs}>{}</{cell_tag}>",
                        self.item_body(&cell.content)?
                    )
                    .unwrap();
                }
                out.push_str("\n</tr>");
            }
            write!(out, "\n</{section}>").unwrap();
        }
        out.push_str("\n</table>");
        Ok(())
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
            Inline::Str(text) => out.push_str(&escape_html(text)),
            Inline::Emph(content) => self.wrap("em", content, out)?,
            Inline::Strong(content) => self.wrap("strong", content, out)?,
            Inline::Subscript(content) => self.wrap("sub", content, out)?,
            Inline::Superscript(content) => self.wrap("sup", content, out)?,
            Inline::Strikeout(content) => self.wrap("del", content, out)?,
            Inline::SmallCaps(content) => {
                write!(out, r#"<span class="smallcaps">{}</span>"#, self.inlines(content)?)
                    .unwrap();
            }
            Inline::Quoted { kind, content } => {
                let body = self.inlines(content)?;
                match kind {
                    QuoteType::DoubleQuote if self.options.html_q_tags => {
                        write!(out, "<q>{body}</q>").unwrap();
                    }
                    QuoteType::DoubleQuote => write!(out, "\u{201C}{body}\u{201D}").unwrap(),
                    QuoteType::SingleQuote => write!(out, "\u{2018}{body}\u{2019}").unwrap(),
                }
            }
            Inline::Cite { citations, content } => {
                let ids: Vec<&str> = citations.iter().map(|c| c.id.as_str()).collect();
                write!(
                    out,
                    r#"<span class="citation" data-cites="{}">{}</span>"#,
                    escape_html(&ids.join(" ")),
                    self.inlines(content)?
                )
                .unwrap();
            }
            Inline::Code { attr, text } => {
                write!(out, "<code{}>{}</code>", attributes(attr), escape_html(text)).unwrap();
            }
            Inline::Space => out.push(' '),
            Inline::SoftBreak => out.push('\n'),
            Inline::LineBreak => out.push_str("<br />\n"),
            Inline::Math { kind, text } => {
                let (class, open, close) = match kind {
                    MathType::InlineMath => ("math inline", "\\(", "\\)"),
                    MathType::DisplayMath => ("math display", "\\[", "\\]"),
                };
                write!(
                    out,
                    r#"<span class="{class}">{open}{}{close}</span>"#,
                    escape_html(text)
                )
                .unwrap();
            }
            Inline::RawInline { format, text } => {
                if self.backend.accepts_raw(format) {
                    out.push_str(text);
                }
            }
            Inline::Link {
                attr,
                content,
                target,
            } => {
                write!(
                    out,
                    r#"<a href="{}"{}{}>{}</a>"#,
                    escape_html(&target.url),
                    title_attribute(&target.title),
                    attributes(attr),
                    self.inlines(content)?
                )
                .unwrap();
            }
            Inline::Image {
                attr,
                content,
                target,
            } => out.push_str(&image_tag(attr, content, target)),
            Inline::Note(blocks) => {
                let number = self.notes.len() + 1;
                // Reserve the slot before rendering so nested notes number after this one.
                self.notes.push(String::new());
                let body = self.blocks(blocks)?;
                self.notes[number - 1] = body;
                write!(
                    out,
                    r##"<a href="#fn{number}" class="footnote-ref" id="fnref{number}" role="doc-noteref"><sup>{number}</sup></a>"##
                )
                .unwrap();
            }
            Inline::Span { attr, content } => {
                write!(out, "<span{}>{}</span>", attributes(attr), self.inlines(content)?)
                    .unwrap();
            }
        }
        Ok(())
    }

    fn wrap(&mut self, tag: &str, content: &[Inline], out: &mut String) -> Result<(), BackendError> {
        write!(out, "<{tag}>{}</{tag}>", self.inlines(content)?).unwrap();
        Ok(())
    }

    fn write_notes(&self, out: &mut String) {
        write!(
            out,
            "<section id=\"footnotes\" class=\"{}\" role=\"doc-endnotes\">\n<hr />\n<ol>",
            escape_html(&self.options.footnotes_class)
        )
        .unwrap();
        for (i, note) in self.notes.iter().enumerate() {
            let number = i + 1;
            write!(
                out,
                "\n<li id=\"fn{number}\">{note}<a href=\"#fnref{number}\" class=\"footnote-back\" role=\"doc-backlink\">\u{21A9}\u{FE0E}</a></li>"
            )
            .unwrap();
        }
        out.push_str("\n</ol>\n</section>");
    }
}

/// Render `id`, `class` and extra attributes, each with a leading space.
fn attributes(attr: &Attr) -> String {
    let mut out = String::new();
    if !attr.identifier.is_empty() {
        write!(out, r#" id="{}""#, escape_html(&attr.identifier)).unwrap();
    }
    if !attr.classes.is_empty() {
        write!(out, r#" class="{}""#, escape_html(&attr.classes.join(" "))).unwrap();
    }
    for (key, value) in &attr.extras {
        write!(out, r#" {}="{}""#, key, escape_html(value)).unwrap();
    }
    out
}

fn title_attribute(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    }
}

/// `<img>` tag; an explicit `alt` attribute wins over the alternative text.
fn image_tag(attr: &Attr, content: &[Inline], target: &Target) -> String {
    let alt = attr
        .get("alt")
        .map_or_else(|| stringify(content), str::to_owned);
    let rest = without_extra(attr, "alt");
    format!(
        r#"<img src="{}" alt="{}"{}{} />"#,
        escape_html(&target.url),
        escape_html(&alt),
        title_attribute(&target.title),
        attributes(&rest)
    )
}

fn list_attributes(attrs: &ListAttributes) -> String {
    let mut out = String::new();
    if attrs.start != 1 {
        write!(out, r#" start="{}""#, attrs.start).unwrap();
    }
    let kind = match attrs.style {
        ListNumberStyle::LowerAlpha => Some("a"),
        ListNumberStyle::UpperAlpha => Some("A"),
        ListNumberStyle::LowerRoman => Some("i"),
        ListNumberStyle::UpperRoman => Some("I"),
        ListNumberStyle::Decimal | ListNumberStyle::DefaultStyle | ListNumberStyle::Example => None,
    };
    if let Some(kind) = kind {
        write!(out, r#" type="{kind}""#).unwrap();
    }
    out
}

fn align_name(align: Alignment) -> Option<&'static str> {
    match align {
        Alignment::AlignLeft => Some("left"),
        Alignment::AlignRight => Some("right"),
        Alignment::AlignCenter => Some("center"),
        Alignment::AlignDefault => None,
    }
}
