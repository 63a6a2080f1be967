//! Standard node handlers.
//!
//! Each handler rebuilds its node around already rendered children, marked as
//! raw content of the output format, and serializes it through the writer.

use refit_ast::{Attr, AttrList, Block, DefinitionItem, Inline, SimpleTable, Table, Target};

use crate::element::Element;
use crate::engine::Writer;
use crate::error::WriteError;

fn mismatch(handler: &'static str, element: &Element) -> WriteError {
    WriteError::ElementMismatch {
        handler,
        found: element.kind(),
    }
}

fn attr(attrs: &AttrList) -> Result<Attr, WriteError> {
    Ok(Attr::try_from(attrs)?)
}

/// Each list item becomes one plain block of raw content.
fn list_items(writer: &Writer<'_>, items: Vec<String>) -> Vec<Vec<Block>> {
    items
        .into_iter()
        .map(|item| vec![Block::Plain(vec![writer.raw_inline(item)])])
        .collect()
}

/// Shared by every node that only wraps its content.
pub(crate) fn wrap_content(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Plain(s) => writer.write(Block::Plain(vec![writer.raw_inline(s)])),
        Element::Para(s) => writer.write(Block::Para(vec![writer.raw_inline(s)])),
        Element::BlockQuote(s) => writer.write(Block::BlockQuote(vec![writer.raw_block(s)])),
        Element::Emph(s) => writer.write(Inline::Emph(vec![writer.raw_inline(s)])),
        Element::Strong(s) => writer.write(Inline::Strong(vec![writer.raw_inline(s)])),
        Element::Subscript(s) => writer.write(Inline::Subscript(vec![writer.raw_inline(s)])),
        Element::Superscript(s) => writer.write(Inline::Superscript(vec![writer.raw_inline(s)])),
        Element::SmallCaps(s) => writer.write(Inline::SmallCaps(vec![writer.raw_inline(s)])),
        Element::Strikeout(s) => writer.write(Inline::Strikeout(vec![writer.raw_inline(s)])),
        other => Err(mismatch("wrap_content", &other)),
    }
}

/// Body followed by the footnote block and a final newline.
pub(crate) fn document(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Document { body } => {
            let notes = writer.flush_footnotes()?;
            Ok(format!("{body}{notes}\n"))
        }
        other => Err(mismatch("document", &other)),
    }
}

pub(crate) fn line_block(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::LineBlock(lines) => {
            let lines = lines
                .into_iter()
                .map(|line| vec![writer.raw_inline(line)])
                .collect();
            writer.write(Block::LineBlock(lines))
        }
        other => Err(mismatch("line_block", &other)),
    }
}

pub(crate) fn code_block(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::CodeBlock { text, attrs } => writer.write(Block::CodeBlock {
            attr: attr(&attrs)?,
            text,
        }),
        other => Err(mismatch("code_block", &other)),
    }
}

pub(crate) fn raw_block(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::RawBlock { format, text } => writer.write(Block::RawBlock { format, text }),
        other => Err(mismatch("raw_block", &other)),
    }
}

pub(crate) fn ordered_list(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::OrderedList { items, attrs } => writer.write(Block::OrderedList {
            attrs,
            items: list_items(writer, items),
        }),
        other => Err(mismatch("ordered_list", &other)),
    }
}

pub(crate) fn bullet_list(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::BulletList(items) => writer.write(Block::BulletList(list_items(writer, items))),
        other => Err(mismatch("bullet_list", &other)),
    }
}

pub(crate) fn definition_list(
    writer: &mut Writer<'_>,
    element: Element,
) -> Result<String, WriteError> {
    match element {
        Element::DefinitionList(entries) => {
            let items = entries
                .into_iter()
                .map(|(term, definitions)| DefinitionItem {
                    term: vec![writer.raw_inline(term)],
                    definitions: list_items(writer, definitions),
                })
                .collect();
            writer.write(Block::DefinitionList(items))
        }
        other => Err(mismatch("definition_list", &other)),
    }
}

pub(crate) fn header(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Header {
            level,
            content,
            attrs,
        } => writer.write(Block::Header {
            level,
            attr: attr(&attrs)?,
            content: vec![writer.raw_inline(content)],
        }),
        other => Err(mismatch("header", &other)),
    }
}

pub(crate) fn horizontal_rule(
    writer: &mut Writer<'_>,
    element: Element,
) -> Result<String, WriteError> {
    match element {
        Element::HorizontalRule => writer.write(Block::HorizontalRule),
        other => Err(mismatch("horizontal_rule", &other)),
    }
}

/// Rebuilds the simple parallel-array table and converts it to canonical form.
pub(crate) fn table(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Table {
            caption,
            aligns,
            widths,
            headers,
            rows,
            subheaders,
            footer,
            attrs,
        } => {
            let cell = |text: String| {
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Block::Plain(vec![writer.raw_inline(text)])]
                }
            };
            let to_rows = |rows: Vec<Vec<String>>| -> Vec<Vec<Vec<Block>>> {
                rows.into_iter()
                    .map(|row| row.into_iter().map(cell).collect())
                    .collect()
            };
            let simple = SimpleTable {
                attr: attr(&attrs)?,
                caption: if caption.is_empty() {
                    Vec::new()
                } else {
                    vec![writer.raw_inline(caption)]
                },
                aligns,
                widths,
                headers: headers.into_iter().map(cell).collect(),
                rows: to_rows(rows),
                subheaders: to_rows(subheaders),
                footer: to_rows(footer),
            };
            writer.write(Block::Table(Box::new(Table::from(simple))))
        }
        other => Err(mismatch("table", &other)),
    }
}

/// The caption text becomes the `alt` attribute unless one is given.
pub(crate) fn captioned_image(
    writer: &mut Writer<'_>,
    element: Element,
) -> Result<String, WriteError> {
    match element {
        Element::CaptionedImage {
            src,
            title,
            caption,
            caption_text,
            attrs,
        } => {
            let mut attr = attr(&attrs)?;
            if attr.get("alt").is_none() {
                attr.set("alt", caption_text);
            }
            writer.write(Block::CaptionedImage {
                attr,
                src,
                title,
                caption: vec![writer.raw_inline(caption)],
            })
        }
        other => Err(mismatch("captioned_image", &other)),
    }
}

pub(crate) fn div(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Div { content, attrs } => writer.write(Block::Div {
            attr: attr(&attrs)?,
            content: vec![writer.raw_block(content)],
        }),
        other => Err(mismatch("div", &other)),
    }
}

pub(crate) fn text(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Str(s) => writer.write(Inline::Str(s)),
        other => Err(mismatch("text", &other)),
    }
}

pub(crate) fn quoted(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Quoted { kind, content } => writer.write(Inline::Quoted {
            kind,
            content: vec![writer.raw_inline(content)],
        }),
        other => Err(mismatch("quoted", &other)),
    }
}

pub(crate) fn cite(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Cite { content, citations } => writer.write(Inline::Cite {
            citations,
            content: vec![writer.raw_inline(content)],
        }),
        other => Err(mismatch("cite", &other)),
    }
}

pub(crate) fn code(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Code { text, attrs } => writer.write(Inline::Code {
            attr: attr(&attrs)?,
            text,
        }),
        other => Err(mismatch("code", &other)),
    }
}

pub(crate) fn space(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Space => writer.write(Inline::Space),
        other => Err(mismatch("space", &other)),
    }
}

pub(crate) fn soft_break(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::SoftBreak => writer.write(Inline::SoftBreak),
        other => Err(mismatch("soft_break", &other)),
    }
}

pub(crate) fn line_break(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::LineBreak => writer.write(Inline::LineBreak),
        other => Err(mismatch("line_break", &other)),
    }
}

pub(crate) fn math(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Math { kind, text } => writer.write(Inline::Math { kind, text }),
        other => Err(mismatch("math", &other)),
    }
}

pub(crate) fn raw_inline(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::RawInline { format, text } => writer.write(Inline::RawInline { format, text }),
        other => Err(mismatch("raw_inline", &other)),
    }
}

pub(crate) fn link(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Link {
            content,
            url,
            title,
            attrs,
        } => writer.write(Inline::Link {
            attr: attr(&attrs)?,
            content: vec![writer.raw_inline(content)],
            target: Target::new(url, title),
        }),
        other => Err(mismatch("link", &other)),
    }
}

/// The description text becomes the `alt` attribute unless one is given.
pub(crate) fn image(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Image {
            content,
            src,
            title,
            alt_text,
            attrs,
        } => {
            let mut attr = attr(&attrs)?;
            if attr.get("alt").is_none() {
                attr.set("alt", alt_text);
            }
            writer.write(Inline::Image {
                attr,
                content: vec![writer.raw_inline(content)],
                target: Target::new(src, title),
            })
        }
        other => Err(mismatch("image", &other)),
    }
}

pub(crate) fn note(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Note(body) => writer.register_footnote(body),
        other => Err(mismatch("note", &other)),
    }
}

pub(crate) fn span(writer: &mut Writer<'_>, element: Element) -> Result<String, WriteError> {
    match element {
        Element::Span { content, attrs } => writer.write(Inline::Span {
            attr: attr(&attrs)?,
            content: vec![writer.raw_inline(content)],
        }),
        other => Err(mismatch("span", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refit_ast::{AttrError, Meta, QuoteType};
    use refit_backend::BackendRegistry;

    use crate::engine::WriterSettings;
    use crate::format::FORMAT_META_KEY;

    fn pairs(items: &[(&str, &str)]) -> AttrList {
        AttrList(
            items
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    fn with_writer<T>(format: &str, f: impl FnOnce(&mut Writer<'_>) -> T) -> T {
        let registry = BackendRegistry::with_defaults();
        let meta = Meta::new().with(FORMAT_META_KEY, format);
        let mut writer = Writer::new(&registry, &meta, &WriterSettings::default()).unwrap();
        f(&mut writer)
    }

    #[test]
    fn test_wrap_content_html() {
        with_writer("html", |w| {
            assert_eq!(
                wrap_content(w, Element::Para("a &amp; b".to_owned())).unwrap(),
                "<p>a &amp; b</p>"
            );
            assert_eq!(wrap_content(w, Element::Emph("x".to_owned())).unwrap(), "<em>x</em>");
            assert_eq!(
                wrap_content(w, Element::BlockQuote("<p>q</p>".to_owned())).unwrap(),
                "<blockquote>\n<p>q</p>\n</blockquote>"
            );
        });
    }

    #[test]
    fn test_wrap_content_rejects_other_elements() {
        with_writer("html", |w| {
            let err = wrap_content(w, Element::HorizontalRule).unwrap_err();
            assert!(matches!(
                err,
                WriteError::ElementMismatch { handler: "wrap_content", .. }
            ));
        });
    }

    #[test]
    fn test_header_attributes() {
        with_writer("html", |w| {
            let out = header(
                w,
                Element::Header {
                    level: 2,
                    content: "Intro".to_owned(),
                    attrs: pairs(&[("id", "intro"), ("class", "a b"), ("lang", "en")]),
                },
            )
            .unwrap();
            assert_eq!(out, r#"<h2 id="intro" class="a b" lang="en">Intro</h2>"#);
        });
    }

    #[test]
    fn test_malformed_attributes() {
        with_writer("html", |w| {
            let err = div(
                w,
                Element::Div {
                    content: "x".to_owned(),
                    attrs: pairs(&[("id", "only")]),
                },
            )
            .unwrap_err();
            assert!(matches!(
                err,
                WriteError::MalformedAttributes(AttrError::Malformed { len: 1 })
            ));
        });
    }

    #[test]
    fn test_captioned_image_alt_from_caption() {
        with_writer("html", |w| {
            let out = captioned_image(
                w,
                Element::CaptionedImage {
                    src: "cat.png".to_owned(),
                    title: String::new(),
                    caption: "A <em>cat</em>".to_owned(),
                    caption_text: "A cat".to_owned(),
                    attrs: pairs(&[("id", ""), ("class", "")]),
                },
            )
            .unwrap();
            assert!(out.contains(r#"alt="A cat""#), "{out}");
            assert!(out.contains("<figcaption>A <em>cat</em></figcaption>"), "{out}");
        });
    }

    #[test]
    fn test_captioned_image_keeps_given_alt() {
        with_writer("html", |w| {
            let out = captioned_image(
                w,
                Element::CaptionedImage {
                    src: "cat.png".to_owned(),
                    title: String::new(),
                    caption: "A cat".to_owned(),
                    caption_text: "A cat".to_owned(),
                    attrs: pairs(&[("id", ""), ("class", ""), ("alt", "Tabby")]),
                },
            )
            .unwrap();
            assert!(out.contains(r#"alt="Tabby""#), "{out}");
            assert!(!out.contains(r#"alt="A cat""#), "{out}");
        });
    }

    #[test]
    fn test_bullet_list_items_are_raw() {
        with_writer("markdown", |w| {
            let out = bullet_list(
                w,
                Element::BulletList(vec!["*one*".to_owned(), "two".to_owned()]),
            )
            .unwrap();
            assert_eq!(out, "- *one*\n- two");
        });
    }

    #[test]
    fn test_table_html() {
        with_writer("html", |w| {
            let out = table(
                w,
                Element::Table {
                    caption: String::new(),
                    aligns: vec![refit_ast::Alignment::AlignDefault; 2],
                    widths: vec![0.0, 0.0],
                    headers: vec![String::new(), String::new()],
                    rows: vec![vec!["1".to_owned(), "<em>2</em>".to_owned()]],
                    subheaders: Vec::new(),
                    footer: vec![vec!["3".to_owned(), "4".to_owned()]],
                    attrs: AttrList::from(&Attr::with_id("t")),
                },
            )
            .unwrap();
            assert!(out.starts_with(r#"<table id="t">"#), "{out}");
            assert!(!out.contains("<thead>"), "{out}");
            assert!(out.contains("<td><em>2</em></td>"), "{out}");
            assert!(out.contains("<tfoot>\n<tr>\n<td>3</td>"), "{out}");
        });
    }

    #[test]
    fn test_quoted_and_space() {
        with_writer("plain", |w| {
            let out = quoted(
                w,
                Element::Quoted {
                    kind: QuoteType::DoubleQuote,
                    content: "hi".to_owned(),
                },
            )
            .unwrap();
            assert_eq!(out, "\u{201C}hi\u{201D}");
            assert_eq!(space(w, Element::Space).unwrap(), " ");
        });
    }

    #[test]
    fn test_note_registers_footnote() {
        with_writer("html", |w| {
            let marker = note(w, Element::Note("body".to_owned())).unwrap();
            assert_eq!(marker, r##"<sup><a href="#fn1" id="fnref1">1</a></sup>"##);
            assert_eq!(w.footnotes().len(), 1);
        });
    }

    #[test]
    fn test_document_appends_footnotes() {
        with_writer("html", |w| {
            let empty = document(
                w,
                Element::Document {
                    body: "<p>x</p>".to_owned(),
                },
            )
            .unwrap();
            assert_eq!(empty, "<p>x</p>\n");

            w.register_footnote("n").unwrap();
            let out = document(
                w,
                Element::Document {
                    body: "<p>x</p>".to_owned(),
                },
            )
            .unwrap();
            assert!(out.starts_with("<p>x</p>\n<div class=\"footnotes\">"), "{out}");
            assert!(out.ends_with("</div>\n"), "{out}");
        });
    }
}
