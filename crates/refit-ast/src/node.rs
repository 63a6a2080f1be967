//! Block and inline document nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attr::Attr;
use crate::table::Table;

/// Block-level document node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    /// Inline content without paragraph semantics.
    Plain(Vec<Inline>),
    /// Paragraph.
    Para(Vec<Inline>),
    /// Lines whose breaks are significant.
    LineBlock(Vec<Vec<Inline>>),
    /// Literal code block.
    CodeBlock { attr: Attr, text: String },
    /// Content already written in some output format.
    RawBlock { format: String, text: String },
    /// Quoted block content.
    BlockQuote(Vec<Block>),
    /// Numbered list.
    OrderedList {
        attrs: ListAttributes,
        items: Vec<Vec<Block>>,
    },
    /// Unnumbered list.
    BulletList(Vec<Vec<Block>>),
    /// Terms with their definitions.
    DefinitionList(Vec<DefinitionItem>),
    /// Section heading, level 1 to 6.
    Header {
        level: u8,
        attr: Attr,
        content: Vec<Inline>,
    },
    /// Thematic break.
    HorizontalRule,
    /// Table in canonical form.
    Table(Box<Table>),
    /// Stand-alone image with a caption.
    CaptionedImage {
        attr: Attr,
        src: String,
        title: String,
        caption: Vec<Inline>,
    },
    /// Generic block container.
    Div { attr: Attr, content: Vec<Block> },
}

/// Inline document node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    /// Text.
    Str(String),
    Emph(Vec<Inline>),
    Strong(Vec<Inline>),
    Subscript(Vec<Inline>),
    Superscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Strikeout(Vec<Inline>),
    /// Quoted text.
    Quoted {
        kind: QuoteType,
        content: Vec<Inline>,
    },
    /// Citation with its rendered content.
    Cite {
        citations: Vec<Citation>,
        content: Vec<Inline>,
    },
    /// Inline code.
    Code { attr: Attr, text: String },
    /// Inter-word space.
    Space,
    /// Source line break without semantic meaning.
    SoftBreak,
    /// Hard line break.
    LineBreak,
    /// TeX math.
    Math { kind: MathType, text: String },
    /// Content already written in some output format.
    RawInline { format: String, text: String },
    /// Hyperlink.
    Link {
        attr: Attr,
        content: Vec<Inline>,
        target: Target,
    },
    /// Inline image; `content` is the alternative text.
    Image {
        attr: Attr,
        content: Vec<Inline>,
        target: Target,
    },
    /// Footnote body.
    Note(Vec<Block>),
    /// Generic inline container.
    Span { attr: Attr, content: Vec<Inline> },
}

/// Link or image destination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl Target {
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Quotation mark style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

/// Math display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathType {
    DisplayMath,
    InlineMath,
}

/// Numbering style of an ordered list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListNumberStyle {
    #[default]
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

/// Delimiter following an ordered list number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListNumberDelim {
    #[default]
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

/// Ordered list numbering attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListAttributes {
    pub start: u32,
    pub style: ListNumberStyle,
    pub delim: ListNumberDelim,
}

impl Default for ListAttributes {
    fn default() -> Self {
        Self {
            start: 1,
            style: ListNumberStyle::default(),
            delim: ListNumberDelim::default(),
        }
    }
}

/// One term of a definition list with its definitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefinitionItem {
    pub term: Vec<Inline>,
    pub definitions: Vec<Vec<Block>>,
}

/// How a citation is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    #[default]
    NormalCitation,
}

/// A single bibliographic reference inside a [`Inline::Cite`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Citation {
    pub id: String,
    pub prefix: Vec<Inline>,
    pub suffix: Vec<Inline>,
    pub mode: CitationMode,
    pub note_num: u32,
    pub hash: u32,
}

/// Tag naming which kind of node a value is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Document,
    // Blocks
    Plain,
    Para,
    LineBlock,
    CodeBlock,
    RawBlock,
    BlockQuote,
    OrderedList,
    BulletList,
    DefinitionList,
    Header,
    HorizontalRule,
    Table,
    CaptionedImage,
    Div,
    // Inlines
    Str,
    Emph,
    Strong,
    Subscript,
    Superscript,
    SmallCaps,
    Strikeout,
    Quoted,
    Cite,
    Code,
    Space,
    SoftBreak,
    LineBreak,
    Math,
    RawInline,
    Link,
    Image,
    Note,
    Span,
}

impl NodeKind {
    /// Every node kind, in declaration order.
    pub const ALL: [Self; 34] = [
        Self::Document,
        Self::Plain,
        Self::Para,
        Self::LineBlock,
        Self::CodeBlock,
        Self::RawBlock,
        Self::BlockQuote,
        Self::OrderedList,
        Self::BulletList,
        Self::DefinitionList,
        Self::Header,
        Self::HorizontalRule,
        Self::Table,
        Self::CaptionedImage,
        Self::Div,
        Self::Str,
        Self::Emph,
        Self::Strong,
        Self::Subscript,
        Self::Superscript,
        Self::SmallCaps,
        Self::Strikeout,
        Self::Quoted,
        Self::Cite,
        Self::Code,
        Self::Space,
        Self::SoftBreak,
        Self::LineBreak,
        Self::Math,
        Self::RawInline,
        Self::Link,
        Self::Image,
        Self::Note,
        Self::Span,
    ];

    /// Name of the kind as it appears in diagnostics and serialized trees.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Plain => "Plain",
            Self::Para => "Para",
            Self::LineBlock => "LineBlock",
            Self::CodeBlock => "CodeBlock",
            Self::RawBlock => "RawBlock",
            Self::BlockQuote => "BlockQuote",
            Self::OrderedList => "OrderedList",
            Self::BulletList => "BulletList",
            Self::DefinitionList => "DefinitionList",
            Self::Header => "Header",
            Self::HorizontalRule => "HorizontalRule",
            Self::Table => "Table",
            Self::CaptionedImage => "CaptionedImage",
            Self::Div => "Div",
            Self::Str => "Str",
            Self::Emph => "Emph",
            Self::Strong => "Strong",
            Self::Subscript => "Subscript",
            Self::Superscript => "Superscript",
            Self::SmallCaps => "SmallCaps",
            Self::Strikeout => "Strikeout",
            Self::Quoted => "Quoted",
            Self::Cite => "Cite",
            Self::Code => "Code",
            Self::Space => "Space",
            Self::SoftBreak => "SoftBreak",
            Self::LineBreak => "LineBreak",
            Self::Math => "Math",
            Self::RawInline => "RawInline",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::Note => "Note",
            Self::Span => "Span",
        }
    }

    /// True for block-level kinds.
    #[must_use]
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::Plain
                | Self::Para
                | Self::LineBlock
                | Self::CodeBlock
                | Self::RawBlock
                | Self::BlockQuote
                | Self::OrderedList
                | Self::BulletList
                | Self::DefinitionList
                | Self::Header
                | Self::HorizontalRule
                | Self::Table
                | Self::CaptionedImage
                | Self::Div
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Block {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Plain(_) => NodeKind::Plain,
            Self::Para(_) => NodeKind::Para,
            Self::LineBlock(_) => NodeKind::LineBlock,
            Self::CodeBlock { .. } => NodeKind::CodeBlock,
            Self::RawBlock { .. } => NodeKind::RawBlock,
            Self::BlockQuote(_) => NodeKind::BlockQuote,
            Self::OrderedList { .. } => NodeKind::OrderedList,
            Self::BulletList(_) => NodeKind::BulletList,
            Self::DefinitionList(_) => NodeKind::DefinitionList,
            Self::Header { .. } => NodeKind::Header,
            Self::HorizontalRule => NodeKind::HorizontalRule,
            Self::Table(_) => NodeKind::Table,
            Self::CaptionedImage { .. } => NodeKind::CaptionedImage,
            Self::Div { .. } => NodeKind::Div,
        }
    }

    /// Raw block in the given format.
    #[must_use]
    pub fn raw(format: impl Into<String>, text: impl Into<String>) -> Self {
        Self::RawBlock {
            format: format.into(),
            text: text.into(),
        }
    }
}

impl Inline {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Str(_) => NodeKind::Str,
            Self::Emph(_) => NodeKind::Emph,
            Self::Strong(_) => NodeKind::Strong,
            Self::Subscript(_) => NodeKind::Subscript,
            Self::Superscript(_) => NodeKind::Superscript,
            Self::SmallCaps(_) => NodeKind::SmallCaps,
            Self::Strikeout(_) => NodeKind::Strikeout,
            Self::Quoted { .. } => NodeKind::Quoted,
            Self::Cite { .. } => NodeKind::Cite,
            Self::Code { .. } => NodeKind::Code,
            Self::Space => NodeKind::Space,
            Self::SoftBreak => NodeKind::SoftBreak,
            Self::LineBreak => NodeKind::LineBreak,
            Self::Math { .. } => NodeKind::Math,
            Self::RawInline { .. } => NodeKind::RawInline,
            Self::Link { .. } => NodeKind::Link,
            Self::Image { .. } => NodeKind::Image,
            Self::Note(_) => NodeKind::Note,
            Self::Span { .. } => NodeKind::Span,
        }
    }

    /// Text node.
    #[must_use]
    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    /// Raw inline in the given format.
    #[must_use]
    pub fn raw(format: impl Into<String>, text: impl Into<String>) -> Self {
        Self::RawInline {
            format: format.into(),
            text: text.into(),
        }
    }
}

/// Flatten inline content to plain text.
///
/// Markup is dropped, spaces and breaks become a single space, quotes become
/// ASCII quote marks. Raw content and footnotes contribute nothing.
#[must_use]
pub fn stringify(inlines: &[Inline]) -> String {
    let mut out = String::new();
    stringify_into(inlines, &mut out);
    out
}

fn stringify_into(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Str(text) | Inline::Code { text, .. } | Inline::Math { text, .. } => {
                out.push_str(text);
            }
            Inline::Space | Inline::SoftBreak | Inline::LineBreak => out.push(' '),
            Inline::Quoted { kind, content } => {
                let mark = match kind {
                    QuoteType::SingleQuote => '\'',
                    QuoteType::DoubleQuote => '"',
                };
                out.push(mark);
                stringify_into(content, out);
                out.push(mark);
            }
            Inline::Emph(content)
            | Inline::Strong(content)
            | Inline::Subscript(content)
            | Inline::Superscript(content)
            | Inline::SmallCaps(content)
            | Inline::Strikeout(content)
            | Inline::Cite { content, .. }
            | Inline::Link { content, .. }
            | Inline::Image { content, .. }
            | Inline::Span { content, .. } => stringify_into(content, out),
            Inline::RawInline { .. } | Inline::Note(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stringify_flattens_markup() {
        let inlines = vec![
            Inline::Strong(vec![Inline::Emph(vec![Inline::str("foo")])]),
            Inline::Space,
            Inline::Quoted {
                kind: QuoteType::DoubleQuote,
                content: vec![Inline::str("bar")],
            },
            Inline::LineBreak,
            Inline::Code {
                attr: Attr::default(),
                text: "x < y".to_owned(),
            },
        ];
        assert_eq!(stringify(&inlines), r#"foo "bar" x < y"#);
    }

    #[test]
    fn test_stringify_skips_raw_and_notes() {
        let inlines = vec![
            Inline::str("a"),
            Inline::raw("html", "<b>"),
            Inline::Note(vec![Block::Para(vec![Inline::str("hidden")])]),
            Inline::str("b"),
        ];
        assert_eq!(stringify(&inlines), "ab");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Inline::Space.kind().to_string(), "Space");
        assert_eq!(Block::HorizontalRule.kind().name(), "HorizontalRule");
        assert!(NodeKind::Div.is_block());
        assert!(!NodeKind::Note.is_block());
        assert!(!NodeKind::Document.is_block());
    }

    #[test]
    fn test_all_kinds_unique() {
        let mut names: Vec<_> = NodeKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NodeKind::ALL.len());
    }

    #[test]
    fn test_serde_tagged_form() {
        let block = Block::Para(vec![Inline::str("hi"), Inline::Space]);
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(
            json,
            r#"{"t":"Para","c":[{"t":"Str","c":"hi"},{"t":"Space"}]}"#
        );
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
