//! Constructor arguments handed to node handlers.
//!
//! By the time a handler runs, every child of the node has already been
//! rendered, so an [`Element`] carries child output as strings next to the
//! node's own fields. Attributes travel as a flat [`AttrList`].

use refit_ast::{
    Alignment, AttrList, Citation, ListAttributes, MathType, NodeKind, QuoteType,
};

/// One node ready for its handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// The whole document body, already joined.
    Document { body: String },

    Plain(String),
    Para(String),
    LineBlock(Vec<String>),
    CodeBlock {
        text: String,
        attrs: AttrList,
    },
    RawBlock {
        format: String,
        text: String,
    },
    BlockQuote(String),
    OrderedList {
        items: Vec<String>,
        attrs: ListAttributes,
    },
    BulletList(Vec<String>),
    /// Terms paired with their rendered definitions.
    DefinitionList(Vec<(String, Vec<String>)>),
    Header {
        level: u8,
        content: String,
        attrs: AttrList,
    },
    HorizontalRule,
    /// Table in the simple parallel-array shape.
    Table {
        caption: String,
        aligns: Vec<Alignment>,
        widths: Vec<f64>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        /// Header rows after the first.
        subheaders: Vec<Vec<String>>,
        footer: Vec<Vec<String>>,
        attrs: AttrList,
    },
    CaptionedImage {
        src: String,
        title: String,
        /// Rendered caption.
        caption: String,
        /// Caption as markup-free text, used as the fallback `alt`.
        caption_text: String,
        attrs: AttrList,
    },
    Div {
        content: String,
        attrs: AttrList,
    },

    Str(String),
    Emph(String),
    Strong(String),
    Subscript(String),
    Superscript(String),
    SmallCaps(String),
    Strikeout(String),
    Quoted {
        kind: QuoteType,
        content: String,
    },
    Cite {
        content: String,
        citations: Vec<Citation>,
    },
    Code {
        text: String,
        attrs: AttrList,
    },
    Space,
    SoftBreak,
    LineBreak,
    Math {
        kind: MathType,
        text: String,
    },
    RawInline {
        format: String,
        text: String,
    },
    Link {
        content: String,
        url: String,
        title: String,
        attrs: AttrList,
    },
    Image {
        content: String,
        src: String,
        title: String,
        /// Description as markup-free text, used as the fallback `alt`.
        alt_text: String,
        attrs: AttrList,
    },
    /// Rendered footnote body.
    Note(String),
    Span {
        content: String,
        attrs: AttrList,
    },
}

impl Element {
    /// Kind used to pick the handler.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Document { .. } => NodeKind::Document,
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
            Self::Table { .. } => NodeKind::Table,
            Self::CaptionedImage { .. } => NodeKind::CaptionedImage,
            Self::Div { .. } => NodeKind::Div,
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
}
