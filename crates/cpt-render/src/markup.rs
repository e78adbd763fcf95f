//! Markup-agnostic document model
//!
//! Renderers build a [`Fragment`] of [`Block`]s; a [`crate::Dialect`] turns
//! it into text.

/// Where a link points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Anchor inside the handbook, optionally on a known page
    Internal {
        /// Anchor string
        anchor: String,
        /// Page the anchor lives on, if known
        page: Option<String>,
    },
    /// Absolute URL
    External(String),
}

/// Inline run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain text, written as is
    Text(String),
    /// Emphasized text
    Emphasis(String),
    /// Strong text
    Strong(String),
    /// Inline literal
    Literal(String),
    /// Hyperlink
    Link {
        /// Visible label
        label: String,
        /// Destination
        target: LinkTarget,
    },
}

/// Sequence of spans forming one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inline(pub Vec<Span>);

impl Inline {
    /// Empty line
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Line holding plain text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self(vec![Span::Text(text.into())])
    }

    /// Line holding one span
    #[must_use]
    pub fn span(span: Span) -> Self {
        Self(vec![span])
    }

    /// Append a span
    #[must_use]
    pub fn with(mut self, span: Span) -> Self {
        self.0.push(span);
        self
    }

    /// Append plain text
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with(Span::Text(text.into()))
    }

    /// Append every span of another line
    #[must_use]
    pub fn concat(mut self, other: Inline) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Spans
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.0
    }

    /// Whether the line has no span
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join lines with a separator
    #[must_use]
    pub fn join(items: Vec<Inline>, separator: &str) -> Self {
        let mut out = Self::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                out.0.push(Span::Text(separator.to_string()));
            }
            out = out.concat(item);
        }
        out
    }

    /// Join lines as `a`, `a, and b`, `a, b, and c`
    #[must_use]
    pub fn oxford(items: Vec<Inline>) -> Self {
        let count = items.len();
        let mut out = Self::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                let separator = if i + 1 == count { ", and " } else { ", " };
                out.0.push(Span::Text(separator.to_string()));
            }
            out = out.concat(item);
        }
        out
    }
}

impl From<Span> for Inline {
    fn from(span: Span) -> Self {
        Self::span(span)
    }
}

/// Block-level element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Cross-link target
    Anchor(String),
    /// Section heading, level 1 is outermost
    Heading {
        /// Nesting level
        level: u8,
        /// Heading text
        text: Inline,
    },
    /// Free-standing title, optionally styled by a role
    Rubric {
        /// Styling role (reStructuredText only)
        role: Option<String>,
        /// Title
        title: String,
        /// Text following the title
        suffix: String,
    },
    /// Titled, indented group of blocks
    Topic {
        /// Title
        title: Inline,
        /// Contents
        body: Vec<Block>,
    },
    /// Label / value rows
    Fields(Vec<(String, Inline)>),
    /// Lines of a paragraph
    Paragraph(Vec<Inline>),
    /// Lines indented under the previous block
    Indented(Vec<Inline>),
    /// Quoted lines
    Quote(Vec<Inline>),
    /// Bulleted list, one item per entry
    Bullets(Vec<Inline>),
    /// Table with optional header row
    Table {
        /// Relative column widths
        widths: Vec<u8>,
        /// Header cells
        header: Option<Vec<Inline>>,
        /// Body rows
        rows: Vec<Vec<Inline>>,
    },
    /// Warning admonition
    Warning(Inline),
}

impl Block {
    /// One-line paragraph
    #[must_use]
    pub fn line(inline: Inline) -> Self {
        Self::Paragraph(vec![inline])
    }

    /// One-line paragraph of plain text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::line(Inline::text(text))
    }
}

/// Ordered blocks of one output artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Blocks in output order
    pub blocks: Vec<Block>,
}

impl Fragment {
    /// Empty fragment
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Append blocks
    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    /// Whether nothing was added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
