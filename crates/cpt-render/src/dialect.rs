//! Output dialects
//!
//! A [`Dialect`] writes the markup model as text. Two are provided:
//! reStructuredText ([`Rst`]) and Markdown ([`Markdown`]).

use crate::markup::{Block, Fragment, Inline, LinkTarget, Span};
use std::fmt;
use std::str::FromStr;

/// Text writer for the markup model
///
/// Implement this trait to add support for new markup languages.
pub trait Dialect: Send + Sync {
    /// File extension of rendered artifacts (without dot)
    fn extension(&self) -> &'static str;

    /// Write one span
    fn span(&self, span: &Span) -> String;

    /// Write one block, without trailing newline
    fn block(&self, block: &Block) -> String;

    /// Write a line of spans
    fn inline(&self, inline: &Inline) -> String {
        inline.spans().iter().map(|s| self.span(s)).collect()
    }

    /// Write blocks separated by blank lines
    fn blocks(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|b| self.block(b))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Write a whole fragment; non-empty output ends with a newline
    fn render(&self, fragment: &Fragment) -> String {
        if fragment.is_empty() {
            return String::new();
        }
        let mut out = self.blocks(&fragment.blocks);
        out.push('\n');
        out
    }
}

/// Selectable output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// reStructuredText
    #[default]
    Rst,
    /// Markdown
    Markdown,
}

impl Format {
    /// Dialect writing this format
    #[must_use]
    pub fn dialect(self, pages_base_url: Option<&str>) -> Box<dyn Dialect> {
        match self {
            Self::Rst => Box::new(Rst),
            Self::Markdown => Box::new(Markdown::new(pages_base_url.map(str::to_string))),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rst" => Ok(Self::Rst),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(format!("unknown format '{other}' (expected rst or md)")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rst => "rst",
            Self::Markdown => "md",
        })
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn prefixed_lines(dialect: &dyn Dialect, lines: &[Inline], prefix: &str, empty: &str) -> String {
    lines
        .iter()
        .map(|line| {
            let text = dialect.inline(line);
            if text.is_empty() {
                empty.to_string()
            } else {
                format!("{prefix}{text}").trim_end().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// reStructuredText writer
#[derive(Debug, Clone, Copy, Default)]
pub struct Rst;

impl Rst {
    const UNDERLINES: [char; 4] = ['=', '-', '^', '"'];

    fn list_table(&self, options: &[String], rows: &[Vec<Inline>]) -> String {
        let mut out = String::from(".. list-table::");
        for option in options {
            out.push_str("\n   ");
            out.push_str(option);
        }
        out.push('\n');
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                let marker = if i == 0 { "\n   * -" } else { "\n     -" };
                out.push_str(marker);
                let text = self.inline(cell);
                if !text.is_empty() {
                    out.push(' ');
                    out.push_str(&text);
                }
            }
        }
        out
    }
}

impl Dialect for Rst {
    fn extension(&self) -> &'static str {
        "rst"
    }

    fn span(&self, span: &Span) -> String {
        match span {
            Span::Text(t) => t.clone(),
            Span::Emphasis(t) => format!("*{t}*"),
            Span::Strong(t) => format!("**{t}**"),
            Span::Literal(t) => format!("``{t}``"),
            Span::Link {
                label,
                target: LinkTarget::Internal { anchor, .. },
            } => format!(":ref:`{label} <{anchor}>`"),
            Span::Link {
                label,
                target: LinkTarget::External(url),
            } => format!("`{label} <{url}>`_"),
        }
    }

    fn block(&self, block: &Block) -> String {
        match block {
            Block::Anchor(anchor) => format!(".. _{anchor}:"),
            Block::Heading { level, text } => {
                let text = self.inline(text);
                let index = usize::from(level.saturating_sub(1)).min(Self::UNDERLINES.len() - 1);
                let underline: String = std::iter::repeat(Self::UNDERLINES[index])
                    .take(text.chars().count())
                    .collect();
                format!("{text}\n{underline}")
            }
            Block::Rubric {
                role,
                title,
                suffix,
            } => match role {
                Some(role) => format!(".. rubric:: :{role}:`{title}`{suffix}"),
                None => format!(".. rubric:: {title}{suffix}"),
            },
            Block::Topic { title, body } => {
                let head = format!(".. topic:: {}", self.inline(title));
                if body.is_empty() {
                    head
                } else {
                    format!("{head}\n\n{}", indent(&self.blocks(body), "  "))
                }
            }
            Block::Fields(rows) => {
                let rows: Vec<Vec<Inline>> = rows
                    .iter()
                    .map(|(label, value)| vec![Inline::text(label.clone()), value.clone()])
                    .collect();
                self.list_table(&[":widths: 1 3".to_string()], &rows)
            }
            Block::Paragraph(lines) => prefixed_lines(self, lines, "", ""),
            Block::Indented(lines) => prefixed_lines(self, lines, "  ", ""),
            Block::Quote(lines) => prefixed_lines(self, lines, "   ", ""),
            Block::Bullets(items) => prefixed_lines(self, items, "* ", "*"),
            Block::Table {
                widths,
                header,
                rows,
            } => {
                let widths: Vec<String> = widths.iter().map(ToString::to_string).collect();
                let mut options = vec![format!(":widths: {}", widths.join(" "))];
                let mut all_rows = Vec::with_capacity(rows.len() + 1);
                if let Some(header) = header {
                    options.push(":header-rows: 1".to_string());
                    all_rows.push(header.clone());
                }
                all_rows.extend(rows.iter().cloned());
                self.list_table(&options, &all_rows)
            }
            Block::Warning(text) => format!(".. warning::\n\n   {}", self.inline(text)),
        }
    }
}

/// Markdown writer
#[derive(Debug, Clone, Default)]
pub struct Markdown {
    pages_base_url: Option<String>,
}

impl Markdown {
    /// Create writer; internal links on known pages resolve against `pages_base_url`
    #[inline]
    #[must_use]
    pub fn new(pages_base_url: Option<String>) -> Self {
        Self { pages_base_url }
    }

    fn url(&self, anchor: &str, page: Option<&str>) -> String {
        match (self.pages_base_url.as_deref(), page) {
            (Some(base), Some(page)) => {
                format!("{}/{page}.html#{anchor}", base.trim_end_matches('/'))
            }
            (None, Some(page)) => format!("{page}.html#{anchor}"),
            (_, None) => format!("#{anchor}"),
        }
    }

    fn row(&self, cells: &[Inline]) -> String {
        let cells: Vec<String> = cells.iter().map(|c| self.inline(c)).collect();
        format!("| {} |", cells.join(" | "))
    }
}

impl Dialect for Markdown {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn span(&self, span: &Span) -> String {
        match span {
            Span::Text(t) => t.clone(),
            Span::Emphasis(t) => format!("*{t}*"),
            Span::Strong(t) => format!("**{t}**"),
            Span::Literal(t) => format!("`{t}`"),
            Span::Link {
                label,
                target: LinkTarget::Internal { anchor, page },
            } => format!("[{label}]({})", self.url(anchor, page.as_deref())),
            Span::Link {
                label,
                target: LinkTarget::External(url),
            } => format!("[{label}]({url})"),
        }
    }

    fn block(&self, block: &Block) -> String {
        match block {
            Block::Anchor(anchor) => format!("<a id=\"{anchor}\"></a>"),
            Block::Heading { level, text } => {
                let hashes = "#".repeat(usize::from((*level).max(1)));
                format!("{hashes} {}", self.inline(text))
            }
            Block::Rubric { title, suffix, .. } => format!("**{title}{suffix}**"),
            Block::Topic { title, body } => {
                let head = format!("**{}**", self.inline(title));
                if body.is_empty() {
                    head
                } else {
                    format!("{head}\n\n{}", self.blocks(body))
                }
            }
            Block::Fields(rows) => rows
                .iter()
                .map(|(label, value)| format!("- {label}: {}", self.inline(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Paragraph(lines) => prefixed_lines(self, lines, "", ""),
            Block::Indented(lines) => prefixed_lines(self, lines, "  ", ""),
            Block::Quote(lines) => prefixed_lines(self, lines, "> ", ">"),
            Block::Bullets(items) => prefixed_lines(self, items, "- ", "-"),
            Block::Table { header, rows, .. } => {
                let columns = header
                    .as_ref()
                    .map(Vec::len)
                    .or_else(|| rows.first().map(Vec::len))
                    .unwrap_or(0);
                let blank = vec![Inline::new(); columns];
                let mut lines = vec![
                    self.row(header.as_deref().unwrap_or(&blank)),
                    format!("|{}", " --- |".repeat(columns)),
                ];
                lines.extend(rows.iter().map(|r| self.row(r)));
                lines.join("\n")
            }
            Block::Warning(text) => format!("> **Warning:** {}", self.inline(text)),
        }
    }
}
