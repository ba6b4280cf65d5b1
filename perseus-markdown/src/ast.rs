//! AST node types for parsed exercise content
//!
//! A document is a flat list of block-level nodes. Block nodes contain
//! inline nodes (text, math, widgets, images). The tree is immutable during
//! a render pass, with one exception: a linter may wrap nodes in `Lint`
//! annotations in place before the render walk starts.

use serde::{Deserialize, Serialize};

/// A node in the content AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// A run of plain text.
    Text { content: String },
    /// Inline TeX, `$...$`.
    Math { content: String },
    /// Display TeX: a paragraph consisting of a single math span.
    BlockMath { content: String },
    /// A widget placeholder, `[[☃ input-number 1]]`.
    Widget {
        id: String,
        #[serde(rename = "widgetType")]
        widget_type: String,
    },
    /// An image, `![alt](url "title")`.
    Image {
        target: String,
        alt: Option<String>,
        title: Option<String>,
    },
    /// A block-level paragraph wrapping inline children.
    Paragraph { content: Vec<Node> },
    /// An ATX heading, `## Heading`.
    Heading { level: u8, content: Vec<Node> },
    /// An ordered or unordered list. Each item is a list of inline nodes.
    List { ordered: bool, items: Vec<Vec<Node>> },
    /// A pipe table. Cells hold inline nodes.
    Table {
        header: Vec<Vec<Node>>,
        rows: Vec<Vec<Vec<Node>>>,
    },
    /// A two-column layout: everything before the `===` separator on the
    /// left, everything after it on the right.
    Columns { columns: Vec<Vec<Node>> },
    /// A fenced code block.
    CodeBlock {
        lang: Option<String>,
        content: String,
    },
    /// A lint annotation injected around `content` by the linter.
    Lint {
        content: Box<Node>,
        message: String,
        rule: String,
    },
}

impl Node {
    /// True if the node is (or wraps) text containing non-whitespace.
    ///
    /// Used by the renderer to decide whether a paragraph should be
    /// centered (widget-only paragraphs are) or left-aligned.
    pub fn contains_visible_text(&self) -> bool {
        match self {
            Node::Text { content } => content.chars().any(|c| !c.is_whitespace()),
            Node::Lint { content, .. } => content.contains_visible_text(),
            _ => false,
        }
    }

    /// The widget id, if this node is a widget placeholder.
    pub fn widget_id(&self) -> Option<&str> {
        match self {
            Node::Widget { id, .. } => Some(id),
            Node::Lint { content, .. } => content.widget_id(),
            _ => None,
        }
    }
}

/// Collect the ids of every widget placeholder in document order.
pub fn collect_widget_ids(nodes: &[Node]) -> Vec<String> {
    let mut ids = Vec::new();
    collect_into(nodes, &mut ids);
    ids
}

fn collect_into(nodes: &[Node], ids: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Widget { id, .. } => ids.push(id.clone()),
            Node::Paragraph { content } | Node::Heading { content, .. } => {
                collect_into(content, ids)
            }
            Node::List { items, .. } => {
                for item in items {
                    collect_into(item, ids);
                }
            }
            Node::Table { header, rows } => {
                for cell in header {
                    collect_into(cell, ids);
                }
                for row in rows {
                    for cell in row {
                        collect_into(cell, ids);
                    }
                }
            }
            Node::Columns { columns } => {
                for column in columns {
                    collect_into(column, ids);
                }
            }
            Node::Lint { content, .. } => collect_into(std::slice::from_ref(content), ids),
            _ => {}
        }
    }
}
