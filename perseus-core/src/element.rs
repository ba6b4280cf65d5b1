//! The renderable element tree the renderer produces.
//!
//! Elements are plain data: a UI layer (terminal viewer, HTML emitter,
//! test harness) walks the tree and draws it however it likes. Widget
//! elements are slots carrying the widget id; the live instance is fetched
//! from the renderer.

use serde::Serialize;

use crate::types::Alignment;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    /// Top-level paragraph wrapper. `centered` is set when the paragraph
    /// contains no visible prose (math or widgets only); `full_width` when
    /// its single child is a full-width widget.
    Paragraph {
        index: usize,
        centered: bool,
        full_width: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        translation_index: Option<usize>,
        children: Vec<Element>,
    },
    Text {
        content: String,
    },
    Math {
        tex: String,
        block: bool,
        /// Block math is zoomable on mobile hosts.
        zoomable: bool,
    },
    Image {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
        responsive: bool,
    },
    /// Slot for a live widget instance, looked up by id on the renderer.
    Widget {
        id: String,
        widget_type: String,
        alignment: Alignment,
        is_static: bool,
        highlighted: bool,
    },
    /// Inline error shown where a widget could not be rendered.
    WidgetError {
        id: String,
        message: String,
    },
    /// Stand-in emitted when api options request placeholders.
    Placeholder {
        label: String,
    },
    Heading {
        level: u8,
        children: Vec<Element>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Element>>,
    },
    Table {
        header: Vec<Vec<Element>>,
        rows: Vec<Vec<Vec<Element>>>,
        zoomable: bool,
    },
    Columns {
        columns: Vec<Vec<Element>>,
    },
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        content: String,
    },
    /// Lint annotation wrapping the offending element.
    Lint {
        message: String,
        rule: String,
        child: Box<Element>,
    },
    /// Untranslated content awaiting in-place translation; the host editor
    /// targets it by translation index.
    JiptPlaceholder {
        translation_index: usize,
        content: String,
    },
}

/// One full render pass' output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedContent {
    pub elements: Vec<Element>,
    /// Whether the content used the two-column layout marker.
    pub two_column: bool,
}

impl Element {
    /// Depth-first visit of this element and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        visit(self);
        match self {
            Element::Paragraph { children, .. } | Element::Heading { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            Element::List { items, .. } => {
                for item in items {
                    for child in item {
                        child.walk(visit);
                    }
                }
            }
            Element::Table { header, rows, .. } => {
                for cell in header {
                    for child in cell {
                        child.walk(visit);
                    }
                }
                for row in rows {
                    for cell in row {
                        for child in cell {
                            child.walk(visit);
                        }
                    }
                }
            }
            Element::Columns { columns } => {
                for column in columns {
                    for child in column {
                        child.walk(visit);
                    }
                }
            }
            Element::Lint { child, .. } => child.walk(visit),
            _ => {}
        }
    }
}

impl RenderedContent {
    /// Widget ids in the order their slots appear in the tree.
    pub fn widget_slot_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for element in &self.elements {
            element.walk(&mut |el| {
                if let Element::Widget { id, .. } = el {
                    ids.push(id.as_str());
                }
            });
        }
        ids
    }
}
