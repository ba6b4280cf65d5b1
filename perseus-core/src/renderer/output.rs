//! The render pass: parsed markdown in, element tree out.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use perseus_markdown::{parse, url, Node, ParseOptions};

use crate::element::{Element, RenderedContent};
use crate::linter;
use crate::types::Alignment;

use super::Renderer;

/// Accumulator threaded through one render pass.
#[derive(Debug, Default)]
pub(crate) struct PassState {
    /// Images inside tables cannot be responsive.
    in_table: bool,
    /// Whether the current paragraph contains visible prose.
    found_text: bool,
    /// Whether the current paragraph contains a full-width widget.
    found_full_width: bool,
    /// Whether the content used the `===` two-column marker.
    two_column: bool,
}

/// TeX `{align}` environments only work as `{aligned}` in our math
/// renderer.
static ALIGN_ENV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{align\*?\}").unwrap());

/// A bare image url pasted as text, to be swapped for a placeholder when
/// the host asks for one.
static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+\.(png|gif|jpe?g|svg)$").unwrap());

impl Renderer {
    /// Compiles the current content into an element tree.
    ///
    /// The result is memoized on everything the tree depends on; a hit
    /// skips parsing but still commits current props to every widget, so
    /// instances never observe stale props.
    pub fn render(&mut self) -> Rc<RenderedContent> {
        if self.should_render_jipt_placeholder() {
            let translation_index = self.claim_translation_index();
            if !self.options.api_options.is_article {
                let rendered = Rc::new(RenderedContent {
                    elements: vec![Element::JiptPlaceholder {
                        translation_index,
                        content: self.options.content.clone(),
                    }],
                    two_column: false,
                });
                self.widget_ids.clear();
                self.memo = None;
                self.fire_on_render();
                return rendered;
            }
        }

        let signature = self.render_signature();
        if let Some(rendered) = self.memo_hit(&signature) {
            self.push_all_widget_props();
            self.fire_on_render();
            return rendered;
        }

        let content = self.effective_content().to_string();
        let mut nodes = parse(
            &content,
            &ParseOptions {
                is_jipt: self.translation_index.is_some(),
            },
        );
        if self.options.linter_context.highlight_lint {
            if let Some(content_linter) = &self.linter {
                content_linter.run(&mut nodes, &self.options.linter_context);
            }
            linter::apply_translation_lint_errors(&mut nodes, &self.translation_lint_errors);
        }

        self.widget_ids.clear();
        let mut pass = PassState::default();
        let elements = self.output_blocks(&nodes, &mut pass);
        let rendered = Rc::new(RenderedContent {
            elements,
            two_column: pass.two_column,
        });

        self.prune_stale_instances();
        self.push_all_widget_props();
        self.store_memo(signature, rendered.clone());
        self.fire_on_render();
        rendered
    }

    /// Renders top-level blocks, wrapping each in a paragraph element that
    /// carries layout classification.
    fn output_blocks(&mut self, nodes: &[Node], pass: &mut PassState) -> Vec<Element> {
        let translation_index = self.translation_index;
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                pass.found_text = false;
                pass.found_full_width = false;
                let (children, single_child) = match node {
                    Node::Paragraph { content } => {
                        (self.output_nodes(content, pass), content.len() == 1)
                    }
                    other => (vec![self.output_node(other, pass)], true),
                };
                Element::Paragraph {
                    index,
                    centered: !pass.found_text,
                    full_width: pass.found_full_width && single_child,
                    translation_index,
                    children,
                }
            })
            .collect()
    }

    fn output_nodes(&mut self, nodes: &[Node], pass: &mut PassState) -> Vec<Element> {
        nodes
            .iter()
            .map(|node| self.output_node(node, pass))
            .collect()
    }

    fn output_node(&mut self, node: &Node, pass: &mut PassState) -> Element {
        match node {
            Node::Text { content } => {
                if content.chars().any(|c| !c.is_whitespace()) {
                    pass.found_text = true;
                }
                if let Some(label) = &self.options.api_options.image_placeholder {
                    if IMAGE_URL_RE.is_match(content.trim()) {
                        return Element::Placeholder {
                            label: label.clone(),
                        };
                    }
                }
                Element::Text {
                    content: content.clone(),
                }
            }
            Node::Math { content } => Element::Math {
                tex: ALIGN_ENV_RE.replace_all(content, "{aligned}").into_owned(),
                block: false,
                zoomable: false,
            },
            Node::BlockMath { content } => Element::Math {
                tex: ALIGN_ENV_RE.replace_all(content, "{aligned}").into_owned(),
                block: true,
                zoomable: self.options.api_options.is_mobile,
            },
            // Paragraphs reached below the top level (lint wrappers, list
            // items) carry no layout classification.
            Node::Paragraph { content } => Element::Paragraph {
                index: 0,
                centered: false,
                full_width: false,
                translation_index: None,
                children: self.output_nodes(content, pass),
            },
            Node::Widget { id, widget_type } => self.output_widget(id, widget_type, pass),
            Node::Image { target, alt, title } => self.output_image(target, alt, title, pass),
            Node::Heading { level, content } => Element::Heading {
                level: *level,
                children: self.output_nodes(content, pass),
            },
            Node::List { ordered, items } => Element::List {
                ordered: *ordered,
                items: items
                    .iter()
                    .map(|item| self.output_nodes(item, pass))
                    .collect(),
            },
            Node::Table { header, rows } => {
                let was_in_table = pass.in_table;
                pass.in_table = true;
                let element = Element::Table {
                    header: header
                        .iter()
                        .map(|cell| self.output_nodes(cell, pass))
                        .collect(),
                    rows: rows
                        .iter()
                        .map(|row| {
                            row.iter()
                                .map(|cell| self.output_nodes(cell, pass))
                                .collect()
                        })
                        .collect(),
                    zoomable: self.options.api_options.is_mobile,
                };
                pass.in_table = was_in_table;
                element
            }
            Node::Columns { columns } => {
                pass.two_column = true;
                Element::Columns {
                    columns: columns
                        .iter()
                        .map(|column| self.output_blocks(column, pass))
                        .collect(),
                }
            }
            Node::CodeBlock { lang, content } => Element::CodeBlock {
                lang: lang.clone(),
                content: content.clone(),
            },
            Node::Lint {
                content,
                message,
                rule,
            } => Element::Lint {
                message: message.clone(),
                rule: rule.clone(),
                child: Box::new(self.output_node(content, pass)),
            },
        }
    }

    fn output_widget(&mut self, id: &str, implied_type: &str, pass: &mut PassState) -> Element {
        if let Some(label) = &self.options.api_options.widget_placeholder {
            return Element::Placeholder {
                label: label.clone(),
            };
        }

        // The same id twice would make two slots fight over one instance.
        if self.widget_ids.iter().any(|existing| existing == id) {
            tracing::error!(widget_id = id, "duplicate widget id in content");
            return Element::WidgetError {
                id: id.to_string(),
                message: format!("Widget [[☃ {id}]] already exists."),
            };
        }
        self.widget_ids.push(id.to_string());

        let mut info = self.widget_info_for(id);
        if info.type_name.is_empty() {
            info.type_name = implied_type.to_string();
        }
        if info.alignment == Alignment::FullWidth {
            pass.found_full_width = true;
        }

        if !self.instances.contains_key(id) {
            let props = self.widget_render_props(id, &info);
            if let Some(widget) = self.registry.build(&info.type_name, &props) {
                self.instances.insert(
                    id.to_string(),
                    Rc::new(std::cell::RefCell::new(widget)),
                );
            } else {
                tracing::warn!(
                    widget_id = id,
                    widget_type = %info.type_name,
                    "unknown widget type, rendering an empty slot"
                );
            }
        }

        Element::Widget {
            id: id.to_string(),
            widget_type: info.type_name,
            alignment: info.alignment,
            is_static: info.is_static && self.options.problem_num.is_none(),
            highlighted: self.options.highlighted_widgets.iter().any(|h| h == id),
        }
    }

    fn output_image(
        &mut self,
        target: &str,
        alt: &Option<String>,
        title: &Option<String>,
        pass: &mut PassState,
    ) -> Element {
        if let Some(label) = &self.options.api_options.image_placeholder {
            return Element::Placeholder {
                label: label.clone(),
            };
        }
        let src = match url::sanitize_url(target) {
            Some(src) => src,
            None => {
                tracing::warn!(url = target, "image url rejected by sanitizer");
                String::new()
            }
        };
        let dimensions = self.options.images.get(target).copied();
        Element::Image {
            src,
            alt: alt.clone(),
            title: title.clone(),
            width: dimensions.map(|d| d.width),
            height: dimensions.map(|d| d.height),
            responsive: !pass.in_table,
        }
    }
}
