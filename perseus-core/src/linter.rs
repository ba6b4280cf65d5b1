//! Lint integration.
//!
//! Two kinds of lint flow into rendered content: a content linter that
//! inspects the parsed tree and wraps offending nodes, and translation
//! lint errors pushed in from an external translation checker. Both end
//! up as `Node::Lint` annotations that render as highlights.

use perseus_markdown::Node;
use serde::{Deserialize, Serialize};

/// Where and how lint should run for this renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinterContext {
    /// Master switch: nothing lints unless this is set.
    pub highlight_lint: bool,
    /// What the content is, e.g. `"exercise"` or `"article"`.
    pub content_type: String,
    /// Position of this renderer within the host document.
    pub paths: Vec<String>,
    /// Ancestry stack for nested renderers (hints, explanations).
    pub stack: Vec<String>,
}

impl Default for LinterContext {
    fn default() -> Self {
        LinterContext {
            highlight_lint: false,
            content_type: "exercise".to_string(),
            paths: Vec::new(),
            stack: Vec::new(),
        }
    }
}

/// A content linter: inspects the parsed tree and wraps nodes it objects
/// to in `Node::Lint`.
pub trait Linter {
    fn run(&self, nodes: &mut Vec<Node>, context: &LinterContext);
}

/// Linter that finds nothing wrong.
pub struct NoopLinter;

impl Linter for NoopLinter {
    fn run(&self, _nodes: &mut Vec<Node>, _context: &LinterContext) {}
}

pub const TRANSLATION_LINT_RULE: &str = "translation-lint";

/// Attaches externally-reported translation lint errors to the tree.
///
/// Translation lint carries no location information, so the errors
/// annotate the head of the document.
pub fn apply_translation_lint_errors(nodes: &mut Vec<Node>, errors: &[String]) {
    if errors.is_empty() || nodes.is_empty() {
        return;
    }
    let mut head = nodes.remove(0);
    for message in errors {
        head = Node::Lint {
            content: Box::new(head),
            message: message.clone(),
            rule: TRANSLATION_LINT_RULE.to_string(),
        };
    }
    nodes.insert(0, head);
}
