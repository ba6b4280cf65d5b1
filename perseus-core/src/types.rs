//! Shared data types: scores, focus paths, widget metadata and the
//! renderer's API options.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of grading one widget, or the aggregate of several.
///
/// `Points` carries partial credit; `Invalid` means the learner's answer
/// cannot be graded at all (empty input, malformed fraction, ...). An
/// optional message explains the outcome to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PerseusScore {
    Points {
        earned: u32,
        total: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Invalid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl PerseusScore {
    pub fn is_invalid(&self) -> bool {
        matches!(self, PerseusScore::Invalid { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            PerseusScore::Points { message, .. } | PerseusScore::Invalid { message } => {
                message.as_deref()
            }
        }
    }
}

/// Hierarchical address of a focusable input: the widget id followed by
/// widget-internal path segments.
///
/// The empty path addresses nothing; a single-segment path addresses a
/// widget as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FocusPath(Vec<String>);

impl FocusPath {
    pub fn new(segments: Vec<String>) -> Self {
        FocusPath(segments)
    }

    /// The path addressing `widget_id` itself, with no inner segments.
    pub fn for_widget(widget_id: &str) -> Self {
        FocusPath(vec![widget_id.to_string()])
    }

    /// Builds `[widget_id, rest...]`.
    pub fn join(widget_id: &str, rest: &[String]) -> Self {
        let mut segments = Vec::with_capacity(rest.len() + 1);
        segments.push(widget_id.to_string());
        segments.extend_from_slice(rest);
        FocusPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The widget id component, i.e. the first segment.
    pub fn widget_id(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The widget-internal remainder after the widget id.
    pub fn sub_path(&self) -> &[String] {
        if self.0.is_empty() {
            &[]
        } else {
            &self.0[1..]
        }
    }

    pub fn is_prefix_of(&self, whole: &FocusPath) -> bool {
        self.0.len() <= whole.0.len() && whole.0[..self.0.len()] == self.0[..]
    }
}

impl From<Vec<String>> for FocusPath {
    fn from(segments: Vec<String>) -> Self {
        FocusPath(segments)
    }
}

impl From<&[&str]> for FocusPath {
    fn from(segments: &[&str]) -> Self {
        FocusPath(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Prefix comparison lifted over optional paths: `None` only matches
/// `None`. Used for the focus no-op rule.
pub fn is_id_path_prefix(prefix: Option<&FocusPath>, whole: Option<&FocusPath>) -> bool {
    match (prefix, whole) {
        (Some(p), Some(w)) => p.is_prefix_of(w),
        (None, None) => true,
        _ => false,
    }
}

/// Layout alignment of a widget within its paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Default,
    Block,
    InlineBlock,
    Inline,
    FloatLeft,
    FloatRight,
    FullWidth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetVersion {
    pub major: u32,
    pub minor: u32,
}

/// Declarative description of one widget occurrence, as stored in the
/// exercise's widget map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetInfo {
    /// Widget type name, e.g. `"input-number"`. May be empty in legacy
    /// data, in which case the type implied by the widget id is used.
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub alignment: Alignment,
    /// Whether this widget participates in scoring.
    #[serde(default = "default_true")]
    pub graded: bool,
    /// Static widgets render but take no input and are never graded.
    #[serde(rename = "static", default)]
    pub is_static: bool,
    /// Widget-type-specific options blob.
    #[serde(default)]
    pub options: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<WidgetVersion>,
}

fn default_true() -> bool {
    true
}

impl Default for WidgetInfo {
    fn default() -> Self {
        WidgetInfo {
            type_name: String::new(),
            alignment: Alignment::Default,
            graded: true,
            is_static: false,
            options: Value::Object(serde_json::Map::new()),
            version: None,
        }
    }
}

/// Intrinsic dimensions for an image, looked up by source url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

pub type ImageTable = HashMap<String, ImageDimensions>;

/// Host-environment switches threaded through to every widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiOptions {
    pub is_article: bool,
    pub is_mobile: bool,
    pub read_only: bool,
    pub static_render: bool,
    pub custom_keypad: bool,
    /// When set, the content is being translated in-place through the
    /// crowdin editor and untranslated strings carry crowdin markers.
    pub use_jipt: bool,
    /// When set, every widget renders as a placeholder with this label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_placeholder: Option<String>,
    /// When set, images render as a placeholder with this label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_placeholder: Option<String>,
}

/// Snapshot of every widget's state, keyed by widget id in document order.
pub type SerializedState = serde_json::Map<String, Value>;
