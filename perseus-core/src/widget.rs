//! The widget contract.
//!
//! Every interactive element embedded in exercise content implements
//! [`Widget`]. Most of the trait's methods are optional capabilities with
//! no-op defaults; the renderer probes them and falls back gracefully when
//! a widget opts out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::types::{Alignment, ApiOptions, FocusPath, PerseusScore, WidgetInfo};

/// Shared, mutable handle to a live widget instance.
///
/// The renderer is single-threaded, so interior mutability through
/// `RefCell` suffices; `Rc` lets handles be passed out to UI layers and
/// filter callbacks while the renderer keeps its own reference.
pub type WidgetHandle = Rc<RefCell<Box<dyn Widget>>>;

/// Callback offered to widgets during grading. Called with the offending
/// raw input and an optional message; returns whether the message should
/// be kept on the resulting score.
pub type InputErrorHandler<'a> = &'a mut dyn FnMut(&str, Option<&str>) -> bool;

/// Result of asking a widget to take focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetFocusResult {
    /// The widget has nothing focusable.
    Unhandled,
    /// The widget as a whole took focus.
    Focused,
    /// The widget focused one of its inner inputs.
    ///
    /// Supported for compatibility with older widgets; new widgets should
    /// return `Focused` and expose inner inputs via `input_paths`.
    FocusedAt(Vec<String>),
}

/// Opaque address of a widget's rendered node, as resolved by
/// `Renderer::node_for_path`. UI layers map it onto whatever they drew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    pub widget_id: String,
    pub path: Vec<String>,
}

impl NodeHandle {
    pub fn root(widget_id: &str) -> Self {
        NodeHandle {
            widget_id: widget_id.to_string(),
            path: Vec::new(),
        }
    }
}

/// Completion token for asynchronous state restoration.
///
/// The renderer arms one signal per restore with a count of one for
/// itself plus one per widget that restores custom state. Each party
/// calls [`complete`](RestoreSignal::complete) exactly once; the restore
/// callback fires when the count reaches zero.
#[derive(Clone)]
pub struct RestoreSignal {
    remaining: Rc<Cell<usize>>,
    callback: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl RestoreSignal {
    pub fn new(callback: Box<dyn FnOnce()>) -> Self {
        RestoreSignal {
            remaining: Rc::new(Cell::new(1)),
            callback: Rc::new(RefCell::new(Some(callback))),
        }
    }

    pub(crate) fn add_participant(&self) {
        self.remaining.set(self.remaining.get() + 1);
    }

    /// Marks one participant done. The last completion fires the callback.
    pub fn complete(&self) {
        let remaining = self.remaining.get();
        if remaining == 0 {
            tracing::error!("restore signal completed more times than it was armed");
            return;
        }
        self.remaining.set(remaining - 1);
        if remaining == 1 {
            if let Some(callback) = self.callback.borrow_mut().take() {
                callback();
            }
        }
    }
}

/// Everything a widget needs to (re)configure itself for rendering.
#[derive(Debug, Clone)]
pub struct WidgetRenderProps {
    pub widget_id: String,
    /// The widget's current props: its transformed options overlaid with
    /// every change patch accumulated so far.
    pub props: Value,
    pub alignment: Alignment,
    pub is_static: bool,
    pub problem_num: Option<u32>,
    /// Set when the host is reviewing a completed attempt; carries the
    /// widget's grading options so it can mark itself up.
    pub review_mode_rubric: Option<Value>,
    /// Whether this widget received the most recent user interaction.
    pub is_last_used: bool,
    pub highlighted: bool,
    pub api_options: ApiOptions,
}

/// An interactive element embedded in rendered content.
///
/// Only `widget_type` and `replace_props` are mandatory. Everything else
/// is an optional capability: the default implementations report "not
/// supported" and the renderer degrades accordingly (a widget without
/// `simple_validate` is simply not graded, one without `serialized_state`
/// is snapshotted through its raw props, and so on).
pub trait Widget {
    /// The widget's type name, e.g. `"input-number"`.
    fn widget_type(&self) -> &'static str;

    /// Reconfigures the widget. Called on every render pass and after
    /// every committed change patch; must be idempotent.
    fn replace_props(&mut self, props: &WidgetRenderProps);

    /// Asks the widget to take focus.
    fn focus(&mut self) -> WidgetFocusResult {
        WidgetFocusResult::Unhandled
    }

    /// Moves focus to the inner input addressed by `path` (relative to
    /// this widget). Idempotent.
    fn focus_input_path(&mut self, _path: &[String]) {}

    /// Removes focus from the inner input addressed by `path`. Idempotent.
    fn blur_input_path(&mut self, _path: &[String]) {}

    /// All focusable inner inputs, as paths relative to this widget.
    fn input_paths(&self) -> Vec<FocusPath> {
        Vec::new()
    }

    /// Resolves a widget-relative path to a rendered node handle.
    fn node_for_path(&self, _path: &[String]) -> Option<NodeHandle> {
        None
    }

    /// The kind of input the path addresses, e.g. `"number"`, for keypad
    /// selection on mobile hosts.
    fn grammar_type_for_path(&self, _path: &[String]) -> Option<String> {
        None
    }

    /// Programmatically sets the input at `path` to `value`. Returns the
    /// props patch the edit produces, or `None` if unsupported.
    fn set_input_value(&mut self, _path: &[String], _value: &str) -> Option<Value> {
        None
    }

    /// The learner's current answer, in whatever shape grading expects.
    fn user_input(&self) -> Option<Value> {
        None
    }

    /// Grades the current input against `options`. `None` means the widget
    /// is ungradable and contributes nothing to the aggregate score.
    fn simple_validate(
        &self,
        _options: &Value,
        _on_input_error: Option<InputErrorHandler<'_>>,
    ) -> Option<PerseusScore> {
        None
    }

    /// A custom state snapshot, if the widget keeps state beyond its
    /// props. `None` makes the renderer snapshot the raw props instead.
    fn serialized_state(&self) -> Option<Value> {
        None
    }

    /// Whether [`restore_serialized_state`](Widget::restore_serialized_state)
    /// does anything. When `false` the renderer re-applies the snapshot
    /// directly as props.
    fn restores_serialized_state(&self) -> bool {
        false
    }

    /// Restores a snapshot previously produced by `serialized_state`.
    /// Returns a props patch to merge over the widget's current props, and
    /// must eventually call `signal.complete()` once done (immediately is
    /// fine for synchronous widgets).
    fn restore_serialized_state(&mut self, _state: &Value, signal: RestoreSignal) -> Option<Value> {
        signal.complete();
        None
    }

    /// Example answer formats to show the learner, one per line.
    fn examples(&self) -> Option<Vec<String>> {
        None
    }

    /// The props patch that toggles discrete choice `index`, where the
    /// widget offers choices. UI layers feed the patch to the renderer's
    /// change protocol. `None` means unsupported or out of range.
    fn choice_toggle_patch(&self, _index: usize) -> Option<Value> {
        None
    }

    /// Reveals per-choice rationales after grading, where supported.
    fn show_rationales(&mut self, _options: &Value) {}

    /// Clears incorrect selections after grading, where supported.
    fn deselect_incorrect(&mut self) {}

    /// Editor-level serialization of the widget's configured state.
    /// `Value::Null` means "nothing to serialize".
    fn serialize(&self) -> Value {
        Value::Null
    }
}

/// Criterion for [`Renderer::find_widgets`](crate::Renderer::find_widgets).
///
/// A string containing a space selects by exact widget id; a string
/// without one selects by widget type.
#[derive(Clone)]
pub enum FilterCriterion {
    Id(String),
    Type(String),
    Predicate(Rc<dyn Fn(&str, &WidgetInfo, Option<&WidgetHandle>) -> bool>),
}

impl FilterCriterion {
    pub fn matches(&self, id: &str, info: &WidgetInfo, handle: Option<&WidgetHandle>) -> bool {
        match self {
            FilterCriterion::Id(wanted) => id == wanted,
            FilterCriterion::Type(wanted) => info.type_name == *wanted,
            FilterCriterion::Predicate(predicate) => predicate(id, info, handle),
        }
    }
}

impl From<&str> for FilterCriterion {
    fn from(selector: &str) -> Self {
        if selector.contains(' ') {
            FilterCriterion::Id(selector.to_string())
        } else {
            FilterCriterion::Type(selector.to_string())
        }
    }
}

impl std::fmt::Debug for FilterCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterCriterion::Id(id) => write!(f, "Id({id:?})"),
            FilterCriterion::Type(t) => write!(f, "Type({t:?})"),
            FilterCriterion::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
