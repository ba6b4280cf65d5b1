//! The input-number widget: a single numeric answer field.

use serde::Deserialize;
use serde_json::{json, Value};

use perseus_core::registry::WidgetEntry;
use perseus_core::types::{Alignment, FocusPath, PerseusScore};
use perseus_core::widget::{
    InputErrorHandler, NodeHandle, Widget, WidgetFocusResult, WidgetRenderProps,
};

use crate::numeric::{self, ParsedAnswer};

pub const SIMPLIFY_MESSAGE: &str =
    "Your answer is almost correct, but it needs to be simplified.";

/// Grading configuration, read from the widget's options blob.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InputNumberOptions {
    value: f64,
    answer_type: String,
    simplify: String,
    max_error: f64,
    inexact: bool,
}

impl Default for InputNumberOptions {
    fn default() -> Self {
        InputNumberOptions {
            value: 0.0,
            answer_type: "number".to_string(),
            simplify: "required".to_string(),
            max_error: 0.0,
            inexact: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputNumber {
    widget_id: String,
    current_value: String,
    right_align: bool,
    is_static: bool,
    read_only: bool,
    focused: bool,
    /// Raw props as last committed, for editor serialization.
    props: Value,
}

impl InputNumber {
    pub fn new(props: &WidgetRenderProps) -> Self {
        let mut widget = InputNumber {
            widget_id: props.widget_id.clone(),
            ..Default::default()
        };
        widget.replace_props(props);
        widget
    }

    pub fn current_value(&self) -> &str {
        &self.current_value
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn grade(&self, options: &InputNumberOptions) -> Grade {
        let raw = self.current_value.trim();
        if raw.is_empty() {
            return Grade::Empty;
        }
        let forms = numeric::forms_for_answer_type(&options.answer_type);
        let Some(parsed) = numeric::parse_answer(raw, forms) else {
            return Grade::Unparseable;
        };
        let tolerance = if options.inexact {
            options.max_error.max(f64::EPSILON)
        } else {
            1e-9
        };
        if (parsed.value - options.value).abs() > tolerance {
            return Grade::Incorrect;
        }
        Grade::Correct(parsed)
    }
}

enum Grade {
    Empty,
    Unparseable,
    Incorrect,
    Correct(ParsedAnswer),
}

impl Widget for InputNumber {
    fn widget_type(&self) -> &'static str {
        "input-number"
    }

    fn replace_props(&mut self, props: &WidgetRenderProps) {
        self.widget_id = props.widget_id.clone();
        self.is_static = props.is_static;
        self.read_only = props.api_options.read_only;
        if let Some(value) = props.props.get("currentValue").and_then(Value::as_str) {
            self.current_value = value.to_string();
        }
        if let Some(right_align) = props.props.get("rightAlign").and_then(Value::as_bool) {
            self.right_align = right_align;
        }
        self.props = props.props.clone();
    }

    fn focus(&mut self) -> WidgetFocusResult {
        if self.is_static || self.read_only {
            return WidgetFocusResult::Unhandled;
        }
        self.focused = true;
        WidgetFocusResult::Focused
    }

    fn focus_input_path(&mut self, _path: &[String]) {
        self.focused = true;
    }

    fn blur_input_path(&mut self, _path: &[String]) {
        self.focused = false;
    }

    fn input_paths(&self) -> Vec<FocusPath> {
        // One input, addressed by the empty inner path.
        vec![FocusPath::default()]
    }

    fn node_for_path(&self, path: &[String]) -> Option<NodeHandle> {
        path.is_empty().then(|| NodeHandle::root(&self.widget_id))
    }

    fn grammar_type_for_path(&self, path: &[String]) -> Option<String> {
        path.is_empty().then(|| "number".to_string())
    }

    fn set_input_value(&mut self, path: &[String], value: &str) -> Option<Value> {
        if !path.is_empty() {
            return None;
        }
        Some(json!({ "currentValue": value }))
    }

    fn user_input(&self) -> Option<Value> {
        Some(json!({ "currentValue": self.current_value }))
    }

    fn simple_validate(
        &self,
        options: &Value,
        mut on_input_error: Option<InputErrorHandler<'_>>,
    ) -> Option<PerseusScore> {
        let options: InputNumberOptions = match serde_json::from_value(options.clone()) {
            Ok(options) => options,
            Err(error) => {
                tracing::error!(widget_id = %self.widget_id, %error, "bad input-number options");
                return None;
            }
        };

        let score = match self.grade(&options) {
            Grade::Empty => PerseusScore::Invalid { message: None },
            Grade::Unparseable => {
                let message = invalid_message(&self.current_value, &mut on_input_error, None);
                PerseusScore::Invalid { message }
            }
            Grade::Incorrect => PerseusScore::Points {
                earned: 0,
                total: 1,
                message: None,
            },
            Grade::Correct(parsed) => {
                if !parsed.simplified && options.simplify == "required" {
                    let message = invalid_message(
                        &self.current_value,
                        &mut on_input_error,
                        Some(SIMPLIFY_MESSAGE),
                    );
                    PerseusScore::Invalid { message }
                } else if !parsed.simplified && options.simplify == "enforced" {
                    PerseusScore::Points {
                        earned: 0,
                        total: 1,
                        message: None,
                    }
                } else {
                    PerseusScore::Points {
                        earned: 1,
                        total: 1,
                        message: None,
                    }
                }
            }
        };
        Some(score)
    }

    fn examples(&self) -> Option<Vec<String>> {
        let answer_type = self
            .props
            .get("answerType")
            .and_then(Value::as_str)
            .unwrap_or("number");
        let simplify_required = self
            .props
            .get("simplify")
            .and_then(Value::as_str)
            .map(|s| s == "required" || s == "enforced")
            .unwrap_or(true);
        Some(example_lines(answer_type, simplify_required))
    }

    fn serialize(&self) -> Value {
        self.props.clone()
    }
}

/// Runs the proposed message through the host's input-error hook, which
/// may suppress it.
fn invalid_message(
    raw: &str,
    hook: &mut Option<InputErrorHandler<'_>>,
    message: Option<&str>,
) -> Option<String> {
    let keep = match hook.as_mut() {
        Some(hook) => hook(raw, message),
        None => true,
    };
    if keep {
        message.map(String::from)
    } else {
        None
    }
}

fn example_lines(answer_type: &str, simplify_required: bool) -> Vec<String> {
    let mut lines = vec!["**Your answer should be** ".to_string()];
    let forms = numeric::forms_for_answer_type(answer_type);
    for form in forms {
        let line = match form {
            numeric::Form::Integer => "an integer, like $6$",
            numeric::Form::Decimal => "an *exact* decimal, like $0.75$",
            numeric::Form::Proper => {
                if simplify_required {
                    "a *simplified proper* fraction, like $3/5$"
                } else {
                    "a *proper* fraction, like $1/2$ or $6/10$"
                }
            }
            numeric::Form::Improper => {
                if simplify_required {
                    "a *simplified improper* fraction, like $7/4$"
                } else {
                    "an *improper* fraction, like $10/7$ or $14/8$"
                }
            }
            numeric::Form::Mixed => "a mixed number, like $1\\ 3/4$",
            numeric::Form::Percent => "a percent, like $12.34\\%$",
            numeric::Form::Pi => "a multiple of pi, like $12\\ \\text{pi}$ or $2/3\\ \\text{pi}$",
        };
        lines.push(line.to_string());
    }
    lines
}

/// Strips grading fields out of the options before they become props.
fn transform(options: &Value) -> Value {
    let mut props = serde_json::Map::new();
    if let Value::Object(options) = options {
        for key in ["size", "rightAlign", "answerType", "simplify"] {
            if let Some(value) = options.get(key) {
                props.insert(key.to_string(), value.clone());
            }
        }
    }
    props.insert("currentValue".to_string(), Value::String(String::new()));
    Value::Object(props)
}

pub fn entry() -> WidgetEntry {
    WidgetEntry {
        name: "input-number",
        display_name: "Number input",
        default_alignment: Alignment::InlineBlock,
        builder: Box::new(|props| Box::new(InputNumber::new(props))),
        transform: Some(transform),
    }
}
