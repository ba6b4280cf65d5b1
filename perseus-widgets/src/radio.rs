//! The radio widget: single or multiple choice selection.

use serde::Deserialize;
use serde_json::{json, Value};

use perseus_core::registry::WidgetEntry;
use perseus_core::types::{Alignment, PerseusScore};
use perseus_core::widget::{
    InputErrorHandler, RestoreSignal, Widget, WidgetFocusResult, WidgetRenderProps,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioChoice {
    pub content: String,
    pub correct: bool,
    pub rationale: Option<String>,
    pub is_none_of_the_above: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RadioOptions {
    choices: Vec<RadioChoice>,
    multiple_select: bool,
}

#[derive(Debug, Default)]
pub struct Radio {
    widget_id: String,
    choices: Vec<RadioChoice>,
    multiple_select: bool,
    selected: Vec<bool>,
    /// Indices whose rationales have been revealed.
    revealed: Vec<bool>,
    is_static: bool,
    read_only: bool,
    focused: bool,
    props: Value,
}

impl Radio {
    pub fn new(props: &WidgetRenderProps) -> Self {
        let mut widget = Radio {
            widget_id: props.widget_id.clone(),
            ..Default::default()
        };
        widget.replace_props(props);
        widget
    }

    pub fn choices(&self) -> &[RadioChoice] {
        &self.choices
    }

    pub fn selected(&self) -> &[bool] {
        &self.selected
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The props patch that selects choice `index`, honoring single- vs
    /// multiple-select semantics. UI layers feed this to the renderer's
    /// change protocol.
    pub fn toggle_choice_patch(&self, index: usize) -> Option<Value> {
        if index >= self.choices.len() {
            return None;
        }
        let mut selected = if self.multiple_select {
            self.selected.clone()
        } else {
            vec![false; self.choices.len()]
        };
        selected[index] = !self.selected[index];
        Some(json!({ "choicesSelected": selected }))
    }

    fn selection_state(&self) -> Value {
        json!({ "choicesSelected": self.selected })
    }
}

impl Widget for Radio {
    fn widget_type(&self) -> &'static str {
        "radio"
    }

    fn replace_props(&mut self, props: &WidgetRenderProps) {
        self.widget_id = props.widget_id.clone();
        self.is_static = props.is_static;
        self.read_only = props.api_options.read_only;

        let options: RadioOptions =
            serde_json::from_value(props.props.clone()).unwrap_or_default();
        self.choices = options.choices;
        self.multiple_select = options.multiple_select;

        self.selected = props
            .props
            .get("choicesSelected")
            .and_then(Value::as_array)
            .map(|flags| flags.iter().map(|v| v.as_bool().unwrap_or(false)).collect())
            .unwrap_or_default();
        self.selected.resize(self.choices.len(), false);
        self.revealed.resize(self.choices.len(), false);
        self.props = props.props.clone();
    }

    fn focus(&mut self) -> WidgetFocusResult {
        if self.is_static || self.read_only || self.choices.is_empty() {
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

    fn user_input(&self) -> Option<Value> {
        Some(self.selection_state())
    }

    fn simple_validate(
        &self,
        _options: &Value,
        _on_input_error: Option<InputErrorHandler<'_>>,
    ) -> Option<PerseusScore> {
        if !self.selected.iter().any(|&s| s) {
            return Some(PerseusScore::Invalid { message: None });
        }
        let correct = self
            .choices
            .iter()
            .zip(&self.selected)
            .all(|(choice, &selected)| choice.correct == selected);
        Some(PerseusScore::Points {
            earned: u32::from(correct),
            total: 1,
            message: None,
        })
    }

    /// Selections are state beyond raw props: snapshot and restore them
    /// through the custom path so partially-answered exercises round-trip.
    fn serialized_state(&self) -> Option<Value> {
        Some(self.selection_state())
    }

    fn restores_serialized_state(&self) -> bool {
        true
    }

    fn restore_serialized_state(&mut self, state: &Value, signal: RestoreSignal) -> Option<Value> {
        let patch = state
            .get("choicesSelected")
            .map(|selected| json!({ "choicesSelected": selected }));
        signal.complete();
        patch
    }

    fn choice_toggle_patch(&self, index: usize) -> Option<Value> {
        self.toggle_choice_patch(index)
    }

    fn show_rationales(&mut self, _options: &Value) {
        self.revealed = self.selected.clone();
    }

    fn deselect_incorrect(&mut self) {
        for (choice, selected) in self.choices.iter().zip(self.selected.iter_mut()) {
            if !choice.correct {
                *selected = false;
            }
        }
    }

    fn serialize(&self) -> Value {
        self.props.clone()
    }
}

pub fn entry() -> WidgetEntry {
    WidgetEntry {
        name: "radio",
        display_name: "Multiple choice",
        default_alignment: Alignment::Block,
        builder: Box::new(|props| Box::new(Radio::new(props))),
        transform: None,
    }
}
