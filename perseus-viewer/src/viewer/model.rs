//! Data model for the exercise viewer.
//!
//! The Model owns the renderer and exposes semantic operations (focus
//! cycling, typing, choice toggling, grading). The app shell maps key
//! events onto these operations; keeping them here makes the interaction
//! logic testable without a terminal.

use std::rc::Rc;

use serde_json::Value;

use perseus_core::types::{FocusPath, PerseusScore};
use perseus_core::{RenderedContent, Renderer, RendererOptions};
use perseus_widgets::builtin_registry;

/// What a widget slot should draw as, extracted from the live instance.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetDisplay {
    InputNumber {
        value: String,
        focused: bool,
    },
    Radio {
        choices: Vec<ChoiceDisplay>,
        focused: bool,
    },
    /// A widget type the viewer has no drawing code for.
    Unknown {
        widget_type: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceDisplay {
    pub content: String,
    pub selected: bool,
    pub rationale: Option<String>,
}

pub struct Model {
    renderer: Renderer,
    rendered: Rc<RenderedContent>,
    /// Focusable input paths in document order, for Tab cycling.
    inputs: Vec<FocusPath>,
    focused: Option<usize>,
    /// Most recent grading outcome, if the user asked for one.
    pub score: Option<PerseusScore>,
    pub empty_widgets: Vec<String>,
    pub show_score_panel: bool,
    pub show_examples: bool,
}

impl Model {
    pub fn new(options: RendererOptions, config: &perseus_config::PerseusConfig) -> Self {
        let mut renderer = Renderer::new(options, builtin_registry(), None, Default::default());
        renderer.flush_deferred();
        let rendered = renderer.render();
        let inputs = renderer.input_paths();
        Model {
            renderer,
            rendered,
            inputs,
            focused: None,
            score: None,
            empty_widgets: Vec::new(),
            show_score_panel: config.viewer.show_score_panel,
            show_examples: config.viewer.show_examples,
        }
    }

    pub fn rendered(&self) -> &RenderedContent {
        &self.rendered
    }

    pub fn focused_path(&self) -> Option<&FocusPath> {
        self.focused.and_then(|i| self.inputs.get(i))
    }

    fn focused_widget_id(&self) -> Option<&str> {
        self.focused_path().and_then(|path| path.widget_id())
    }

    /// Re-renders and refreshes the cached tree. Called after every
    /// operation that may have changed state.
    fn settle(&mut self) {
        self.renderer.flush_deferred();
        self.rendered = self.renderer.render();
        self.inputs = self.renderer.input_paths();
        if let Some(i) = self.focused {
            if i >= self.inputs.len() {
                self.focused = if self.inputs.is_empty() {
                    None
                } else {
                    Some(self.inputs.len() - 1)
                };
            }
        }
    }

    /// Moves focus to the next input, wrapping around.
    pub fn focus_next(&mut self) {
        if self.inputs.is_empty() {
            return;
        }
        let next = match self.focused {
            Some(i) => (i + 1) % self.inputs.len(),
            None => 0,
        };
        self.focus_index(next);
    }

    /// Moves focus to the previous input, wrapping around.
    pub fn focus_previous(&mut self) {
        if self.inputs.is_empty() {
            return;
        }
        let previous = match self.focused {
            Some(0) | None => self.inputs.len() - 1,
            Some(i) => i - 1,
        };
        self.focus_index(previous);
    }

    fn focus_index(&mut self, index: usize) {
        let Some(path) = self.inputs.get(index).cloned() else {
            return;
        };
        self.renderer.focus_path(&path);
        self.focused = Some(index);
        self.settle();
    }

    pub fn blur(&mut self) {
        self.renderer.blur();
        self.focused = None;
        self.settle();
    }

    /// Appends a character to the focused text input.
    pub fn type_char(&mut self, c: char) {
        let Some(path) = self.focused_path().cloned() else {
            return;
        };
        let mut value = self.input_text(&path);
        value.push(c);
        self.renderer.set_input_value(&path, &value, None);
        self.settle();
    }

    /// Deletes the last character of the focused text input.
    pub fn backspace(&mut self) {
        let Some(path) = self.focused_path().cloned() else {
            return;
        };
        let mut value = self.input_text(&path);
        value.pop();
        self.renderer.set_input_value(&path, &value, None);
        self.settle();
    }

    /// Toggles choice `index` of the focused radio widget, falling back
    /// to the first radio in the document when focus is elsewhere.
    pub fn toggle_choice(&mut self, index: usize) {
        let focused_radio = self
            .focused_widget_id()
            .filter(|id| self.renderer.widget_info_for(id).type_name == "radio")
            .map(String::from);
        let id = focused_radio.or_else(|| {
            self.renderer
                .widget_ids()
                .iter()
                .find(|id| self.renderer.widget_info_for(id).type_name == "radio")
                .cloned()
        });
        let Some(id) = id else {
            return;
        };
        let Some(handle) = self.renderer.widget_instance(&id) else {
            return;
        };
        // The widget decides single- vs multiple-select semantics.
        let patch = handle.borrow().choice_toggle_patch(index);
        let Some(patch) = patch else {
            return;
        };
        self.renderer.on_widget_change(&id, patch, false);
        self.settle();
    }

    /// Whether the focused widget takes free-form text.
    pub fn focused_takes_text(&self) -> bool {
        self.focused_widget_type()
            .map(|t| t == "input-number")
            .unwrap_or(false)
    }

    pub fn focused_widget_type(&self) -> Option<String> {
        let id = self.focused_widget_id()?;
        Some(self.renderer.widget_info_for(id).type_name)
    }

    /// Grades the current answers.
    pub fn grade(&mut self) {
        self.empty_widgets = self.renderer.empty_widgets();
        self.score = Some(self.renderer.score());
        self.renderer.show_rationales_for_currently_selected_choices();
        self.settle();
    }

    pub fn examples(&self) -> Option<Vec<String>> {
        self.renderer.examples()
    }

    /// Current text of the input at `path`, read back from the widget.
    pub fn input_text(&self, path: &FocusPath) -> String {
        let Some(id) = path.widget_id() else {
            return String::new();
        };
        self.renderer
            .widget_instance(id)
            .and_then(|handle| {
                let input = handle.borrow().user_input()?;
                input
                    .get("currentValue")
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_default()
    }

    /// Builds the display state for a widget slot.
    pub fn widget_display(&self, id: &str) -> WidgetDisplay {
        let info = self.renderer.widget_info_for(id);
        let focused = self.focused_widget_id() == Some(id);
        match info.type_name.as_str() {
            "input-number" => WidgetDisplay::InputNumber {
                value: self.input_text(&FocusPath::for_widget(id)),
                focused,
            },
            "radio" => {
                let selected: Vec<bool> = self
                    .renderer
                    .widget_instance(id)
                    .and_then(|handle| {
                        let input = handle.borrow().user_input()?;
                        input.get("choicesSelected").and_then(Value::as_array).map(
                            |flags| flags.iter().map(|v| v.as_bool().unwrap_or(false)).collect(),
                        )
                    })
                    .unwrap_or_default();
                let choices = info
                    .options
                    .get("choices")
                    .and_then(Value::as_array)
                    .map(|choices| {
                        choices
                            .iter()
                            .enumerate()
                            .map(|(i, choice)| ChoiceDisplay {
                                content: choice
                                    .get("content")
                                    .and_then(Value::as_str)
                                    .unwrap_or_default()
                                    .to_string(),
                                selected: selected.get(i).copied().unwrap_or(false),
                                rationale: choice
                                    .get("rationale")
                                    .and_then(Value::as_str)
                                    .map(String::from),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                WidgetDisplay::Radio { choices, focused }
            }
            other => WidgetDisplay::Unknown {
                widget_type: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use perseus_core::types::WidgetInfo;
    use serde_json::json;

    fn two_widget_model() -> Model {
        let mut widgets: HashMap<String, WidgetInfo> = HashMap::new();
        widgets.insert(
            "input-number 1".to_string(),
            serde_json::from_value(json!({
                "type": "input-number",
                "options": { "value": 0.5, "answerType": "number", "simplify": "required" }
            }))
            .unwrap(),
        );
        widgets.insert(
            "radio 1".to_string(),
            serde_json::from_value(json!({
                "type": "radio",
                "options": { "choices": [
                    { "content": "yes", "correct": true },
                    { "content": "no" },
                ]}
            }))
            .unwrap(),
        );
        let options = RendererOptions {
            content: "Type [[☃ input-number 1]] and pick [[☃ radio 1]]".to_string(),
            widgets,
            ..Default::default()
        };
        let config = perseus_config::load_defaults().unwrap();
        Model::new(options, &config)
    }

    #[test]
    fn tab_cycles_through_inputs() {
        let mut model = two_widget_model();
        // Only input-number exposes an input path; radio takes focus as a
        // whole widget and is not part of the text-input cycle.
        assert!(!model.inputs.is_empty());
        model.focus_next();
        assert!(model.focused_path().is_some());
        let first = model.focused_path().cloned();
        model.focus_next();
        model.focus_previous();
        assert_eq!(model.focused_path().cloned(), first);
    }

    #[test]
    fn typing_flows_through_the_renderer() {
        let mut model = two_widget_model();
        model.focus_next();
        assert!(model.focused_takes_text());
        model.type_char('1');
        model.type_char('/');
        model.type_char('2');
        let path = model.focused_path().cloned().unwrap();
        assert_eq!(model.input_text(&path), "1/2");
        model.backspace();
        assert_eq!(model.input_text(&path), "1/");
    }

    #[test]
    fn grading_populates_score_and_empty_widgets() {
        let mut model = two_widget_model();
        model.focus_next();
        model.type_char('1');
        model.type_char('/');
        model.type_char('2');
        model.grade();
        // The radio is still untouched, so the aggregate is invalid and
        // the radio shows up as empty.
        assert_eq!(model.score, Some(PerseusScore::Invalid { message: None }));
        assert_eq!(model.empty_widgets, vec!["radio 1".to_string()]);
    }

    #[test]
    fn toggle_choice_targets_the_first_radio_without_focus() {
        let mut model = two_widget_model();
        model.toggle_choice(0);
        match model.widget_display("radio 1") {
            WidgetDisplay::Radio { choices, .. } => assert!(choices[0].selected),
            other => panic!("expected radio display, got {other:?}"),
        }
        model.focus_next();
        model.type_char('1');
        model.type_char('/');
        model.type_char('2');
        model.grade();
        assert_eq!(
            model.score,
            Some(PerseusScore::Points {
                earned: 2,
                total: 2,
                message: None
            })
        );
    }

    #[test]
    fn toggle_choice_honors_multiple_select() {
        let mut widgets: HashMap<String, WidgetInfo> = HashMap::new();
        widgets.insert(
            "radio 1".to_string(),
            serde_json::from_value(json!({
                "type": "radio",
                "options": { "multipleSelect": true, "choices": [
                    { "content": "two", "correct": true },
                    { "content": "three", "correct": true },
                    { "content": "four" },
                ]}
            }))
            .unwrap(),
        );
        let options = RendererOptions {
            content: "Pick every prime: [[☃ radio 1]]".to_string(),
            widgets,
            ..Default::default()
        };
        let config = perseus_config::load_defaults().unwrap();
        let mut model = Model::new(options, &config);

        model.toggle_choice(0);
        model.toggle_choice(1);
        match model.widget_display("radio 1") {
            WidgetDisplay::Radio { choices, .. } => {
                assert!(choices[0].selected, "first selection must survive");
                assert!(choices[1].selected);
                assert!(!choices[2].selected);
            }
            other => panic!("expected radio display, got {other:?}"),
        }
    }

    #[test]
    fn widget_display_reflects_selections() {
        let mut model = two_widget_model();
        match model.widget_display("radio 1") {
            WidgetDisplay::Radio { choices, .. } => {
                assert_eq!(choices.len(), 2);
                assert!(!choices[0].selected);
            }
            other => panic!("expected radio display, got {other:?}"),
        }
        // Select the first choice directly through the change protocol.
        model
            .renderer
            .on_widget_change("radio 1", json!({ "choicesSelected": [true, false] }), false);
        model.settle();
        match model.widget_display("radio 1") {
            WidgetDisplay::Radio { choices, .. } => assert!(choices[0].selected),
            other => panic!("expected radio display, got {other:?}"),
        }
        model.grade();
        assert_eq!(
            model.score,
            Some(PerseusScore::Invalid { message: None }),
            "input-number is still empty"
        );
    }
}
