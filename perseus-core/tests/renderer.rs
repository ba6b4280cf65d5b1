//! End-to-end renderer protocol tests, driven through a small fake widget
//! so they stay independent of any real widget's grading rules.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{json, Value};

use perseus_core::element::Element;
use perseus_core::hooks::RendererHooks;
use perseus_core::registry::{WidgetEntry, WidgetRegistry};
use perseus_core::types::{Alignment, FocusPath, PerseusScore, WidgetInfo};
use perseus_core::widget::{
    FilterCriterion, InputErrorHandler, RestoreSignal, Widget, WidgetFocusResult,
    WidgetRenderProps,
};
use perseus_core::{Renderer, RendererOptions};

/// A minimal text-input widget graded by exact string match against the
/// `answer` option.
struct FakeInput {
    value: String,
    focused: bool,
}

impl FakeInput {
    fn new(props: &WidgetRenderProps) -> Self {
        let mut widget = FakeInput {
            value: String::new(),
            focused: false,
        };
        widget.replace_props(props);
        widget
    }
}

impl Widget for FakeInput {
    fn widget_type(&self) -> &'static str {
        "fake-input"
    }

    fn replace_props(&mut self, props: &WidgetRenderProps) {
        if let Some(value) = props.props.get("currentValue").and_then(Value::as_str) {
            self.value = value.to_string();
        }
    }

    fn focus(&mut self) -> WidgetFocusResult {
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
        vec![FocusPath::default()]
    }

    fn set_input_value(&mut self, path: &[String], value: &str) -> Option<Value> {
        path.is_empty().then(|| json!({ "currentValue": value }))
    }

    fn user_input(&self) -> Option<Value> {
        Some(json!({ "currentValue": self.value }))
    }

    fn simple_validate(
        &self,
        options: &Value,
        _on_input_error: Option<InputErrorHandler<'_>>,
    ) -> Option<PerseusScore> {
        if self.value.is_empty() {
            return Some(PerseusScore::Invalid { message: None });
        }
        let answer = options.get("answer").and_then(Value::as_str).unwrap_or("");
        Some(PerseusScore::Points {
            earned: u32::from(self.value == answer),
            total: 1,
            message: None,
        })
    }

    fn examples(&self) -> Option<Vec<String>> {
        Some(vec!["anything, like $42$".to_string()])
    }
}

/// Like `FakeInput` but snapshotting through the custom-state path.
struct StatefulInput {
    inner: FakeInput,
}

impl Widget for StatefulInput {
    fn widget_type(&self) -> &'static str {
        "stateful-input"
    }

    fn replace_props(&mut self, props: &WidgetRenderProps) {
        self.inner.replace_props(props);
    }

    fn input_paths(&self) -> Vec<FocusPath> {
        self.inner.input_paths()
    }

    fn set_input_value(&mut self, path: &[String], value: &str) -> Option<Value> {
        self.inner.set_input_value(path, value)
    }

    fn user_input(&self) -> Option<Value> {
        self.inner.user_input()
    }

    fn serialized_state(&self) -> Option<Value> {
        Some(json!({ "v": self.inner.value }))
    }

    fn restores_serialized_state(&self) -> bool {
        true
    }

    fn restore_serialized_state(&mut self, state: &Value, signal: RestoreSignal) -> Option<Value> {
        let value = state.get("v").and_then(Value::as_str).unwrap_or("");
        signal.complete();
        Some(json!({ "currentValue": value }))
    }
}

/// Like `FakeInput` but advertising a different answer format.
struct FractionInput {
    inner: FakeInput,
}

impl Widget for FractionInput {
    fn widget_type(&self) -> &'static str {
        "fraction-input"
    }

    fn replace_props(&mut self, props: &WidgetRenderProps) {
        self.inner.replace_props(props);
    }

    fn examples(&self) -> Option<Vec<String>> {
        Some(vec!["a fraction, like $1/2$".to_string()])
    }
}

fn strip_answer(_options: &Value) -> Value {
    json!({ "currentValue": "" })
}

fn registry() -> Rc<WidgetRegistry> {
    let mut registry = WidgetRegistry::new();
    registry.register(WidgetEntry {
        name: "fake-input",
        display_name: "Fake input",
        default_alignment: Alignment::InlineBlock,
        builder: Box::new(|props| Box::new(FakeInput::new(props))),
        transform: Some(strip_answer),
    });
    registry.register(WidgetEntry {
        name: "stateful-input",
        display_name: "Stateful input",
        default_alignment: Alignment::InlineBlock,
        builder: Box::new(|props| {
            Box::new(StatefulInput {
                inner: FakeInput::new(props),
            })
        }),
        transform: Some(strip_answer),
    });
    registry.register(WidgetEntry {
        name: "fraction-input",
        display_name: "Fraction input",
        default_alignment: Alignment::InlineBlock,
        builder: Box::new(|props| {
            Box::new(FractionInput {
                inner: FakeInput::new(props),
            })
        }),
        transform: Some(strip_answer),
    });
    Rc::new(registry)
}

fn widget_info(type_name: &str, answer: &str) -> WidgetInfo {
    WidgetInfo {
        type_name: type_name.to_string(),
        options: json!({ "answer": answer }),
        ..Default::default()
    }
}

fn options_for(content: &str, ids: &[&str]) -> RendererOptions {
    let mut widgets = HashMap::new();
    for id in ids {
        let type_name = id.rsplit_once(' ').map(|(t, _)| t).unwrap_or(id);
        widgets.insert(id.to_string(), widget_info(type_name, "42"));
    }
    RendererOptions {
        content: content.to_string(),
        widgets,
        ..Default::default()
    }
}

fn renderer_for(content: &str, ids: &[&str]) -> Renderer {
    Renderer::new(
        options_for(content, ids),
        registry(),
        None,
        RendererHooks::default(),
    )
}

// ---- document order and identity -------------------------------------------

#[test]
fn widget_ids_follow_document_order() {
    let renderer = renderer_for(
        "b: [[☃ fake-input 2]]\n\na: [[☃ fake-input 1]]",
        &["fake-input 1", "fake-input 2"],
    );
    assert_eq!(renderer.widget_ids(), ["fake-input 2", "fake-input 1"]);
}

#[test]
fn duplicate_widget_id_renders_an_inline_error() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 1]] and again [[☃ fake-input 1]]",
        &["fake-input 1"],
    );
    let rendered = renderer.render();
    assert_eq!(renderer.widget_ids(), ["fake-input 1"]);

    let mut errors = Vec::new();
    for element in &rendered.elements {
        element.walk(&mut |el| {
            if let Element::WidgetError { message, .. } = el {
                errors.push(message.clone());
            }
        });
    }
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("already exists"));
}

#[test]
fn widget_missing_from_the_map_gets_fallback_info() {
    // No entry for the id: the type is implied by the id itself.
    let renderer = renderer_for("[[☃ fake-input 1]]", &[]);
    assert_eq!(renderer.widget_ids(), ["fake-input 1"]);
    assert_eq!(renderer.widget_info_for("fake-input 1").type_name, "fake-input");
    assert!(renderer.widget_instance("fake-input 1").is_some());
}

// ---- memoization ------------------------------------------------------------

#[test]
fn render_is_memoized_on_unchanged_state() {
    let mut renderer = renderer_for("hello [[☃ fake-input 1]]", &["fake-input 1"]);
    let first = renderer.render();
    let second = renderer.render();
    assert!(Rc::ptr_eq(&first, &second));

    renderer.set_content("changed [[☃ fake-input 1]]".to_string());
    let third = renderer.render();
    assert!(!Rc::ptr_eq(&second, &third));
}

#[test]
fn highlighted_widgets_invalidate_the_memo() {
    let mut renderer = renderer_for("hello [[☃ fake-input 1]]", &["fake-input 1"]);
    let first = renderer.render();
    renderer.set_highlighted_widgets(vec!["fake-input 1".to_string()]);
    let second = renderer.render();
    assert!(!Rc::ptr_eq(&first, &second));

    let mut highlighted = None;
    for element in &second.elements {
        element.walk(&mut |el| {
            if let Element::Widget { highlighted: h, .. } = el {
                highlighted = Some(*h);
            }
        });
    }
    assert_eq!(highlighted, Some(true));
}

#[test]
fn always_update_disables_memoization() {
    let mut options = options_for("hello", &[]);
    options.always_update = true;
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());
    let first = renderer.render();
    let second = renderer.render();
    assert!(!Rc::ptr_eq(&first, &second));
}

#[test]
fn content_changes_reset_widget_props() {
    let mut renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "stale", None);
    renderer.flush_deferred();
    assert_eq!(
        renderer.serialized_state()["fake-input 1"]["currentValue"],
        json!("stale")
    );

    renderer.set_content("now: [[☃ fake-input 1]]".to_string());
    renderer.render();
    assert_eq!(
        renderer.serialized_state()["fake-input 1"]["currentValue"],
        json!("")
    );
}

// ---- focus -------------------------------------------------------------------

#[test]
fn focus_picks_the_first_widget_in_document_order() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 2]] then [[☃ fake-input 1]]",
        &["fake-input 1", "fake-input 2"],
    );
    assert!(renderer.focus());
    assert_eq!(
        renderer.current_focus(),
        Some(&FocusPath::for_widget("fake-input 2"))
    );
}

#[test]
fn focusing_a_prefix_of_the_current_path_is_a_noop() {
    let changes: Rc<RefCell<Vec<Option<FocusPath>>>> = Rc::new(RefCell::new(Vec::new()));
    let log = changes.clone();
    let mut hooks = RendererHooks::default();
    hooks.on_focus_change = Some(Box::new(move |new, _previous| {
        log.borrow_mut().push(new.cloned());
    }));

    let mut renderer = Renderer::new(
        options_for("[[☃ fake-input 1]]", &["fake-input 1"]),
        registry(),
        None,
        hooks,
    );
    renderer.on_widget_focus("fake-input 1", &["inner".to_string()]);
    assert_eq!(changes.borrow().len(), 1);

    // The widget as a whole is a prefix of its focused inner input.
    renderer.focus_path(&FocusPath::for_widget("fake-input 1"));
    assert_eq!(
        renderer.current_focus(),
        Some(&FocusPath::join("fake-input 1", &["inner".to_string()]))
    );
    assert_eq!(changes.borrow().len(), 1, "no focus change event");
}

#[test]
fn stale_blur_cancels_itself_when_focus_moves_on() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 1]] [[☃ fake-input 2]]",
        &["fake-input 1", "fake-input 2"],
    );
    renderer.on_widget_focus("fake-input 1", &[]);
    renderer.on_widget_blur("fake-input 1", &[]);
    renderer.on_widget_focus("fake-input 2", &[]);
    renderer.flush_deferred();
    assert_eq!(
        renderer.current_focus(),
        Some(&FocusPath::for_widget("fake-input 2"))
    );
}

#[test]
fn unanswered_blur_clears_focus_next_tick() {
    let mut renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    renderer.on_widget_focus("fake-input 1", &[]);
    renderer.blur();
    assert!(renderer.current_focus().is_some(), "blur resolves deferred");
    renderer.flush_deferred();
    assert_eq!(renderer.current_focus(), None);
}

#[test]
fn input_paths_are_prefixed_with_widget_ids() {
    let renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    let paths = renderer.input_paths();
    assert_eq!(paths, vec![FocusPath::for_widget("fake-input 1")]);
}

// ---- change protocol ----------------------------------------------------------

#[test]
fn change_patches_merge_now_and_focus_next_tick() {
    let mut renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    renderer.on_widget_change("fake-input 1", json!({ "currentValue": "42" }), false);

    // The patch is visible immediately.
    let state = renderer.serialized_state();
    assert_eq!(state["fake-input 1"]["currentValue"], json!("42"));
    // Focus only moves on the next tick.
    assert_eq!(renderer.current_focus(), None);
    renderer.flush_deferred();
    assert_eq!(
        renderer.current_focus(),
        Some(&FocusPath::for_widget("fake-input 1"))
    );
}

#[test]
fn interaction_hooks_fire_once_per_widget() {
    let tracked: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let interacted: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let tracked_log = tracked.clone();
    let interacted_log = interacted.clone();

    let mut hooks = RendererHooks::default();
    hooks.track_interaction = Some(Box::new(move |event| {
        tracked_log.borrow_mut().push(event.widget_id.clone());
    }));
    hooks.on_interact_with_widget = Some(Box::new(move |id| {
        interacted_log.borrow_mut().push(id.to_string());
    }));

    let mut renderer = Renderer::new(
        options_for("[[☃ fake-input 1]]", &["fake-input 1"]),
        registry(),
        None,
        hooks,
    );
    renderer.on_widget_change("fake-input 1", json!({ "currentValue": "1" }), false);
    renderer.flush_deferred();
    renderer.on_widget_change("fake-input 1", json!({ "currentValue": "12" }), false);
    renderer.flush_deferred();

    assert_eq!(tracked.borrow().as_slice(), ["fake-input 1"]);
    assert_eq!(
        interacted.borrow().as_slice(),
        ["fake-input 1", "fake-input 1"]
    );
}

#[test]
fn silent_changes_skip_notification() {
    let snapshots: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let count = snapshots.clone();
    let mut hooks = RendererHooks::default();
    hooks.on_serialized_state_updated = Some(Box::new(move |_state| {
        *count.borrow_mut() += 1;
    }));

    let mut renderer = Renderer::new(
        options_for("[[☃ fake-input 1]]", &["fake-input 1"]),
        registry(),
        None,
        hooks,
    );
    renderer.on_widget_change("fake-input 1", json!({ "currentValue": "1" }), true);
    renderer.flush_deferred();
    assert_eq!(*snapshots.borrow(), 0);
    // Focus still follows the change; only the notifications are skipped.
    assert_eq!(
        renderer.current_focus(),
        Some(&FocusPath::for_widget("fake-input 1"))
    );

    renderer.on_widget_change("fake-input 1", json!({ "currentValue": "2" }), false);
    assert_eq!(*snapshots.borrow(), 1);
}

#[test]
fn set_input_value_routes_through_the_widget() {
    let mut renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "42", None);
    renderer.flush_deferred();
    assert_eq!(
        renderer.user_input(),
        vec![Some(json!({ "currentValue": "42" }))]
    );
}

// ---- scoring -------------------------------------------------------------------

#[test]
fn scoring_aggregates_in_document_order() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 1]] [[☃ fake-input 2]]",
        &["fake-input 1", "fake-input 2"],
    );
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "42", None);
    renderer.set_input_value(&FocusPath::for_widget("fake-input 2"), "7", None);
    renderer.flush_deferred();

    let scores = renderer.score_widgets();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].0, "fake-input 1");

    let inputs = renderer.user_input_for_widgets();
    let ids: Vec<&String> = inputs.keys().collect();
    assert_eq!(ids, ["fake-input 1", "fake-input 2"]);
    assert_eq!(inputs["fake-input 1"], json!({ "currentValue": "42" }));
    assert_eq!(
        renderer.score(),
        PerseusScore::Points {
            earned: 1,
            total: 2,
            message: None
        }
    );
}

#[test]
fn any_empty_widget_makes_the_aggregate_invalid() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 1]] [[☃ fake-input 2]]",
        &["fake-input 1", "fake-input 2"],
    );
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "42", None);
    renderer.flush_deferred();

    assert_eq!(renderer.score(), PerseusScore::Invalid { message: None });
    assert_eq!(renderer.empty_widgets(), vec!["fake-input 2".to_string()]);
}

#[test]
fn ungraded_widgets_are_skipped() {
    let mut options = options_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    if let Some(info) = options.widgets.get_mut("fake-input 1") {
        info.graded = false;
    }
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());
    assert!(renderer.score_widgets().is_empty());
    assert_eq!(
        renderer.score(),
        PerseusScore::Points {
            earned: 0,
            total: 0,
            message: None
        }
    );
}

#[test]
fn static_widgets_are_skipped_by_grading_and_emptiness() {
    let mut options = options_for(
        "[[☃ fake-input 1]] [[☃ fake-input 2]]",
        &["fake-input 1", "fake-input 2"],
    );
    options.problem_num = Some(3);
    if let Some(info) = options.widgets.get_mut("fake-input 2") {
        info.is_static = true;
    }
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "42", None);
    renderer.flush_deferred();

    // The static widget is untouched, yet it neither blocks grading nor
    // shows up as empty.
    let scores = renderer.score_widgets();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].0, "fake-input 1");
    assert_eq!(
        renderer.score(),
        PerseusScore::Points {
            earned: 1,
            total: 1,
            message: None
        }
    );
    assert!(renderer.empty_widgets().is_empty());
}

#[test]
fn examples_require_agreement() {
    let renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    assert_eq!(
        renderer.examples(),
        Some(vec!["anything, like $42$".to_string()])
    );

    // Widgets advertising different formats poison the set.
    let renderer = renderer_for(
        "[[☃ fake-input 1]] [[☃ fraction-input 1]]",
        &["fake-input 1", "fraction-input 1"],
    );
    assert_eq!(renderer.examples(), None);
}

#[test]
fn examples_skip_widgets_without_them() {
    // The stateful input has no examples; it must not hide the fake
    // input's.
    let renderer = renderer_for(
        "[[☃ fake-input 1]] [[☃ stateful-input 1]]",
        &["fake-input 1", "stateful-input 1"],
    );
    assert_eq!(
        renderer.examples(),
        Some(vec!["anything, like $42$".to_string()])
    );
}

// ---- serialization --------------------------------------------------------------

#[test]
fn serialized_state_keys_follow_document_order() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 2]] [[☃ fake-input 1]]",
        &["fake-input 1", "fake-input 2"],
    );
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "a", None);
    renderer.flush_deferred();

    let state = renderer.serialized_state();
    let keys: Vec<&String> = state.keys().collect();
    assert_eq!(keys, ["fake-input 2", "fake-input 1"]);
}

#[test]
fn serialized_state_can_read_from_an_override() {
    let renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    let mut pending = HashMap::new();
    pending.insert(
        "fake-input 1".to_string(),
        json!({ "currentValue": "99" }),
    );

    let state = renderer.serialized_state_with(&pending);
    assert_eq!(state["fake-input 1"]["currentValue"], json!("99"));
    // The renderer's own snapshot is untouched.
    assert_eq!(
        renderer.serialized_state()["fake-input 1"]["currentValue"],
        json!("")
    );
}

#[test]
fn restore_round_trips_widget_state() {
    let mut renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    renderer.set_input_value(&FocusPath::for_widget("fake-input 1"), "42", None);
    renderer.flush_deferred();
    let state = renderer.serialized_state();

    let mut fresh = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    assert!(fresh.restore_serialized_state(&state, || {}));
    fresh.flush_deferred();
    assert_eq!(
        fresh.user_input(),
        vec![Some(json!({ "currentValue": "42" }))]
    );
}

#[test]
fn restore_refuses_foreign_snapshots() {
    let mut renderer = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    let mut foreign = renderer.serialized_state();
    foreign.insert("radio 1".to_string(), json!({}));
    assert!(!renderer.restore_serialized_state(&foreign, || {}));
}

#[test]
fn restore_callback_waits_for_the_deferred_tick() {
    let mut renderer = renderer_for("[[☃ stateful-input 1]]", &["stateful-input 1"]);
    renderer.set_input_value(&FocusPath::for_widget("stateful-input 1"), "hi", None);
    renderer.flush_deferred();
    let state = renderer.serialized_state();
    assert_eq!(state["stateful-input 1"], json!({ "v": "hi" }));

    let mut fresh = renderer_for("[[☃ stateful-input 1]]", &["stateful-input 1"]);
    let done = Rc::new(RefCell::new(false));
    let done_flag = done.clone();
    assert!(fresh.restore_serialized_state(&state, move || {
        *done_flag.borrow_mut() = true;
    }));
    // The widget completed synchronously, but the renderer's own slot
    // holds the callback until the next tick.
    assert!(!*done.borrow());
    fresh.flush_deferred();
    assert!(*done.borrow());
    assert_eq!(
        fresh.user_input(),
        vec![Some(json!({ "currentValue": "hi" }))]
    );
}

#[test]
fn initial_serialized_state_is_restored_on_construction() {
    let mut seed = renderer_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    seed.set_input_value(&FocusPath::for_widget("fake-input 1"), "42", None);
    seed.flush_deferred();

    let mut options = options_for("[[☃ fake-input 1]]", &["fake-input 1"]);
    options.serialized_state = Some(seed.serialized_state());
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());
    renderer.flush_deferred();
    assert_eq!(
        renderer.score(),
        PerseusScore::Points {
            earned: 1,
            total: 1,
            message: None
        }
    );
}

// ---- widget queries ---------------------------------------------------------------

#[test]
fn find_widgets_by_id_type_and_predicate() {
    let mut renderer = renderer_for(
        "[[☃ fake-input 1]] [[☃ stateful-input 1]]",
        &["fake-input 1", "stateful-input 1"],
    );

    assert_eq!(
        renderer
            .find_widgets(&FilterCriterion::from("fake-input 1"))
            .len(),
        1
    );
    assert_eq!(
        renderer
            .find_widgets(&FilterCriterion::from("fake-input"))
            .len(),
        1
    );
    let all = renderer.find_widgets(&FilterCriterion::Predicate(Rc::new(|_, _, _| true)));
    assert_eq!(all.len(), 2);
}

// ---- lint ------------------------------------------------------------------------

#[test]
fn lint_wrapped_paragraphs_keep_their_children() {
    let mut options = options_for("watch the tone", &[]);
    options.linter_context.highlight_lint = true;
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());
    renderer.set_translation_lint_errors(vec!["tone".to_string()]);

    // Translation lint wraps the head paragraph; its text must survive.
    let rendered = renderer.render();
    let mut lint_text = None;
    for element in &rendered.elements {
        element.walk(&mut |el| {
            if let Element::Lint { child, .. } = el {
                if let Element::Paragraph { children, .. } = child.as_ref() {
                    if let Some(Element::Text { content }) = children.first() {
                        lint_text = Some(content.clone());
                    }
                }
            }
        });
    }
    assert_eq!(lint_text.as_deref(), Some("watch the tone"));
}

// ---- jipt ------------------------------------------------------------------------

#[test]
fn untranslated_jipt_content_renders_a_placeholder() {
    let mut options = options_for("crwdns123:0crwdne123:0", &[]);
    options.api_options.use_jipt = true;
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());

    let rendered = renderer.render();
    assert!(matches!(
        rendered.elements.as_slice(),
        [Element::JiptPlaceholder { .. }]
    ));
    assert!(renderer.widget_ids().is_empty());

    renderer.replace_jipt_content("translated text".to_string(), None);
    let rendered = renderer.render();
    assert!(matches!(
        rendered.elements.as_slice(),
        [Element::Paragraph { .. }]
    ));
}

#[test]
fn jipt_paragraph_edits_are_validated() {
    let mut options = options_for("crwdns1:0crwdne1:0\n\nsecond para", &[]);
    options.api_options.use_jipt = true;
    let mut renderer = Renderer::new(options, registry(), None, RendererHooks::default());
    renderer.replace_jipt_content("first\n\nsecond".to_string(), Some(0));

    // A multi-paragraph edit collapses to an inline warning.
    let rendered = renderer.render();
    let mut saw_warning = false;
    for element in &rendered.elements {
        element.walk(&mut |el| {
            if let Element::Math { tex, .. } = el {
                if tex.contains("red") {
                    saw_warning = true;
                }
            }
        });
    }
    assert!(saw_warning);
}
