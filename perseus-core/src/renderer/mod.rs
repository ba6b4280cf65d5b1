//! The renderer: compiles exercise markdown into an element tree, owns the
//! live widget instances embedded in it, and drives the focus, change,
//! scoring and serialization protocols.
//!
//! Construction performs the initial render (and initial state restore,
//! when a snapshot is supplied), so `widget_ids` is populated from the
//! start. Several operations promise next-tick effects; callers drain
//! those with [`Renderer::flush_deferred`] once the current event settles.

mod focus;
mod output;
mod scoring;
mod state;

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;
use serde_json::Value;

use perseus_markdown::jipt;

use crate::hooks::RendererHooks;
use crate::linter::{Linter, LinterContext};
use crate::registry::WidgetRegistry;
use crate::scheduler::TaskQueue;
use crate::tracker::InteractionTracker;
use crate::types::{ApiOptions, FocusPath, ImageTable, SerializedState, WidgetInfo};
use crate::util;
use crate::widget::{WidgetHandle, WidgetRenderProps};
use crate::RenderedContent;

/// Everything the host supplies to set a renderer up. Deserializable so
/// exercise JSON maps onto it directly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererOptions {
    /// The exercise markdown.
    pub content: String,
    /// Widget occurrence metadata, keyed by widget id.
    pub widgets: HashMap<String, WidgetInfo>,
    /// Intrinsic image dimensions, keyed by source url.
    pub images: ImageTable,
    /// Which attempt of a multi-problem set this is. Also disables static
    /// widgets when present.
    pub problem_num: Option<u32>,
    /// Review mode renders widgets with their grading rubric attached.
    pub review_mode: bool,
    pub highlighted_widgets: Vec<String>,
    /// Disables render memoization entirely.
    pub always_update: bool,
    pub api_options: ApiOptions,
    pub linter_context: LinterContext,
    /// Snapshot to restore immediately after the initial render.
    pub serialized_state: Option<SerializedState>,
}

/// Deferred-callback signature for [`Renderer::set_input_value`]: runs
/// next tick and returns whether focus should still move to the widget.
pub type ChangeCallback = Box<dyn FnOnce(&mut Renderer) -> bool>;

pub(crate) struct RenderMemo {
    signature: RenderSignature,
    rendered: Rc<RenderedContent>,
}

/// Everything the compiled element tree depends on. Equal signatures mean
/// the memoized tree can be reused.
#[derive(PartialEq)]
pub(crate) struct RenderSignature {
    content: String,
    translation_lint_errors: Vec<String>,
    highlighted_widgets: Vec<String>,
    highlight_lint: bool,
    /// Widget metadata participates only while linting, which inspects it.
    widgets_fingerprint: Option<String>,
}

pub struct Renderer {
    pub(crate) options: RendererOptions,
    pub(crate) registry: Rc<WidgetRegistry>,
    pub(crate) linter: Option<Box<dyn Linter>>,
    pub(crate) hooks: RendererHooks,

    /// Normalized widget metadata: type filled in from the id, alignment
    /// resolved against the registry default.
    pub(crate) widget_info: HashMap<String, WidgetInfo>,
    /// Each widget's current props. Survives re-renders; reset only when
    /// the exercise itself changes.
    pub(crate) widget_props: HashMap<String, Value>,
    /// Widget ids in document order, rebuilt on every full render pass.
    pub(crate) widget_ids: Vec<String>,
    /// Live widget instances keyed by id.
    pub(crate) instances: HashMap<String, WidgetHandle>,
    pub(crate) trackers: HashMap<String, InteractionTracker>,

    pub(crate) current_focus: Option<FocusPath>,
    pub(crate) last_used_widget_id: Option<String>,

    /// Translator-edited content overriding `options.content`.
    pub(crate) jipt_content: Option<String>,
    pub(crate) translation_index: Option<usize>,
    pub(crate) translation_lint_errors: Vec<String>,

    pub(crate) deferred: TaskQueue<Renderer>,
    pub(crate) memo: Option<RenderMemo>,
}

static NEXT_TRANSLATION_INDEX: AtomicUsize = AtomicUsize::new(0);

impl Renderer {
    /// Builds a renderer and performs the mount sequence: an initial
    /// render, then the initial state restore if a snapshot was supplied.
    pub fn new(
        options: RendererOptions,
        registry: Rc<WidgetRegistry>,
        linter: Option<Box<dyn Linter>>,
        hooks: RendererHooks,
    ) -> Self {
        let mut renderer = Renderer {
            options,
            registry,
            linter,
            hooks,
            widget_info: HashMap::new(),
            widget_props: HashMap::new(),
            widget_ids: Vec::new(),
            instances: HashMap::new(),
            trackers: HashMap::new(),
            current_focus: None,
            last_used_widget_id: None,
            jipt_content: None,
            translation_index: None,
            translation_lint_errors: Vec::new(),
            deferred: TaskQueue::new(),
            memo: None,
        };
        renderer.reset_widget_state();
        renderer.render();
        if let Some(state) = renderer.options.serialized_state.take() {
            renderer.restore_serialized_state(&state, || {});
        }
        renderer
    }

    /// Rebuilds the normalized widget metadata and starting props from the
    /// current options, discarding accumulated input.
    fn reset_widget_state(&mut self) {
        self.widget_info.clear();
        self.widget_props.clear();
        for (id, raw) in &self.options.widgets {
            let info = self.normalize_widget_info(id, raw.clone());
            let props = self.registry.starting_props(&info);
            self.widget_info.insert(id.clone(), info);
            self.widget_props.insert(id.clone(), props);
        }
        self.instances.clear();
        self.memo = None;
    }

    fn normalize_widget_info(&self, id: &str, mut info: WidgetInfo) -> WidgetInfo {
        if info.type_name.is_empty() {
            if let Some((type_name, _)) = util::parse_widget_id(id) {
                info.type_name = type_name.to_string();
            }
        }
        if info.alignment == crate::Alignment::Default {
            info.alignment = self.registry.default_alignment(&info.type_name);
        }
        info
    }

    /// Fallback metadata for a widget that appears in content but not in
    /// the widget map: the type is implied by the id.
    pub(crate) fn default_widget_info(&self, id: &str) -> WidgetInfo {
        let mut info = WidgetInfo::default();
        if let Some((type_name, _)) = util::parse_widget_id(id) {
            info.type_name = type_name.to_string();
            info.alignment = self.registry.default_alignment(type_name);
        }
        info
    }

    /// The normalized metadata for a widget id, synthesizing a fallback
    /// for ids missing from the widget map.
    pub fn widget_info_for(&self, id: &str) -> WidgetInfo {
        self.widget_info
            .get(id)
            .cloned()
            .unwrap_or_else(|| self.default_widget_info(id))
    }

    /// Widget ids in document order, as of the last render.
    pub fn widget_ids(&self) -> &[String] {
        &self.widget_ids
    }

    pub fn current_focus(&self) -> Option<&FocusPath> {
        self.current_focus.as_ref()
    }

    pub fn api_options(&self) -> &ApiOptions {
        &self.options.api_options
    }

    // ---- content mutation -------------------------------------------------

    /// Replaces the exercise content, resetting all widget state. Ids that
    /// no longer appear drop out on the next render.
    pub fn set_content(&mut self, content: String) {
        self.options.content = content;
        self.reset_widget_state();
    }

    /// Replaces the widget map, resetting all widget state.
    pub fn set_widgets(&mut self, widgets: HashMap<String, WidgetInfo>) {
        self.options.widgets = widgets;
        self.reset_widget_state();
    }

    pub fn set_problem_num(&mut self, problem_num: Option<u32>) {
        self.options.problem_num = problem_num;
        self.reset_widget_state();
    }

    pub fn set_highlighted_widgets(&mut self, ids: Vec<String>) {
        self.options.highlighted_widgets = ids;
    }

    pub fn set_translation_lint_errors(&mut self, errors: Vec<String>) {
        self.translation_lint_errors = errors;
    }

    // ---- render memoization -----------------------------------------------

    pub(crate) fn render_signature(&self) -> RenderSignature {
        let linting = self.options.linter_context.highlight_lint;
        RenderSignature {
            content: self.effective_content().to_string(),
            translation_lint_errors: self.translation_lint_errors.clone(),
            highlighted_widgets: self.options.highlighted_widgets.clone(),
            highlight_lint: linting,
            widgets_fingerprint: if linting {
                serde_json::to_string(&self.options.widgets).ok()
            } else {
                None
            },
        }
    }

    pub(crate) fn memo_hit(&self, signature: &RenderSignature) -> Option<Rc<RenderedContent>> {
        if self.options.always_update {
            return None;
        }
        let memo = self.memo.as_ref()?;
        (memo.signature == *signature).then(|| memo.rendered.clone())
    }

    pub(crate) fn store_memo(&mut self, signature: RenderSignature, rendered: Rc<RenderedContent>) {
        self.memo = Some(RenderMemo {
            signature,
            rendered,
        });
    }

    // ---- jipt -------------------------------------------------------------

    /// The content effectively rendered: translator edits override the
    /// host-supplied content.
    pub(crate) fn effective_content(&self) -> &str {
        self.jipt_content
            .as_deref()
            .unwrap_or(&self.options.content)
    }

    /// Whether the next render should emit a translation placeholder
    /// instead of compiled content.
    pub fn should_render_jipt_placeholder(&self) -> bool {
        self.options.api_options.use_jipt
            && self.jipt_content.is_none()
            && self.options.content.contains(jipt::CROWDIN_MARKER)
    }

    pub(crate) fn claim_translation_index(&mut self) -> usize {
        *self
            .translation_index
            .get_or_insert_with(|| NEXT_TRANSLATION_INDEX.fetch_add(1, Ordering::Relaxed))
    }

    /// Accepts translator-edited content from the in-place translation
    /// editor, either wholesale or for a single paragraph.
    pub fn replace_jipt_content(&mut self, content: String, paragraph_index: Option<usize>) {
        let Some(index) = paragraph_index else {
            self.jipt_content = Some(content);
            return;
        };

        let content = Self::validate_jipt_paragraph(content);
        let mut paragraphs = jipt::parse_to_array(self.effective_content());
        if index >= paragraphs.len() {
            tracing::error!(
                index,
                count = paragraphs.len(),
                "jipt paragraph index out of range"
            );
            return;
        }
        paragraphs[index] = content;
        self.jipt_content = Some(jipt::join_from_array(&paragraphs));
    }

    /// A paragraph-level translation must stay a single paragraph, unless
    /// it is one code fence. Violations are replaced with a red TeX
    /// warning the translator sees in place.
    fn validate_jipt_paragraph(content: String) -> String {
        if jipt::CODE_FENCE_RE.is_match(&content) {
            return content;
        }
        if MULTI_PARAGRAPH_RE.is_match(&content) {
            return warning_tex("Translation cannot contain more than one paragraph");
        }
        if content.trim().is_empty() {
            return warning_tex("Translation cannot be empty");
        }
        content
    }

    // ---- deferred tasks ---------------------------------------------------

    pub(crate) fn defer(&mut self, task: impl FnOnce(&mut Renderer) + 'static) {
        self.deferred.schedule(task);
    }

    /// Runs every pending deferred task, including tasks those tasks
    /// schedule. Hosts call this once per settled event.
    pub fn flush_deferred(&mut self) {
        while let Some(task) = self.deferred.pop() {
            task(self);
        }
    }

    pub fn has_deferred_work(&self) -> bool {
        !self.deferred.is_empty()
    }

    // ---- change protocol --------------------------------------------------

    /// Applies a change patch from the widget identified by `id`: merges
    /// it into the widget's props now, commits to the instance, and
    /// schedules the interaction/focus notifications for the next tick.
    ///
    /// `silent` changes skip last-used tracking, snapshot notification and
    /// interaction hooks.
    pub fn on_widget_change(&mut self, id: &str, patch: Value, silent: bool) {
        self.on_widget_change_with(id, patch, silent, None);
    }

    pub fn on_widget_change_with(
        &mut self,
        id: &str,
        patch: Value,
        silent: bool,
        callback: Option<ChangeCallback>,
    ) {
        let base = self
            .widget_props
            .get(id)
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        self.widget_props
            .insert(id.to_string(), util::merge_props(base, patch));

        if !silent {
            self.last_used_widget_id = Some(id.to_string());
            let snapshot = self.serialized_state();
            if let Some(hook) = self.hooks.on_serialized_state_updated.as_mut() {
                hook(&snapshot);
            }
        }

        self.push_widget_props(id);

        let id = id.to_string();
        self.defer(move |renderer| {
            let keep_focus = match callback {
                Some(callback) => callback(renderer),
                None => true,
            };
            if !silent {
                renderer.notify_interaction(&id);
            }
            if keep_focus {
                renderer.set_current_focus(Some(FocusPath::for_widget(&id)));
            }
        });
    }

    /// Edits the input at `path` through the owning widget, feeding the
    /// resulting patch through the change protocol.
    pub fn set_input_value(
        &mut self,
        path: &FocusPath,
        value: &str,
        callback: Option<ChangeCallback>,
    ) {
        let Some(id) = path.widget_id() else {
            tracing::error!("set_input_value called with an empty path");
            return;
        };
        let patch = self
            .instances
            .get(id)
            .and_then(|widget| widget.borrow_mut().set_input_value(path.sub_path(), value));
        match patch {
            Some(patch) => {
                let id = id.to_string();
                self.on_widget_change_with(&id, patch, false, callback);
            }
            None => tracing::warn!(widget_id = id, "widget does not support set_input_value"),
        }
    }

    fn notify_interaction(&mut self, id: &str) {
        let widget_type = self.widget_info_for(id).type_name;
        let tracker = self
            .trackers
            .entry(id.to_string())
            .or_insert_with(|| InteractionTracker::new(&widget_type, id));
        if let Some(event) = tracker.track() {
            if let Some(hook) = self.hooks.track_interaction.as_mut() {
                hook(&event);
            }
        }
        if let Some(hook) = self.hooks.on_interact_with_widget.as_mut() {
            hook(id);
        }
    }

    // ---- instances --------------------------------------------------------

    pub(crate) fn widget_render_props(&self, id: &str, info: &WidgetInfo) -> WidgetRenderProps {
        WidgetRenderProps {
            widget_id: id.to_string(),
            props: self
                .widget_props
                .get(id)
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            alignment: info.alignment,
            is_static: info.is_static && self.options.problem_num.is_none(),
            problem_num: self.options.problem_num,
            review_mode_rubric: self.options.review_mode.then(|| info.options.clone()),
            is_last_used: self.last_used_widget_id.as_deref() == Some(id),
            highlighted: self.options.highlighted_widgets.iter().any(|h| h == id),
            api_options: self.options.api_options.clone(),
        }
    }

    /// Commits the current props of one widget to its live instance.
    pub(crate) fn push_widget_props(&mut self, id: &str) {
        let Some(handle) = self.instances.get(id).cloned() else {
            return;
        };
        let info = self.widget_info_for(id);
        let props = self.widget_render_props(id, &info);
        handle.borrow_mut().replace_props(&props);
    }

    /// Commits current props to every live instance, in document order.
    pub(crate) fn push_all_widget_props(&mut self) {
        for id in self.widget_ids.clone() {
            self.push_widget_props(&id);
        }
    }

    /// Drops instances and trackers for widgets no longer in the content.
    pub(crate) fn prune_stale_instances(&mut self) {
        let live: std::collections::HashSet<&String> = self.widget_ids.iter().collect();
        self.instances.retain(|id, _| live.contains(id));
        self.trackers.retain(|id, _| live.contains(id));
    }

    pub fn widget_instance(&self, id: &str) -> Option<WidgetHandle> {
        self.instances.get(id).cloned()
    }

    pub(crate) fn fire_on_render(&mut self) {
        if let Some(hook) = self.hooks.on_render.as_mut() {
            hook();
        }
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

/// Non-whitespace on both sides of a blank line: more than one paragraph.
static MULTI_PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S\n\s*\n\S").unwrap());

fn warning_tex(message: &str) -> String {
    ["$\\large{\\red{\\text{", message, "}}}$"].concat()
}
