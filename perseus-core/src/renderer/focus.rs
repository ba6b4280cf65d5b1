//! Focus routing.
//!
//! The renderer owns one current focus path at a time. Transitions are
//! idempotent, a new path that is a prefix of the current one is a no-op
//! (focusing a widget whose inner input already holds focus must not
//! steal it), and blur resolution is deferred so that a blur immediately
//! followed by a refocus cancels itself.

use crate::types::{is_id_path_prefix, FocusPath};
use crate::widget::{NodeHandle, WidgetFocusResult};

use super::Renderer;

impl Renderer {
    /// Focuses the first widget that accepts focus, in document order.
    /// Returns whether anything took focus.
    pub fn focus(&mut self) -> bool {
        for id in self.widget_ids.clone() {
            let Some(handle) = self.instances.get(&id) else {
                continue;
            };
            let result = handle.borrow_mut().focus();
            let path = match result {
                WidgetFocusResult::Unhandled => continue,
                WidgetFocusResult::Focused => FocusPath::for_widget(&id),
                WidgetFocusResult::FocusedAt(sub_path) => {
                    // Old-style widgets answer with their focused inner
                    // path; honor it but flag the widget for cleanup.
                    tracing::error!(
                        widget_id = %id,
                        "widget returned a focus path instead of accepting focus"
                    );
                    FocusPath::join(&id, &sub_path)
                }
            };
            self.set_current_focus(Some(path));
            return true;
        }
        false
    }

    /// Moves focus to a specific input path.
    pub fn focus_path(&mut self, path: &FocusPath) {
        if self.current_focus.as_ref() == Some(path) {
            return;
        }
        if let Some(current) = self.current_focus.clone() {
            self.blur_widget_at(&current);
        }
        if let Some(id) = path.widget_id() {
            if let Some(handle) = self.instances.get(id) {
                handle.borrow_mut().focus_input_path(path.sub_path());
            }
        }
        self.commit_focus(Some(path.clone()));
    }

    /// Removes focus from `path` if it currently holds focus. The focus
    /// state itself clears next tick, unless something else takes focus
    /// first.
    pub fn blur_path(&mut self, path: &FocusPath) {
        if self.current_focus.as_ref() != Some(path) {
            return;
        }
        self.blur_widget_at(path);
        let expected = path.clone();
        self.defer(move |renderer| {
            // Stale by now if focus moved on; drop it in that case.
            if renderer.current_focus.as_ref() == Some(&expected) {
                renderer.commit_focus(None);
            }
        });
    }

    /// Blurs whatever currently holds focus.
    pub fn blur(&mut self) {
        if let Some(current) = self.current_focus.clone() {
            self.blur_path(&current);
        }
    }

    /// A widget (routed through the UI layer) reported gaining focus.
    pub fn on_widget_focus(&mut self, id: &str, sub_path: &[String]) {
        self.set_current_focus(Some(FocusPath::join(id, sub_path)));
    }

    /// A widget (routed through the UI layer) reported losing focus.
    pub fn on_widget_blur(&mut self, id: &str, sub_path: &[String]) {
        let path = FocusPath::join(id, sub_path);
        self.blur_path(&path);
    }

    /// Resolves a focus path to the rendered node it addresses.
    pub fn node_for_path(&self, path: &FocusPath) -> Option<NodeHandle> {
        let id = path.widget_id()?;
        let handle = self.instances.get(id)?;
        let resolved = handle.borrow().node_for_path(path.sub_path());
        resolved.or_else(|| path.sub_path().is_empty().then(|| NodeHandle::root(id)))
    }

    /// The grammar type of the input a path addresses, for keypad routing.
    pub fn grammar_type_for_path(&self, path: &FocusPath) -> Option<String> {
        let id = path.widget_id()?;
        let handle = self.instances.get(id)?;
        let grammar = handle.borrow().grammar_type_for_path(path.sub_path());
        grammar
    }

    /// Every focusable input path across all widgets, in document order.
    pub fn input_paths(&self) -> Vec<FocusPath> {
        let mut paths = Vec::new();
        for id in &self.widget_ids {
            let Some(handle) = self.instances.get(id) else {
                continue;
            };
            for inner in handle.borrow().input_paths() {
                paths.push(FocusPath::join(id, inner.segments()));
            }
        }
        paths
    }

    /// The single state transition every focus operation funnels through.
    pub(crate) fn set_current_focus(&mut self, new_path: Option<FocusPath>) {
        if is_id_path_prefix(new_path.as_ref(), self.current_focus.as_ref()) {
            return;
        }
        if let Some(previous) = self.current_focus.clone() {
            self.blur_widget_at(&previous);
        }
        self.commit_focus(new_path);
    }

    /// Records the transition and fires the focus-change hook. Assumes any
    /// widget-level blurring already happened.
    fn commit_focus(&mut self, new_path: Option<FocusPath>) {
        if is_id_path_prefix(new_path.as_ref(), self.current_focus.as_ref()) {
            return;
        }
        let previous = std::mem::replace(&mut self.current_focus, new_path);
        if let Some(hook) = self.hooks.on_focus_change.as_mut() {
            hook(self.current_focus.as_ref(), previous.as_ref());
        }
    }

    /// Tells the owning widget to blur the inner input at `path`.
    fn blur_widget_at(&mut self, path: &FocusPath) {
        let Some(id) = path.widget_id() else { return };
        if let Some(handle) = self.instances.get(id) {
            handle.borrow_mut().blur_input_path(path.sub_path());
        }
    }
}
