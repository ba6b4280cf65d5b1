//! Grading, answer collection and widget queries.

use serde_json::Value;

use crate::error::PerseusError;
use crate::types::PerseusScore;
use crate::util;
use crate::widget::{FilterCriterion, WidgetHandle};

use super::Renderer;

impl Renderer {
    /// Grades every graded, non-static widget, in document order.
    ///
    /// Widgets that do not support grading are skipped entirely; they do
    /// not contribute to the aggregate.
    pub fn score_widgets(&mut self) -> Vec<(String, PerseusScore)> {
        // The input-error hook is lent to widgets during grading.
        let mut error_hook = self.hooks.on_input_error.take();
        let mut scores = Vec::new();

        for id in &self.widget_ids {
            let info = match self.widget_info.get(id) {
                Some(info) => info.clone(),
                None => self.default_widget_info(id),
            };
            if !info.graded || info.is_static {
                continue;
            }
            let Some(handle) = self.instances.get(id) else {
                continue;
            };
            let score = match error_hook.as_mut() {
                Some(hook) => handle
                    .borrow()
                    .simple_validate(&info.options, Some(hook.as_mut())),
                None => handle.borrow().simple_validate(&info.options, None),
            };
            if let Some(score) = score {
                scores.push((id.clone(), score));
            }
        }

        self.hooks.on_input_error = error_hook;
        scores
    }

    /// The aggregate score across all graded widgets.
    pub fn score(&mut self) -> PerseusScore {
        util::combine_scores(self.score_widgets().into_iter().map(|(_, score)| score))
    }

    /// Every widget's current answer, in document order. Widgets without
    /// answers contribute `None`.
    pub fn user_input(&self) -> Vec<Option<Value>> {
        self.widget_ids
            .iter()
            .map(|id| {
                self.instances
                    .get(id)
                    .and_then(|handle| handle.borrow().user_input())
            })
            .collect()
    }

    /// Current answers keyed by widget id, skipping widgets that have
    /// none. Document order is preserved in the map.
    pub fn user_input_for_widgets(&self) -> serde_json::Map<String, Value> {
        let mut inputs = serde_json::Map::new();
        for id in &self.widget_ids {
            let input = self
                .instances
                .get(id)
                .and_then(|handle| handle.borrow().user_input());
            if let Some(input) = input {
                inputs.insert(id.clone(), input);
            }
        }
        inputs
    }

    /// Collects answers and grades them in one step.
    pub fn guess_and_score(&mut self) -> (Vec<Option<Value>>, PerseusScore) {
        let guess = self.user_input();
        let score = self.score();
        (guess, score)
    }

    /// Ids of graded, non-static widgets whose current answer is empty, in
    /// document order. Hosts use this to prompt for missing answers before
    /// grading.
    pub fn empty_widgets(&self) -> Vec<String> {
        // Grading without an error hook: the emptiness check must not
        // surface input errors to the host.
        let mut empty = Vec::new();
        for id in &self.widget_ids {
            let info = match self.widget_info.get(id) {
                Some(info) => info.clone(),
                None => self.default_widget_info(id),
            };
            if !info.graded || info.is_static {
                continue;
            }
            let Some(handle) = self.instances.get(id) else {
                continue;
            };
            let score = handle.borrow().simple_validate(&info.options, None);
            if let Some(score) = score {
                if util::score_is_empty(&score) {
                    empty.push(id.clone());
                }
            }
        }
        empty
    }

    /// Example answer formats, shown when the widgets that have them all
    /// agree. Widgets without examples are ignored; disagreement among the
    /// rest yields `None`, since mixed format hints would mislead the
    /// learner.
    pub fn examples(&self) -> Option<Vec<String>> {
        let mut agreed: Option<Vec<String>> = None;
        for id in &self.widget_ids {
            let Some(handle) = self.instances.get(id) else {
                continue;
            };
            let Some(examples) = handle.borrow().examples() else {
                continue;
            };
            match &agreed {
                Some(existing) if *existing != examples => return None,
                Some(_) => {}
                None => agreed = Some(examples),
            }
        }
        agreed
    }

    /// Reveals per-choice rationales on every widget that supports them.
    pub fn show_rationales_for_currently_selected_choices(&mut self) {
        for id in &self.widget_ids {
            let info = match self.widget_info.get(id) {
                Some(info) => info.clone(),
                None => self.default_widget_info(id),
            };
            if let Some(handle) = self.instances.get(id) {
                handle.borrow_mut().show_rationales(&info.options);
            }
        }
    }

    /// Clears incorrect selections on every widget that supports it.
    pub fn deselect_incorrect_selected_choices(&mut self) {
        for id in &self.widget_ids {
            if let Some(handle) = self.instances.get(id) {
                handle.borrow_mut().deselect_incorrect();
            }
        }
    }

    /// Editor-level serialization of every widget's configured state.
    /// Fails if any widget in content has not been instantiated, which
    /// means serialization ran against an unknown widget type.
    pub fn serialize(&self) -> Result<serde_json::Map<String, Value>, PerseusError> {
        let mut out = serde_json::Map::new();
        for id in &self.widget_ids {
            let handle = self.instances.get(id).ok_or_else(|| {
                PerseusError::internal(format!("cannot serialize uninstantiated widget {id}"))
            })?;
            let serialized = handle.borrow().serialize();
            if !serialized.is_null() {
                out.insert(id.clone(), serialized);
            }
        }
        Ok(out)
    }

    /// Widgets of this renderer matching the criterion, in document order.
    pub fn find_internal_widgets(&self, criterion: &FilterCriterion) -> Vec<WidgetHandle> {
        self.widget_ids
            .iter()
            .filter_map(|id| {
                let info = self
                    .widget_info
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| self.default_widget_info(id));
                let handle = self.instances.get(id);
                criterion
                    .matches(id, &info, handle)
                    .then(|| handle.cloned())
                    .flatten()
            })
            .collect()
    }

    /// Matching widgets from this renderer plus any the host contributes
    /// through the `find_external_widgets` hook.
    pub fn find_widgets(&mut self, criterion: &FilterCriterion) -> Vec<WidgetHandle> {
        let mut found = self.find_internal_widgets(criterion);
        if let Some(hook) = self.hooks.find_external_widgets.as_mut() {
            found.extend(hook(criterion));
        }
        found
    }
}
