//! State snapshots: serialization and restoration of every widget's state.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::types::SerializedState;
use crate::util;
use crate::widget::RestoreSignal;

use super::Renderer;

impl Renderer {
    /// Snapshots every widget's state, keyed by id in document order.
    ///
    /// Widgets with a custom snapshot supply it; everything else is
    /// captured through its raw props.
    pub fn serialized_state(&self) -> SerializedState {
        self.serialized_state_with(&self.widget_props)
    }

    /// Like [`serialized_state`](Renderer::serialized_state), but reads
    /// raw props from a caller-supplied map instead of the renderer's
    /// current ones. Hosts use this to snapshot a pending props update
    /// before committing it.
    pub fn serialized_state_with(&self, props: &HashMap<String, Value>) -> SerializedState {
        let mut state = SerializedState::new();
        for id in &self.widget_ids {
            let custom = self
                .instances
                .get(id)
                .and_then(|handle| handle.borrow().serialized_state());
            let value = custom.or_else(|| props.get(id).cloned());
            if let Some(value) = value {
                state.insert(id.clone(), value);
            }
        }
        // Widgets configured but not (yet) rendered still carry state.
        for (id, value) in props {
            if !state.contains_key(id) {
                state.insert(id.clone(), value.clone());
            }
        }
        state
    }

    /// Restores a snapshot produced by [`serialized_state`].
    ///
    /// The snapshot must describe exactly the widgets this renderer has;
    /// a mismatched id set means the snapshot belongs to different content
    /// and is refused outright. `callback` fires once every widget has
    /// finished restoring, which is never earlier than the next
    /// [`flush_deferred`](Renderer::flush_deferred).
    pub fn restore_serialized_state(
        &mut self,
        state: &SerializedState,
        callback: impl FnOnce() + 'static,
    ) -> bool {
        let snapshot_ids: BTreeSet<&str> = state.keys().map(String::as_str).collect();
        let current_ids: BTreeSet<&str> = self.widget_props.keys().map(String::as_str).collect();
        if snapshot_ids != current_ids {
            tracing::error!(
                snapshot = ?snapshot_ids,
                current = ?current_ids,
                "refusing to restore a snapshot with a different widget set"
            );
            return false;
        }

        // The renderer holds one completion slot for itself so the
        // callback cannot fire while widgets are still being visited.
        let signal = RestoreSignal::new(Box::new(callback));

        for (id, value) in state {
            let handle = self
                .instances
                .get(id)
                .filter(|h| h.borrow().restores_serialized_state())
                .cloned();

            if let Some(handle) = handle {
                signal.add_participant();
                let patch = handle
                    .borrow_mut()
                    .restore_serialized_state(value, signal.clone());
                if let Some(patch) = patch {
                    let base = self
                        .widget_props
                        .get(id)
                        .cloned()
                        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                    self.widget_props
                        .insert(id.clone(), util::merge_props(base, patch));
                }
            } else {
                self.widget_props.insert(id.clone(), value.clone());
            }
        }

        self.push_all_widget_props();

        let own_slot = signal;
        self.defer(move |_renderer| own_slot.complete());
        true
    }
}
