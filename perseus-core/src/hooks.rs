//! Host callbacks.
//!
//! The renderer reports noteworthy moments to its host through these
//! hooks. All are optional; an unset hook is a no-op.

use crate::tracker::InteractionEvent;
use crate::types::{FocusPath, SerializedState};
use crate::widget::{FilterCriterion, WidgetHandle};

/// Returns whether an input-error message should be kept on the score.
/// Arguments are the offending raw input and the proposed message.
pub type InputErrorHook = Box<dyn FnMut(&str, Option<&str>) -> bool>;

#[derive(Default)]
pub struct RendererHooks {
    /// Fired after every committed focus transition with (new, previous).
    pub on_focus_change: Option<Box<dyn FnMut(Option<&FocusPath>, Option<&FocusPath>)>>,
    /// Fired on every non-silent widget change, next tick, with the id.
    pub on_interact_with_widget: Option<Box<dyn FnMut(&str)>>,
    /// Fired the first time each widget is interacted with.
    pub track_interaction: Option<Box<dyn FnMut(&InteractionEvent)>>,
    /// Consulted when grading rejects a widget's raw input.
    pub on_input_error: Option<InputErrorHook>,
    /// Fired with a fresh snapshot after every non-silent change.
    pub on_serialized_state_updated: Option<Box<dyn FnMut(&SerializedState)>>,
    /// Fired after every render pass.
    pub on_render: Option<Box<dyn FnMut()>>,
    /// Lets the host contribute widgets living outside this renderer to
    /// `find_widgets` results (e.g. widgets in a sibling hints renderer).
    pub find_external_widgets: Option<Box<dyn FnMut(&FilterCriterion) -> Vec<WidgetHandle>>>,
}

impl std::fmt::Debug for RendererHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererHooks")
            .field("on_focus_change", &self.on_focus_change.is_some())
            .field("on_interact_with_widget", &self.on_interact_with_widget.is_some())
            .field("track_interaction", &self.track_interaction.is_some())
            .field("on_input_error", &self.on_input_error.is_some())
            .field(
                "on_serialized_state_updated",
                &self.on_serialized_state_updated.is_some(),
            )
            .field("on_render", &self.on_render.is_some())
            .field("find_external_widgets", &self.find_external_widgets.is_some())
            .finish()
    }
}
