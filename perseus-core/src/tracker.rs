//! Per-widget interaction tracking.
//!
//! Hosts want to know the first time a learner touches each widget. The
//! tracker debounces: one event per widget per renderer lifetime, no
//! matter how many changes follow.

/// Fired at most once per widget, on its first interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    pub widget_type: String,
    pub widget_id: String,
}

#[derive(Debug)]
pub struct InteractionTracker {
    widget_type: String,
    widget_id: String,
    fired: bool,
}

impl InteractionTracker {
    pub fn new(widget_type: &str, widget_id: &str) -> Self {
        InteractionTracker {
            widget_type: widget_type.to_string(),
            widget_id: widget_id.to_string(),
            fired: false,
        }
    }

    /// Returns the event to emit on the first call, `None` afterwards.
    pub fn track(&mut self) -> Option<InteractionEvent> {
        if self.fired {
            return None;
        }
        self.fired = true;
        Some(InteractionEvent {
            widget_type: self.widget_type.clone(),
            widget_id: self.widget_id.clone(),
        })
    }
}
