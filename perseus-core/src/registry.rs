//! Widget type registry.
//!
//! Maps widget type names to constructors and per-type metadata. The
//! renderer looks widgets up here when it encounters them in content;
//! unknown types render as empty slots and are skipped by every protocol.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::{Alignment, WidgetInfo};
use crate::widget::{Widget, WidgetRenderProps};

pub type WidgetBuilder = Box<dyn Fn(&WidgetRenderProps) -> Box<dyn Widget>>;

/// Transforms a widget's stored options into its starting render props.
pub type OptionsTransform = fn(&Value) -> Value;

pub struct WidgetEntry {
    pub name: &'static str,
    pub display_name: &'static str,
    pub default_alignment: Alignment,
    pub builder: WidgetBuilder,
    /// Strips grading-only fields out of the options before they become
    /// props. `None` keeps the options as-is.
    pub transform: Option<OptionsTransform>,
}

#[derive(Default)]
pub struct WidgetRegistry {
    entries: HashMap<&'static str, WidgetEntry>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: WidgetEntry) {
        self.entries.insert(entry.name, entry);
    }

    pub fn get(&self, type_name: &str) -> Option<&WidgetEntry> {
        self.entries.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn default_alignment(&self, type_name: &str) -> Alignment {
        self.get(type_name)
            .map(|entry| entry.default_alignment)
            .unwrap_or_default()
    }

    /// Instantiates a widget of the given type, or `None` for unknown types.
    pub fn build(&self, type_name: &str, props: &WidgetRenderProps) -> Option<Box<dyn Widget>> {
        self.get(type_name).map(|entry| (entry.builder)(props))
    }

    /// Computes the starting props for a widget occurrence from its info.
    pub fn starting_props(&self, info: &WidgetInfo) -> Value {
        match self.get(&info.type_name).and_then(|entry| entry.transform) {
            Some(transform) => transform(&info.options),
            None => info.options.clone(),
        }
    }
}
