//! Built-in widgets for perseus exercises.
//!
//! Each widget implements [`perseus_core::Widget`] and registers itself
//! through [`builtin_registry`], which hosts hand to the renderer.

pub mod input_number;
pub mod numeric;
pub mod radio;

use std::rc::Rc;

use perseus_core::WidgetRegistry;

/// A registry preloaded with every built-in widget type.
pub fn builtin_registry() -> Rc<WidgetRegistry> {
    let mut registry = WidgetRegistry::new();
    registry.register(input_number::entry());
    registry.register(radio::entry());
    Rc::new(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_builtins() {
        let registry = builtin_registry();
        assert!(registry.contains("input-number"));
        assert!(registry.contains("radio"));
        assert!(!registry.contains("categorizer"));
    }
}
