//! Core rendering and scoring engine for perseus exercises.
//!
//! The centerpiece is [`renderer::Renderer`], which compiles exercise
//! markdown into a renderable element tree, manages the lifecycle of the
//! interactive widgets embedded in it, routes focus and input events, and
//! drives the scoring and serialization protocols. Widgets plug in through
//! the [`widget::Widget`] trait; concrete widget implementations live in
//! the `perseus-widgets` crate.

pub mod element;
pub mod error;
pub mod hooks;
pub mod linter;
pub mod registry;
pub mod renderer;
pub mod scheduler;
pub mod tracker;
pub mod types;
pub mod util;
pub mod widget;

pub use element::{Element, RenderedContent};
pub use error::{ErrorKind, PerseusError};
pub use registry::WidgetRegistry;
pub use renderer::{Renderer, RendererOptions};
pub use types::{Alignment, ApiOptions, FocusPath, PerseusScore, WidgetInfo};
pub use widget::{Widget, WidgetHandle};
