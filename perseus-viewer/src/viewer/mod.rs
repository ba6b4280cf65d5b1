//! Interactive exercise viewer.
//!
//! Split into a pure data model (`model`), the terminal application shell
//! (`app`) and the ratatui rendering code (`ui`). The model owns the
//! renderer and is where all interaction semantics live, which keeps it
//! testable without a terminal.

pub mod app;
pub mod model;
pub mod ui;
