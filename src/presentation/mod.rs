//! Presentation layer handling terminal UI and user input.
//!
//! This module derives view data from the workflow store, renders it with
//! ratatui, and turns key presses into workflow intents.

pub mod input;
pub mod ui;
pub mod view;

pub use input::*;
pub use ui::*;
pub use view::*;
