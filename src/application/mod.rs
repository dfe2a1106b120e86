//! Application layer managing workflow state and user intents.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the store holds workflow data, the controller sequences the remote calls,
//! and the app state carries what the terminal UI needs on top.

pub mod controller;
pub mod state;
pub mod store;

pub use controller::*;
pub use state::*;
pub use store::*;
