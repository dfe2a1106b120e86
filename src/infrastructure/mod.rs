//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP gateway to the form service, the download
//! directory, configuration and logging setup.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use gateway::*;
pub use logging::*;
pub use persistence::*;
