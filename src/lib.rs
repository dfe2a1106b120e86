//! formpilot - Terminal W-7 form workflow
//!
//! Drives a remote form service from the terminal: upload a spreadsheet,
//! pick the client, review the mapped fields and download the filled PDF.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
