//! View data derived from application state.
//!
//! Nothing here mutates state; the renderer and the input handler both read
//! these values so that what is shown enabled is what is actually allowed.

use crate::application::App;
use crate::domain::{Record, WorkflowStep};
use serde_json::Value;

pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Done,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub number: usize,
    pub label: &'static str,
    pub state: StageState,
}

/// The three labelled stages of the progress indicator.
pub fn progress_stages(current: WorkflowStep) -> Vec<Stage> {
    WorkflowStep::ALL
        .iter()
        .map(|step| {
            let state = if step.index() < current.index() {
                StageState::Done
            } else if *step == current {
                StageState::Active
            } else {
                StageState::Pending
            };
            Stage {
                number: step.index() + 1,
                label: step.label(),
                state,
            }
        })
        .collect()
}

/// `date_of_birth` becomes `DATE OF BIRTH`.
pub fn field_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

/// Display text for a field value; null and empty values show as `N/A`.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_VALUE.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => MISSING_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn field_rows(record: &Record) -> Vec<(String, String)> {
    record
        .iter()
        .map(|(key, value)| (field_label(key), display_value(Some(value))))
        .collect()
}

/// Which actions are currently allowed. Everything is off while busy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub select_file: bool,
    pub upload: bool,
    pub edit_names: bool,
    pub choose_candidate: bool,
    pub process: bool,
    pub generate: bool,
    pub download: bool,
    pub return_to_selection: bool,
}

impl Controls {
    pub fn derive(app: &App) -> Self {
        if app.is_busy() {
            return Self::default();
        }
        let store = app.workflow.store();
        let step = store.step();
        Self {
            select_file: true,
            upload: step == WorkflowStep::Upload && store.file().is_some(),
            edit_names: step == WorkflowStep::SelectSubject,
            choose_candidate: step == WorkflowStep::SelectSubject && !store.candidates().is_empty(),
            process: step == WorkflowStep::SelectSubject && store.subject().is_complete(),
            generate: step == WorkflowStep::Review && store.mapped().is_some(),
            download: step == WorkflowStep::Review && store.pdf_ready(),
            return_to_selection: step == WorkflowStep::Review && !store.candidates().is_empty(),
        }
    }
}
