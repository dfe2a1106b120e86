//! Application state for the terminal front end.
//!
//! [`App`] wraps the workflow controller with the UI-only state the
//! terminal needs: the active input mode, text buffers, list cursors and
//! the remote action waiting to run.

use super::controller::StepController;
use crate::domain::{Candidate, SubjectField, WorkflowStep};
use crate::infrastructure::{DocumentSink, RemoteGateway};
use std::path::PathBuf;

/// Represents the current mode of the application.
///
/// The mode decides how key presses are interpreted and which prompt the
/// status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Step navigation and action shortcuts
    Normal,
    /// Typing the path of a spreadsheet
    FilePath,
    /// Typing into the first or last name field
    NameEntry,
    /// Key reference popup
    Help,
}

/// A remote intent waiting for the event loop.
///
/// The loop draws the busy state first and then runs the action, so the
/// operator sees which call is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Upload,
    ProcessSubject,
    SelectAndProcess(Candidate),
    GeneratePdf,
    DownloadPdf,
}

impl PendingAction {
    pub fn describe(&self) -> String {
        match self {
            PendingAction::Upload => "Uploading spreadsheet...".to_string(),
            PendingAction::ProcessSubject => "Processing client...".to_string(),
            PendingAction::SelectAndProcess(candidate) => {
                format!("Processing {}...", candidate.full_name)
            }
            PendingAction::GeneratePdf => "Generating PDF...".to_string(),
            PendingAction::DownloadPdf => "Downloading PDF...".to_string(),
        }
    }
}

/// Reachability of the form service as last probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Unknown,
    Connected,
    Unreachable(String),
}

#[derive(Debug)]
pub struct App {
    /// Workflow state machine and its store
    pub workflow: StepController,
    /// Current input mode
    pub mode: AppMode,
    /// Path being typed in file mode
    pub filename_input: String,
    /// Cursor position, in characters, within the active text buffer
    pub cursor_position: usize,
    /// Name field receiving keystrokes in name-entry mode
    pub focused_field: SubjectField,
    /// Highlighted row of the candidate list
    pub candidate_cursor: usize,
    /// First visible row of the review tables
    pub table_scroll: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Remote action queued for the event loop
    pub pending: Option<PendingAction>,
    /// Outcome of the startup health probe
    pub service_status: ServiceStatus,
    /// Where the last download was written
    pub last_download: Option<PathBuf>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            workflow: StepController::new(),
            mode: AppMode::Normal,
            filename_input: String::new(),
            cursor_position: 0,
            focused_field: SubjectField::FirstName,
            candidate_cursor: 0,
            table_scroll: 0,
            help_scroll: 0,
            status_message: None,
            pending: None,
            service_status: ServiceStatus::Unknown,
            last_download: None,
        }
    }
}

impl App {
    pub fn step(&self) -> WorkflowStep {
        self.workflow.store().step()
    }

    /// True while a call runs or one is queued.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.workflow.store().is_busy()
    }

    /// Probes the service once; failure only affects the header.
    pub fn check_service<G: RemoteGateway + ?Sized>(&mut self, gateway: &G) {
        self.service_status = match gateway.health() {
            Ok(health) if health.is_healthy() => ServiceStatus::Connected,
            Ok(health) => ServiceStatus::Unreachable(health.status),
            Err(err) => {
                tracing::warn!(error = %err, "form service health check failed");
                ServiceStatus::Unreachable(err.to_string())
            }
        };
    }

    pub fn start_file_prompt(&mut self) {
        if self.is_busy() {
            return;
        }
        self.mode = AppMode::FilePath;
        self.filename_input = self
            .workflow
            .store()
            .file()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Stages the typed path and returns to normal mode.
    pub fn submit_file_path(&mut self) {
        let path = PathBuf::from(self.filename_input.trim());
        match self.workflow.select_file(path.clone()) {
            Ok(()) => {
                self.candidate_cursor = 0;
                self.table_scroll = 0;
                self.last_download = None;
                self.status_message = Some(format!(
                    "Selected {}. Press u to upload.",
                    path.display()
                ));
            }
            Err(_) => self.status_message = None,
        }
        self.cancel_filename_input();
    }

    pub fn start_name_entry(&mut self, field: SubjectField) {
        if self.is_busy() || self.step() == WorkflowStep::Upload {
            return;
        }
        self.mode = AppMode::NameEntry;
        self.focused_field = field;
        self.cursor_position = self.focused_value().chars().count();
    }

    pub fn finish_name_entry(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    pub fn switch_name_field(&mut self) {
        self.focused_field = self.focused_field.other();
        self.cursor_position = self.focused_value().chars().count();
    }

    pub fn focused_value(&self) -> &str {
        self.workflow.store().subject().field(self.focused_field)
    }

    pub fn insert_name_char(&mut self, c: char) {
        let mut value = self.focused_value().to_string();
        insert_char_at(&mut value, self.cursor_position, c);
        self.workflow.set_subject_field(self.focused_field, value);
        self.cursor_position += 1;
    }

    pub fn delete_name_char_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let mut value = self.focused_value().to_string();
        remove_char_at(&mut value, self.cursor_position - 1);
        self.workflow.set_subject_field(self.focused_field, value);
        self.cursor_position -= 1;
    }

    pub fn delete_name_char_at_cursor(&mut self) {
        let mut value = self.focused_value().to_string();
        if remove_char_at(&mut value, self.cursor_position) {
            self.workflow.set_subject_field(self.focused_field, value);
        }
    }

    pub fn insert_filename_char(&mut self, c: char) {
        insert_char_at(&mut self.filename_input, self.cursor_position, c);
        self.cursor_position += 1;
    }

    pub fn delete_filename_char_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            remove_char_at(&mut self.filename_input, self.cursor_position - 1);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_filename_char_at_cursor(&mut self) {
        remove_char_at(&mut self.filename_input, self.cursor_position);
    }

    /// Length in characters of whichever buffer the mode edits.
    pub fn active_input_len(&self) -> usize {
        match self.mode {
            AppMode::FilePath => self.filename_input.chars().count(),
            AppMode::NameEntry => self.focused_value().chars().count(),
            _ => 0,
        }
    }

    pub fn move_candidate_cursor(&mut self, delta: isize) {
        let count = self.workflow.store().candidates().len();
        if count == 0 {
            self.candidate_cursor = 0;
            return;
        }
        let next = self.candidate_cursor as isize + delta;
        self.candidate_cursor = next.clamp(0, count as isize - 1) as usize;
    }

    pub fn cursor_candidate(&self) -> Option<&Candidate> {
        self.workflow.store().candidates().get(self.candidate_cursor)
    }

    /// Copies the highlighted candidate into the name fields.
    pub fn pick_cursor_candidate(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(candidate) = self.cursor_candidate().cloned() {
            self.workflow.select_candidate(&candidate);
        }
    }

    pub fn scroll_tables(&mut self, delta: isize) {
        let rows = self
            .workflow
            .store()
            .record()
            .map(|r| r.len())
            .max(self.workflow.store().mapped().map(|m| m.len()))
            .unwrap_or(0);
        let next = self.table_scroll as isize + delta;
        self.table_scroll = next.clamp(0, rows.saturating_sub(1) as isize) as usize;
    }

    /// Queues a remote action; refused while another one is outstanding.
    pub fn queue(&mut self, action: PendingAction) -> bool {
        if self.is_busy() {
            return false;
        }
        self.status_message = Some(action.describe());
        self.pending = Some(action);
        true
    }

    /// Runs the queued action, if any, against the gateway.
    pub fn run_pending<G, S>(&mut self, gateway: &G, sink: &S)
    where
        G: RemoteGateway + ?Sized,
        S: DocumentSink + ?Sized,
    {
        let Some(action) = self.pending.take() else {
            return;
        };
        tracing::debug!(?action, "running queued action");

        self.status_message = match action {
            PendingAction::Upload => match self.workflow.upload(gateway) {
                Ok(message) => {
                    self.candidate_cursor = 0;
                    self.table_scroll = 0;
                    Some(message.unwrap_or_else(|| self.upload_summary()))
                }
                Err(_) => None,
            },
            PendingAction::ProcessSubject => {
                self.after_process(|app| app.workflow.process_subject(gateway))
            }
            PendingAction::SelectAndProcess(candidate) => {
                self.after_process(|app| app.workflow.select_and_process(&candidate, gateway))
            }
            PendingAction::GeneratePdf => match self.workflow.generate_pdf(gateway) {
                Ok(()) => Some("PDF generated. Press d to download.".to_string()),
                Err(_) => None,
            },
            PendingAction::DownloadPdf => match self.workflow.download_pdf(gateway, sink) {
                Ok(path) => {
                    let message = format!("Saved {}", path.display());
                    self.last_download = Some(path);
                    Some(message)
                }
                Err(_) => None,
            },
        };
    }

    /// Leaves review for the candidate list.
    pub fn return_to_selection(&mut self) {
        if self.workflow.return_to_selection() {
            self.table_scroll = 0;
            self.last_download = None;
            self.status_message = None;
        }
    }

    fn after_process<F>(&mut self, run: F) -> Option<String>
    where
        F: FnOnce(&mut Self) -> crate::domain::WorkflowResult<()>,
    {
        match run(self) {
            Ok(()) => {
                self.table_scroll = 0;
                self.last_download = None;
                Some(format!(
                    "Loaded data for {}",
                    self.workflow.store().subject().full_name()
                ))
            }
            Err(_) => None,
        }
    }

    fn upload_summary(&self) -> String {
        match self.step() {
            WorkflowStep::Review => "Spreadsheet processed".to_string(),
            _ => format!("Found {} clients", self.workflow.store().candidates().len()),
        }
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map(|(i, _)| i).unwrap_or(s.len())
}

fn insert_char_at(s: &mut String, char_pos: usize, c: char) {
    let index = byte_index(s, char_pos);
    s.insert(index, c);
}

fn remove_char_at(s: &mut String, char_pos: usize) -> bool {
    if char_pos >= s.chars().count() {
        return false;
    }
    let index = byte_index(s, char_pos);
    s.remove(index);
    true
}
