//! Workflow state owned by the step controller.
//!
//! The store is plain data. Only [`crate::application::StepController`]
//! writes to it; the presentation layer reads it through the accessors.

use crate::domain::{Candidate, Record, SubjectData, SubjectIdentity, WorkflowStep};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct WorkflowStore {
    pub(crate) step: WorkflowStep,
    pub(crate) file: Option<PathBuf>,
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) subject: SubjectIdentity,
    pub(crate) record: Option<Record>,
    pub(crate) mapped: Option<Record>,
    pub(crate) pdf_ready: bool,
    pub(crate) error: Option<String>,
    pub(crate) busy: bool,
}

impl WorkflowStore {
    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn subject(&self) -> &SubjectIdentity {
        &self.subject
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn mapped(&self) -> Option<&Record> {
        self.mapped.as_ref()
    }

    pub fn pdf_ready(&self) -> bool {
        self.pdf_ready
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Drops record, mapping and readiness, keeping the subject's names.
    pub(crate) fn clear_subject_data(&mut self) {
        self.record = None;
        self.mapped = None;
        self.pdf_ready = false;
    }

    pub(crate) fn apply_subject_data(&mut self, data: SubjectData) {
        self.record = Some(data.record);
        self.mapped = Some(data.mapped);
        self.pdf_ready = false;
    }

    /// Everything after file selection goes back to its initial value.
    pub(crate) fn reset_downstream(&mut self) {
        self.candidates.clear();
        self.subject = SubjectIdentity::default();
        self.clear_subject_data();
        self.step = WorkflowStep::Upload;
    }

    /// Checked after every transition in debug builds.
    pub(crate) fn invariants_hold(&self) -> bool {
        let mapping_follows_record = self.mapped.is_none() || self.record.is_some();
        let ready_needs_mapping = !self.pdf_ready || self.mapped.is_some();
        mapping_follows_record && ready_needs_mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn record() -> Record {
        let mut map = Map::new();
        map.insert("first_name".to_string(), Value::String("Ana".to_string()));
        map
    }

    #[test]
    fn test_store_default() {
        let store = WorkflowStore::default();
        assert_eq!(store.step(), WorkflowStep::Upload);
        assert!(store.file().is_none());
        assert!(store.candidates().is_empty());
        assert!(store.subject().is_empty());
        assert!(store.record().is_none());
        assert!(store.mapped().is_none());
        assert!(!store.pdf_ready());
        assert!(store.error().is_none());
        assert!(!store.is_busy());
        assert!(store.invariants_hold());
    }

    #[test]
    fn test_reset_downstream_keeps_file_and_error() {
        let mut store = WorkflowStore {
            step: WorkflowStep::Review,
            file: Some(PathBuf::from("clients.xlsx")),
            candidates: vec![Candidate::new("Ana", "Gomez")],
            subject: SubjectIdentity::new("Ana", "Gomez"),
            record: Some(record()),
            mapped: Some(record()),
            pdf_ready: true,
            error: Some("old".to_string()),
            busy: false,
        };
        store.reset_downstream();
        assert_eq!(store.step(), WorkflowStep::Upload);
        assert!(store.candidates().is_empty());
        assert!(store.subject().is_empty());
        assert!(store.record().is_none());
        assert!(store.mapped().is_none());
        assert!(!store.pdf_ready());
        assert_eq!(store.file(), Some(Path::new("clients.xlsx")));
        assert_eq!(store.error(), Some("old"));
    }

    #[test]
    fn test_invariant_detection() {
        let store = WorkflowStore {
            mapped: Some(record()),
            ..WorkflowStore::default()
        };
        assert!(!store.invariants_hold());

        let store = WorkflowStore {
            pdf_ready: true,
            ..WorkflowStore::default()
        };
        assert!(!store.invariants_hold());
    }

    #[test]
    fn test_apply_subject_data_resets_readiness() {
        let mut store = WorkflowStore {
            pdf_ready: true,
            record: Some(record()),
            mapped: Some(record()),
            ..WorkflowStore::default()
        };
        store.apply_subject_data(SubjectData {
            record: record(),
            mapped: record(),
        });
        assert!(!store.pdf_ready());
        assert!(store.invariants_hold());
    }
}
