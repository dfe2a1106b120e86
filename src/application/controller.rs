//! Step controller for the upload → select → review workflow.
//!
//! Each public method is one operator intent. Local preconditions are checked
//! before any call reaches the gateway; a failed check records the error in
//! the store and returns it. At most one gateway call runs at a time.

use super::store::WorkflowStore;
use crate::domain::{
    is_spreadsheet, pdf_file_name, Candidate, GatewayError, SubjectField, UploadOutcome,
    WorkflowError, WorkflowResult, WorkflowStep,
};
use crate::infrastructure::{DocumentSink, RemoteGateway};
use std::path::PathBuf;

const UPLOAD_FAILED: &str = "Upload failed";
const PROCESS_FAILED: &str = "Client processing failed";
const GENERATE_FAILED: &str = "PDF generation failed";
const DOWNLOAD_FAILED: &str = "Download failed";

#[derive(Debug, Default)]
pub struct StepController {
    store: WorkflowStore,
}

impl StepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &WorkflowStore {
        &self.store
    }

    /// Stages a spreadsheet and resets everything downstream of it.
    ///
    /// Anything but `.xlsx`/`.xls` is rejected and leaves no file staged.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> WorkflowResult<()> {
        let path = path.into();
        self.store.error = None;

        if !is_spreadsheet(&path) {
            self.store.file = None;
            return self.fail(WorkflowError::InvalidFileType);
        }

        tracing::info!(file = %path.display(), "spreadsheet staged");
        self.store.file = Some(path);
        self.store.reset_downstream();
        self.check();
        Ok(())
    }

    /// Sends the staged spreadsheet to the service.
    ///
    /// Returns the service's summary message, if it sent one.
    pub fn upload<G>(&mut self, gateway: &G) -> WorkflowResult<Option<String>>
    where
        G: RemoteGateway + ?Sized,
    {
        self.ensure_idle()?;
        self.store.error = None;

        let file = match self.store.file.clone() {
            Some(file) => file,
            None => return self.fail(WorkflowError::NoFileSelected),
        };

        match self.call(|| gateway.upload(&file)) {
            Ok(UploadOutcome::Candidates {
                candidates,
                message,
            }) => {
                tracing::info!(count = candidates.len(), "upload returned candidates");
                self.store.subject = Default::default();
                self.store.clear_subject_data();
                self.store.candidates = candidates;
                self.store.step = WorkflowStep::SelectSubject;
                self.check();
                Ok(message)
            }
            Ok(UploadOutcome::Extracted(data)) => {
                tracing::info!(fields = data.mapped.len(), "upload returned a single subject");
                self.store.candidates.clear();
                self.store.subject = Default::default();
                self.store.apply_subject_data(data);
                self.store.step = WorkflowStep::Review;
                self.check();
                Ok(None)
            }
            Err(err) => {
                self.store.candidates.clear();
                self.fail(remote_failure(&err, UPLOAD_FAILED))
            }
        }
    }

    /// Local edit of one name field; no call is made.
    pub fn set_subject_field(&mut self, field: SubjectField, value: impl Into<String>) {
        let value = value.into();
        let slot = self.store.subject.field_mut(field);
        if *slot != value {
            *slot = value;
            self.store.pdf_ready = false;
        }
    }

    /// Copies a candidate's names into the subject identity; no call is made.
    pub fn select_candidate(&mut self, candidate: &Candidate) {
        let identity = candidate.identity();
        if self.store.subject != identity {
            tracing::debug!(subject = %candidate.full_name, "candidate selected");
            self.store.subject = identity;
            self.store.pdf_ready = false;
        }
    }

    /// Fetches record and mapping for the current subject identity.
    pub fn process_subject<G>(&mut self, gateway: &G) -> WorkflowResult<()>
    where
        G: RemoteGateway + ?Sized,
    {
        self.ensure_idle()?;
        self.store.error = None;

        let subject = self.store.subject.clone();
        if !subject.is_complete() {
            return self.fail(WorkflowError::IncompleteIdentity);
        }

        self.store.clear_subject_data();
        match self.call(|| gateway.process_client(&subject)) {
            Ok(data) => {
                tracing::info!(subject = %subject.full_name(), "client processed");
                self.store.apply_subject_data(data);
                self.store.step = WorkflowStep::Review;
                self.check();
                Ok(())
            }
            Err(err) => {
                self.store.clear_subject_data();
                if err.is_not_found() {
                    self.fail(WorkflowError::SubjectNotFound {
                        first_name: subject.first_name,
                        last_name: subject.last_name,
                    })
                } else {
                    self.fail(remote_failure(&err, PROCESS_FAILED))
                }
            }
        }
    }

    /// Picks a candidate and processes it in one step.
    pub fn select_and_process<G>(
        &mut self,
        candidate: &Candidate,
        gateway: &G,
    ) -> WorkflowResult<()>
    where
        G: RemoteGateway + ?Sized,
    {
        self.ensure_idle()?;
        self.select_candidate(candidate);
        self.process_subject(gateway)
    }

    /// Asks the service to fill the form for the subject it processed last.
    pub fn generate_pdf<G>(&mut self, gateway: &G) -> WorkflowResult<()>
    where
        G: RemoteGateway + ?Sized,
    {
        self.ensure_idle()?;
        self.store.error = None;

        if self.store.mapped.is_none() {
            return self.fail(WorkflowError::NoMappedData);
        }

        self.store.pdf_ready = false;
        match self.call(|| gateway.generate_pdf()) {
            Ok(()) => {
                tracing::info!(subject = %self.store.subject.full_name(), "pdf generated");
                self.store.pdf_ready = true;
                self.check();
                Ok(())
            }
            Err(err) => self.fail(remote_failure(&err, GENERATE_FAILED)),
        }
    }

    /// Downloads the generated form and hands it to `sink`.
    ///
    /// Readiness is not checked here; the caller gates the action.
    pub fn download_pdf<G, S>(&mut self, gateway: &G, sink: &S) -> WorkflowResult<PathBuf>
    where
        G: RemoteGateway + ?Sized,
        S: DocumentSink + ?Sized,
    {
        self.ensure_idle()?;
        self.store.error = None;

        let file_name = pdf_file_name(&self.store.subject);
        let bytes = match self.call(|| gateway.download_pdf()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "download request failed");
                return self.fail(WorkflowError::RemoteFailure(DOWNLOAD_FAILED.to_string()));
            }
        };

        match sink.save(&file_name, &bytes) {
            Ok(path) => {
                tracing::info!(path = %path.display(), size = bytes.len(), "pdf saved");
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, file = %file_name, "could not save pdf");
                self.fail(WorkflowError::RemoteFailure(DOWNLOAD_FAILED.to_string()))
            }
        }
    }

    /// Goes back from review to the candidate list, forgetting the subject.
    ///
    /// Returns false, changing nothing, when not in review.
    pub fn return_to_selection(&mut self) -> bool {
        if self.store.step != WorkflowStep::Review || self.store.busy {
            return false;
        }
        self.store.error = None;
        self.store.subject = Default::default();
        self.store.clear_subject_data();
        self.store.step = WorkflowStep::SelectSubject;
        self.check();
        true
    }

    /// Refuses an operation while `store.busy` is set.
    ///
    /// `busy` is only true inside [`Self::call`], so through `&mut self` this
    /// never fires in the terminal app. The operator-visible busy flag is
    /// `App::pending`, which keeps new intents from being queued while one
    /// is outstanding.
    fn ensure_idle(&self) -> WorkflowResult<()> {
        if self.store.busy {
            tracing::debug!("operation refused while a call is in flight");
            return Err(WorkflowError::Busy);
        }
        Ok(())
    }

    fn call<T>(
        &mut self,
        request: impl FnOnce() -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        self.store.busy = true;
        let result = request();
        self.store.busy = false;
        result
    }

    fn fail<T>(&mut self, err: WorkflowError) -> WorkflowResult<T> {
        tracing::warn!(error = %err, step = ?self.store.step, "workflow operation failed");
        if err != WorkflowError::Busy {
            self.store.error = Some(err.to_string());
        }
        self.check();
        Err(err)
    }

    fn check(&self) {
        debug_assert!(
            self.store.invariants_hold(),
            "workflow invariants violated: {:?}",
            self.store
        );
    }
}

fn remote_failure(err: &GatewayError, generic: &str) -> WorkflowError {
    tracing::warn!(error = %err, "remote call failed");
    WorkflowError::RemoteFailure(err.remote_message().unwrap_or(generic).to_string())
}
