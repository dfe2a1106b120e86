//! Call boundary to the remote form service.
//!
//! [`RemoteGateway`] is the contract the workflow depends on. [`HttpGateway`]
//! implements it over blocking HTTP; the `decode_*` functions turn a status
//! code and body into typed results and carry no I/O of their own.

use crate::domain::{
    Candidate, GatewayError, HealthStatus, Record, SubjectData, SubjectIdentity, UploadOutcome,
};
use reqwest::blocking::{multipart, Client, Response};
use serde::Deserialize;
use std::path::Path;

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Operations offered by the form service.
///
/// Generation and download act on whichever subject the service processed
/// last; neither call names the subject.
pub trait RemoteGateway {
    /// `POST /upload` with the spreadsheet as multipart field `file`.
    fn upload(&self, file: &Path) -> Result<UploadOutcome, GatewayError>;

    /// `POST /process-client` with the subject's names.
    fn process_client(&self, subject: &SubjectIdentity) -> Result<SubjectData, GatewayError>;

    /// `POST /generate-pdf`, no body.
    fn generate_pdf(&self) -> Result<(), GatewayError>;

    /// `GET /download-pdf`, returns the document bytes.
    fn download_pdf(&self) -> Result<Vec<u8>, GatewayError>;

    /// `GET /health`.
    fn health(&self) -> Result<HealthStatus, GatewayError>;
}

/// [`RemoteGateway`] over `reqwest::blocking`.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn read_text(response: Response) -> Result<(u16, String), GatewayError> {
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        Ok((status, body))
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

impl RemoteGateway for HttpGateway {
    fn upload(&self, file: &Path) -> Result<UploadOutcome, GatewayError> {
        let url = self.url("/upload");
        tracing::debug!(%url, file = %file.display(), "uploading spreadsheet");
        let form = multipart::Form::new().file("file", file)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(transport)?;
        let (status, body) = Self::read_text(response)?;
        decode_upload(status, &body)
    }

    fn process_client(&self, subject: &SubjectIdentity) -> Result<SubjectData, GatewayError> {
        let url = self.url("/process-client");
        tracing::debug!(%url, subject = %subject.full_name(), "processing client");
        let response = self
            .client
            .post(&url)
            .json(subject)
            .send()
            .map_err(transport)?;
        let (status, body) = Self::read_text(response)?;
        decode_processed(status, &body)
    }

    fn generate_pdf(&self) -> Result<(), GatewayError> {
        let url = self.url("/generate-pdf");
        tracing::debug!(%url, "requesting pdf generation");
        let response = self.client.post(&url).send().map_err(transport)?;
        let (status, body) = Self::read_text(response)?;
        decode_generate(status, &body)
    }

    fn download_pdf(&self) -> Result<Vec<u8>, GatewayError> {
        let url = self.url("/download-pdf");
        tracing::debug!(%url, "downloading pdf");
        let response = self.client.get(&url).send().map_err(transport)?;
        let status = response.status().as_u16();
        if !is_success(status) {
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Status {
                status,
                message: error_message(&body),
            });
        }
        let bytes = response.bytes().map_err(transport)?;
        decode_document(bytes.to_vec())
    }

    fn health(&self) -> Result<HealthStatus, GatewayError> {
        let url = self.url("/health");
        let response = self.client.get(&url).send().map_err(transport)?;
        let (status, body) = Self::read_text(response)?;
        ensure_success(status, &body)?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    success: bool,
    client_list: Option<Vec<Candidate>>,
    excel_data: Option<Record>,
    mapped_data: Option<Record>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProcessBody {
    #[serde(default)]
    success: bool,
    excel_data: Option<Record>,
    mapped_data: Option<Record>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    success: bool,
    error: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// The `error` field of a JSON error body, if the body has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
}

fn ensure_success(status: u16, body: &str) -> Result<(), GatewayError> {
    if is_success(status) {
        Ok(())
    } else {
        Err(GatewayError::Status {
            status,
            message: error_message(body),
        })
    }
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

pub fn decode_upload(status: u16, body: &str) -> Result<UploadOutcome, GatewayError> {
    ensure_success(status, body)?;
    let parsed: UploadBody = parse(body)?;
    if !parsed.success {
        return Err(GatewayError::Status {
            status,
            message: parsed.error,
        });
    }

    if let Some(list) = parsed.client_list {
        let candidates = list.into_iter().map(Candidate::normalized).collect();
        return Ok(UploadOutcome::Candidates {
            candidates,
            message: parsed.message,
        });
    }

    match (parsed.excel_data, parsed.mapped_data) {
        (Some(record), Some(mapped)) => {
            Ok(UploadOutcome::Extracted(SubjectData { record, mapped }))
        }
        _ => Err(GatewayError::Decode(
            "upload response carried neither client_list nor excel_data/mapped_data".to_string(),
        )),
    }
}

pub fn decode_processed(status: u16, body: &str) -> Result<SubjectData, GatewayError> {
    ensure_success(status, body)?;
    let parsed: ProcessBody = parse(body)?;
    if !parsed.success {
        return Err(GatewayError::Status {
            status,
            message: parsed.error,
        });
    }
    match (parsed.excel_data, parsed.mapped_data) {
        (Some(record), Some(mapped)) => Ok(SubjectData { record, mapped }),
        _ => Err(GatewayError::Decode(
            "process-client response is missing excel_data or mapped_data".to_string(),
        )),
    }
}

pub fn decode_generate(status: u16, body: &str) -> Result<(), GatewayError> {
    ensure_success(status, body)?;
    let parsed: GenerateBody = parse(body)?;
    if parsed.success {
        Ok(())
    } else {
        Err(GatewayError::Status {
            status,
            message: parsed.error,
        })
    }
}

pub fn decode_document(bytes: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
    if bytes.is_empty() {
        return Err(GatewayError::Decode("empty document".to_string()));
    }
    Ok(bytes)
}

/// Scripted in-memory gateway for controller tests.
#[cfg(test)]
pub mod fake {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// What a scripted endpoint answers on every call.
    #[derive(Debug, Clone)]
    pub enum Reply<T> {
        Ok(T),
        Status(u16, Option<String>),
        Transport,
        Decode,
    }

    impl<T: Clone> Reply<T> {
        fn produce(&self) -> Result<T, GatewayError> {
            match self {
                Reply::Ok(value) => Ok(value.clone()),
                Reply::Status(status, message) => Err(GatewayError::Status {
                    status: *status,
                    message: message.clone(),
                }),
                Reply::Transport => Err(GatewayError::Transport("connection refused".to_string())),
                Reply::Decode => Err(GatewayError::Decode("garbled".to_string())),
            }
        }
    }

    pub struct FakeGateway {
        pub upload: Reply<UploadOutcome>,
        pub process: Reply<SubjectData>,
        pub generate: Reply<()>,
        pub download: Reply<Vec<u8>>,
        pub health: Reply<HealthStatus>,
        pub calls: RefCell<Vec<&'static str>>,
        pub subjects: RefCell<Vec<SubjectIdentity>>,
    }

    pub fn sample_data() -> SubjectData {
        let record = json!({
            "first_name": "Ana",
            "last_name": "Gomez",
            "date_of_birth": "1985-03-15",
            "itin": null
        });
        let mapped = json!({
            "first_name": "Ana",
            "last_name": "Gomez",
            "date_of_birth": "03151985",
            "gender_female": true
        });
        SubjectData {
            record: record.as_object().cloned().unwrap_or_default(),
            mapped: mapped.as_object().cloned().unwrap_or_default(),
        }
    }

    impl Default for FakeGateway {
        fn default() -> Self {
            Self {
                upload: Reply::Ok(UploadOutcome::Candidates {
                    candidates: vec![
                        Candidate::new("Ana", "Gomez"),
                        Candidate::new("Luis", "Gomez"),
                    ],
                    message: Some("File processed successfully. Found 2 clients.".to_string()),
                }),
                process: Reply::Ok(sample_data()),
                generate: Reply::Ok(()),
                download: Reply::Ok(b"%PDF-1.7 fake".to_vec()),
                health: Reply::Ok(HealthStatus {
                    status: "healthy".to_string(),
                    message: "W-7 Form Processor API is running".to_string(),
                }),
                calls: RefCell::new(Vec::new()),
                subjects: RefCell::new(Vec::new()),
            }
        }
    }

    impl FakeGateway {
        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl RemoteGateway for FakeGateway {
        fn upload(&self, _file: &Path) -> Result<UploadOutcome, GatewayError> {
            self.calls.borrow_mut().push("upload");
            self.upload.produce()
        }

        fn process_client(&self, subject: &SubjectIdentity) -> Result<SubjectData, GatewayError> {
            self.calls.borrow_mut().push("process_client");
            self.subjects.borrow_mut().push(subject.clone());
            self.process.produce()
        }

        fn generate_pdf(&self) -> Result<(), GatewayError> {
            self.calls.borrow_mut().push("generate_pdf");
            self.generate.produce()
        }

        fn download_pdf(&self) -> Result<Vec<u8>, GatewayError> {
            self.calls.borrow_mut().push("download_pdf");
            self.download.produce()
        }

        fn health(&self) -> Result<HealthStatus, GatewayError> {
            self.calls.borrow_mut().push("health");
            self.health.produce()
        }
    }
}
