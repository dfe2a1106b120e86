use thiserror::Error;

/// Failures surfaced to the operator. `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Please select an Excel file (.xlsx or .xls)")]
    InvalidFileType,

    #[error("Please select a file first")]
    NoFileSelected,

    #[error("Please enter both first and last name")]
    IncompleteIdentity,

    #[error("Client \"{first_name} {last_name}\" not found. Please check the spelling.")]
    SubjectNotFound {
        first_name: String,
        last_name: String,
    },

    #[error("No mapped data available. Please process a client first.")]
    NoMappedData,

    #[error("{0}")]
    RemoteFailure(String),

    /// A call is already in flight; never stored as the current error.
    #[error("Another operation is still in progress")]
    Busy,
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Failures of the call boundary to the form service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Message supplied by the service itself, if any.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            GatewayError::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}
