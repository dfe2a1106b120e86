use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name to scalar value, in the order the service returned them.
pub type Record = Map<String, Value>;

/// Name pair used to ask the service for one subject's row.
///
/// Equality is exact and case-sensitive: "ana" and "Ana" are different subjects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentity {
    pub first_name: String,
    pub last_name: String,
}

impl SubjectIdentity {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Both names present once surrounding whitespace is ignored.
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn field(&self, field: SubjectField) -> &str {
        match field {
            SubjectField::FirstName => &self.first_name,
            SubjectField::LastName => &self.last_name,
        }
    }

    pub fn field_mut(&mut self, field: SubjectField) -> &mut String {
        match field {
            SubjectField::FirstName => &mut self.first_name,
            SubjectField::LastName => &mut self.last_name,
        }
    }
}

/// Which half of a [`SubjectIdentity`] an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectField {
    FirstName,
    LastName,
}

impl SubjectField {
    pub fn label(self) -> &'static str {
        match self {
            SubjectField::FirstName => "First name",
            SubjectField::LastName => "Last name",
        }
    }

    pub fn other(self) -> Self {
        match self {
            SubjectField::FirstName => SubjectField::LastName,
            SubjectField::LastName => SubjectField::FirstName,
        }
    }
}

/// One person found in an uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
}

impl Candidate {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let full_name = format!("{} {}", first_name, last_name);
        Self {
            first_name,
            last_name,
            full_name,
        }
    }

    /// Fills in `full_name` when the service left it out.
    pub fn normalized(mut self) -> Self {
        if self.full_name.is_empty() {
            self.full_name = format!("{} {}", self.first_name, self.last_name);
        }
        self
    }

    pub fn identity(&self) -> SubjectIdentity {
        SubjectIdentity::new(self.first_name.clone(), self.last_name.clone())
    }

    /// Exact, case-sensitive name match used for selection highlighting.
    pub fn matches(&self, identity: &SubjectIdentity) -> bool {
        self.first_name == identity.first_name && self.last_name == identity.last_name
    }
}

/// Extracted and mapped data for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectData {
    pub record: Record,
    pub mapped: Record,
}

/// What a successful upload produced.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Multi-subject sheet: the operator must pick one.
    Candidates {
        candidates: Vec<Candidate>,
        message: Option<String>,
    },
    /// Single-subject sheet: data comes back immediately.
    Extracted(SubjectData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStep {
    #[default]
    Upload,
    SelectSubject,
    Review,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 3] = [
        WorkflowStep::Upload,
        WorkflowStep::SelectSubject,
        WorkflowStep::Review,
    ];

    pub fn index(self) -> usize {
        match self {
            WorkflowStep::Upload => 0,
            WorkflowStep::SelectSubject => 1,
            WorkflowStep::Review => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkflowStep::Upload => "Upload File",
            WorkflowStep::SelectSubject => "Select Client",
            WorkflowStep::Review => "Review & Generate",
        }
    }
}

/// Reply of the service's health probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_completeness_ignores_whitespace() {
        assert!(SubjectIdentity::new("Ana", "Gomez").is_complete());
        assert!(!SubjectIdentity::new("Ana", "").is_complete());
        assert!(!SubjectIdentity::new("  ", "Gomez").is_complete());
        assert!(!SubjectIdentity::default().is_complete());
    }

    #[test]
    fn test_candidate_match_is_case_sensitive() {
        let candidate = Candidate::new("Ana", "Gomez");
        assert!(candidate.matches(&SubjectIdentity::new("Ana", "Gomez")));
        assert!(!candidate.matches(&SubjectIdentity::new("ana", "Gomez")));
        assert!(!candidate.matches(&SubjectIdentity::new("Ana ", "Gomez")));
    }

    #[test]
    fn test_candidate_deserialize_ignores_row_index_and_derives_full_name() {
        let json = r#"{"first_name": "Luis", "last_name": "Gomez", "row_index": 4}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        let candidate = candidate.normalized();
        assert_eq!(candidate.full_name, "Luis Gomez");
    }

    #[test]
    fn test_subject_field_access() {
        let mut identity = SubjectIdentity::default();
        identity.field_mut(SubjectField::LastName).push_str("Gomez");
        assert_eq!(identity.field(SubjectField::LastName), "Gomez");
        assert_eq!(SubjectField::FirstName.other(), SubjectField::LastName);
    }

    #[test]
    fn test_step_order() {
        let indices: Vec<usize> = WorkflowStep::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(WorkflowStep::default(), WorkflowStep::Upload);
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "message": "running"}"#).unwrap();
        assert!(health.is_healthy());
    }
}
