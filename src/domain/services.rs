//! Pure rules of the workflow that do not depend on any state.
//!
//! File acceptance and download naming live here so both the controller
//! and the presentation layer apply the same checks.

use super::models::SubjectIdentity;
use std::path::Path;

/// Extensions the form service can parse, compared case-insensitively.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Attachment name the service uses when no subject is known.
pub const GENERIC_PDF_NAME: &str = "form_w7_filled.pdf";

/// Returns true when the file name ends in `.xlsx` or `.xls`.
///
/// # Examples
///
/// ```
/// use formpilot::domain::is_spreadsheet;
/// use std::path::Path;
///
/// assert!(is_spreadsheet(Path::new("clients.XLSX")));
/// assert!(!is_spreadsheet(Path::new("clients.csv")));
/// ```
pub fn is_spreadsheet(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// File name for a downloaded form.
///
/// Uses the subject's names when both are present, otherwise the service's
/// generic attachment name.
pub fn pdf_file_name(identity: &SubjectIdentity) -> String {
    if !identity.is_complete() {
        return GENERIC_PDF_NAME.to_string();
    }
    format!(
        "W7_{}_{}.pdf",
        sanitize_component(&identity.first_name),
        sanitize_component(&identity.last_name)
    )
}

fn sanitize_component(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            let reserved = matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
            if c.is_whitespace() || reserved {
                '_'
            } else {
                c
            }
        })
        .collect()
}
