use crate::domain::model::RecipientList;
use crate::utils::error::{MailError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the recipient list comes from: a single literal address or a file
/// whose format is selected by extension.
#[derive(Debug, Clone)]
pub enum RecipientSpec {
    Literal(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    PlainText,
    Csv,
    Json,
}

impl SourceFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("txt") => Ok(SourceFormat::PlainText),
            Some("csv") => Ok(SourceFormat::Csv),
            Some("json") => Ok(SourceFormat::Json),
            _ => Err(MailError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Loads the recipient list. Ordering matches the source; entries are
/// trimmed; blank lines, empty `email` fields, and objects missing the
/// field are skipped. Duplicates are not collapsed.
pub fn load(spec: &RecipientSpec) -> Result<RecipientList> {
    match spec {
        RecipientSpec::Literal(address) => {
            let mut recipients = RecipientList::new();
            recipients.push_trimmed(address);
            Ok(recipients)
        }
        RecipientSpec::File(path) => {
            // Format is resolved before touching the file so an unsupported
            // extension never causes a partial read.
            let format = SourceFormat::from_path(path)?;
            let bytes = fs::read(path)?;

            tracing::debug!(
                path = %path.display(),
                format = ?format,
                bytes = bytes.len(),
                "loading recipient file"
            );

            match format {
                SourceFormat::PlainText => parse_plain_text(&bytes),
                SourceFormat::Csv => parse_csv(path, &bytes),
                SourceFormat::Json => parse_json(path, &bytes),
            }
        }
    }
}

fn parse_plain_text(bytes: &[u8]) -> Result<RecipientList> {
    let text = String::from_utf8_lossy(bytes);
    let mut recipients = RecipientList::new();
    for line in text.lines() {
        recipients.push_trimmed(line);
    }
    Ok(recipients)
}

fn parse_csv(path: &Path, bytes: &[u8]) -> Result<RecipientList> {
    let mut reader = csv::Reader::from_reader(bytes);

    let email_index = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == "email")
        .ok_or_else(|| MailError::MissingColumn {
            path: path.display().to_string(),
            column: "email".to_string(),
        })?;

    let mut recipients = RecipientList::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(email_index) {
            recipients.push_trimmed(value);
        }
    }
    Ok(recipients)
}

fn parse_json(path: &Path, bytes: &[u8]) -> Result<RecipientList> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;

    let items = document.as_array().ok_or_else(|| MailError::ParseError {
        path: path.display().to_string(),
        reason: "expected a top-level JSON array of objects".to_string(),
    })?;

    let mut recipients = RecipientList::new();
    for item in items {
        // Objects without an "email" string field are skipped, not errors.
        if let Some(email) = item.get("email").and_then(|v| v.as_str()) {
            recipients.push_trimmed(email);
        }
    }
    Ok(recipients)
}
