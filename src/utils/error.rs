use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("SMTP transport error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Message build error: {0}")]
    MessageBuildError(#[from] lettre::error::Error),

    #[error("Unsupported recipient file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Parse error in {path}: {reason}")]
    ParseError { path: String, reason: String },

    #[error("Provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MailError>;
