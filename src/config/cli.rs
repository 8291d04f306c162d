use crate::core::compose::Composer;
use crate::core::source::RecipientSpec;
use crate::domain::model::{ContentMode, DeliveryConfig, Link};
use crate::utils::error::{MailError, Result};
use crate::utils::validation::{
    validate_exactly_one_of, validate_non_empty_string, validate_url, validate_url_with_schemes,
    Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "mailsweep")]
#[command(about = "Bulk email dispatch tool")]
pub struct CliConfig {
    /// Backend: gmail, outlook, yahoo, smtp:host[:port], or an http(s) provider endpoint
    #[arg(long)]
    pub service: String,

    /// Single recipient address (mutually exclusive with --targets)
    #[arg(long)]
    pub email: Option<String>,

    /// Recipient file: .txt (one address per line), .csv (email column) or .json (array of objects)
    #[arg(long)]
    pub targets: Option<PathBuf>,

    #[arg(long)]
    pub subject: String,

    /// Literal message body (mutually exclusive with --message-file)
    #[arg(long)]
    pub message: Option<String>,

    /// File containing the message body
    #[arg(long)]
    pub message_file: Option<PathBuf>,

    /// Sender display name shown in the from header (account address is unchanged)
    #[arg(long)]
    pub spoof_name: Option<String>,

    /// Proxy connection string (http/https/socks5 URL)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Body content mode
    #[arg(long = "type", value_enum)]
    pub content_type: ContentMode,

    /// URL appended to the message body
    #[arg(long)]
    pub link: Option<String>,

    /// Display text for --link (defaults to the URL)
    #[arg(long)]
    pub link_text: Option<String>,

    /// File attached to every message
    #[arg(long)]
    pub attachment: Option<PathBuf>,

    /// Minimum delay between consecutive send starts, in milliseconds
    #[arg(long, default_value = "500")]
    pub throttle_ms: u64,

    /// Write the delivery report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Account address authenticated against the backend
    #[arg(long, env = "MAILSWEEP_USERNAME")]
    pub username: String,

    /// SMTP password or provider API key
    #[arg(long, env = "MAILSWEEP_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit JSON logs instead of the compact format
    #[arg(long)]
    pub log_json: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_exactly_one_of("--email", &self.email, "--targets", &self.targets)?;
        validate_exactly_one_of("--message", &self.message, "--message-file", &self.message_file)?;
        validate_non_empty_string("--subject", &self.subject)?;
        validate_non_empty_string("--service", &self.service)?;

        if let Some(link) = &self.link {
            validate_url("--link", link)?;
        }
        if self.link_text.is_some() && self.link.is_none() {
            return Err(MailError::ConfigError {
                message: "--link-text requires --link".to_string(),
            });
        }
        if let Some(proxy) = &self.proxy {
            validate_url_with_schemes("--proxy", proxy, &["http", "https", "socks5"])?;
        }

        Ok(())
    }
}

impl CliConfig {
    pub fn recipient_spec(&self) -> Result<RecipientSpec> {
        match (&self.email, &self.targets) {
            (Some(email), None) => Ok(RecipientSpec::Literal(email.clone())),
            (None, Some(path)) => Ok(RecipientSpec::File(path.clone())),
            _ => Err(MailError::ConfigError {
                message: "exactly one of --email or --targets is required".to_string(),
            }),
        }
    }

    /// The base message body: the literal value or the message file contents.
    pub fn base_message(&self) -> Result<String> {
        match (&self.message, &self.message_file) {
            (Some(message), None) => Ok(message.clone()),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
            _ => Err(MailError::ConfigError {
                message: "exactly one of --message or --message-file is required".to_string(),
            }),
        }
    }

    pub fn link(&self) -> Option<Link> {
        self.link.as_ref().map(|url| Link {
            url: url.clone(),
            text: self.link_text.clone(),
        })
    }

    pub fn delivery(&self) -> DeliveryConfig {
        DeliveryConfig {
            service: self.service.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            from_name: self.spoof_name.clone(),
            proxy: self.proxy.clone(),
        }
    }

    pub fn composer(&self) -> Composer {
        let from_name = self
            .spoof_name
            .clone()
            .unwrap_or_else(|| "Sender".to_string());
        Composer::new(from_name, self.subject.clone(), self.content_type)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}
