pub mod http;
pub mod smtp;

use crate::domain::model::{DeliveryConfig, Message};
use crate::domain::ports::Transport;
use crate::utils::error::{MailError, Result};
use async_trait::async_trait;
use self::http::HttpApiMailer;
use self::smtp::SmtpMailer;
use url::Url;

/// Backend resolved from the symbolic service identifier, chosen once per
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Service {
    /// SMTP relay, either a well-known provider or `smtp:host[:port]`.
    Relay { host: String, port: Option<u16> },
    /// JSON provider API at an `http(s)://` endpoint.
    HttpApi(Url),
}

impl Service {
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();

        let known_relay = match id.to_ascii_lowercase().as_str() {
            "gmail" => Some("smtp.gmail.com"),
            "outlook" | "hotmail" => Some("smtp-mail.outlook.com"),
            "yahoo" => Some("smtp.mail.yahoo.com"),
            _ => None,
        };
        if let Some(host) = known_relay {
            return Ok(Service::Relay {
                host: host.to_string(),
                port: None,
            });
        }

        if id.starts_with("http://") || id.starts_with("https://") {
            let endpoint = Url::parse(id).map_err(|e| MailError::ConfigError {
                message: format!("invalid service endpoint '{}': {}", id, e),
            })?;
            return Ok(Service::HttpApi(endpoint));
        }

        if let Some(relay) = id.strip_prefix("smtp:") {
            let (host, port) = match relay.rsplit_once(':') {
                Some((host, port)) => {
                    let port = port.parse::<u16>().map_err(|_| MailError::ConfigError {
                        message: format!("invalid SMTP port in service '{}'", id),
                    })?;
                    (host, Some(port))
                }
                None => (relay, None),
            };
            if host.is_empty() {
                return Err(MailError::ConfigError {
                    message: format!("missing SMTP host in service '{}'", id),
                });
            }
            return Ok(Service::Relay {
                host: host.to_string(),
                port,
            });
        }

        Err(MailError::ConfigError {
            message: format!(
                "unknown service '{}' (expected gmail, outlook, yahoo, smtp:host[:port], or an http(s) endpoint)",
                id
            ),
        })
    }
}

/// The concrete backend behind the [`Transport`] port. One instance is built
/// per invocation and reused for every recipient.
#[derive(Debug)]
pub enum ServiceTransport {
    Smtp(SmtpMailer),
    HttpApi(HttpApiMailer),
}

/// Builds the transport selected by `config.service`. The proxy descriptor
/// only affects connection establishment; lettre cannot tunnel SMTP through
/// a proxy, so a proxy combined with an SMTP service is a configuration
/// error surfaced before any send.
pub fn from_config(config: &DeliveryConfig) -> Result<ServiceTransport> {
    match Service::parse(&config.service)? {
        Service::Relay { host, port } => {
            if config.proxy.is_some() {
                return Err(MailError::ConfigError {
                    message: "proxy is not supported for SMTP services; use an http(s) provider endpoint".to_string(),
                });
            }
            Ok(ServiceTransport::Smtp(SmtpMailer::new(&host, port, config)?))
        }
        Service::HttpApi(endpoint) => Ok(ServiceTransport::HttpApi(HttpApiMailer::new(
            endpoint, config,
        )?)),
    }
}

#[async_trait]
impl Transport for ServiceTransport {
    async fn send(&self, message: &Message, to: &str) -> Result<()> {
        match self {
            ServiceTransport::Smtp(mailer) => mailer.send(message, to).await,
            ServiceTransport::HttpApi(mailer) => mailer.send(message, to).await,
        }
    }
}
