use crate::domain::model::{ContentMode, DeliveryConfig, Message};
use crate::domain::ports::Transport;
use crate::utils::error::{MailError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, Proxy};
use url::Url;

/// JSON provider API backend: posts one message per recipient to the
/// configured endpoint with bearer authentication. The optional proxy
/// descriptor is applied to connection establishment only.
#[derive(Debug)]
pub struct HttpApiMailer {
    client: Client,
    endpoint: Url,
    api_key: String,
    from: String,
}

impl HttpApiMailer {
    pub fn new(endpoint: Url, config: &DeliveryConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            api_key: config.password.clone(),
            from: format!("{} <{}>", config.sender_name(), config.username),
        })
    }

    async fn payload(&self, message: &Message, to: &str) -> Result<serde_json::Value> {
        let body_key = match message.mode {
            ContentMode::Html => "html",
            ContentMode::Text => "text",
        };

        let mut payload = serde_json::json!({
            "from": self.from,
            "to": to,
            "subject": message.subject,
        });
        payload[body_key] = serde_json::Value::String(message.active_body().to_string());

        if let Some(path) = &message.attachment {
            let bytes = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("attachment");
            payload["attachments"] = serde_json::json!([{
                "filename": filename,
                "content": BASE64.encode(bytes),
            }]);
        }

        Ok(payload)
    }
}

#[async_trait]
impl Transport for HttpApiMailer {
    async fn send(&self, message: &Message, to: &str) -> Result<()> {
        let payload = self.payload(message, to).await?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
