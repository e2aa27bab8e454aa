use async_trait::async_trait;
use serde_json::{Value, json};

use super::{EmailMessage, EmailProvider};
use crate::config::ResendConfig;
use crate::errors::{Result, SISystemError};

/// Resend /emails API
pub struct ResendProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl ResendProvider {
    pub fn new(
        client: reqwest::Client,
        config: &ResendConfig,
        sender_email: &str,
        sender_name: &str,
    ) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from: format!("{sender_name} <{sender_email}>"),
        }
    }

    fn payload(&self, message: &EmailMessage) -> Value {
        json!({
            "from": self.from,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
            "text": message.text,
        })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SISystemError::email_delivery(format!(
            "Resend 返回 {status}: {body}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_combines_name_and_address() {
        let provider = ResendProvider::new(
            reqwest::Client::new(),
            &ResendConfig::default(),
            "noreply@sekolah.id",
            "Sistem Informasi Sekolah",
        );
        let payload = provider.payload(&EmailMessage {
            to: "guru@sekolah.id".into(),
            subject: "Halo".into(),
            html: String::new(),
            text: "Halo".into(),
        });
        assert_eq!(payload["from"], "Sistem Informasi Sekolah <noreply@sekolah.id>");
        assert_eq!(payload["to"][0], "guru@sekolah.id");
    }
}
