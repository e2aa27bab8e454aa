use async_trait::async_trait;
use serde_json::{Value, json};

use super::{EmailMessage, EmailProvider};
use crate::config::MailjetConfig;
use crate::errors::{Result, SISystemError};

/// Mailjet v3.1 send API
pub struct MailjetProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_secret: String,
    sender_email: String,
    sender_name: String,
}

impl MailjetProvider {
    pub fn new(
        client: reqwest::Client,
        config: &MailjetConfig,
        sender_email: &str,
        sender_name: &str,
    ) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            sender_email: sender_email.to_string(),
            sender_name: sender_name.to_string(),
        }
    }

    fn payload(&self, message: &EmailMessage) -> Value {
        json!({
            "Messages": [{
                "From": { "Email": self.sender_email, "Name": self.sender_name },
                "To": [{ "Email": message.to }],
                "Subject": message.subject,
                "TextPart": message.text,
                "HTMLPart": message.html,
            }]
        })
    }
}

#[async_trait]
impl EmailProvider for MailjetProvider {
    fn name(&self) -> &'static str {
        "mailjet"
    }

    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&self.payload(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SISystemError::email_delivery(format!(
            "Mailjet 返回 {status}: {body}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let provider = MailjetProvider::new(
            reqwest::Client::new(),
            &MailjetConfig::default(),
            "noreply@sekolah.id",
            "Sistem Informasi Sekolah",
        );
        let payload = provider.payload(&EmailMessage {
            to: "guru@sekolah.id".into(),
            subject: "Halo".into(),
            html: "<b>Halo</b>".into(),
            text: "Halo".into(),
        });

        let msg = &payload["Messages"][0];
        assert_eq!(msg["From"]["Email"], "noreply@sekolah.id");
        assert_eq!(msg["To"][0]["Email"], "guru@sekolah.id");
        assert_eq!(msg["HTMLPart"], "<b>Halo</b>");
    }
}
