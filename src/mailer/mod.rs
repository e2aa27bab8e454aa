//! 事务邮件发送
//!
//! 主通道 Mailjet，备用通道 Resend。未配置的通道在启动时跳过。

mod mailjet;
mod resend;
pub mod templates;

pub use mailjet::MailjetProvider;
pub use resend::ResendProvider;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::errors::{Result, SISystemError};

/// 一封待发送的邮件
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// 按顺序尝试各通道，任一成功即返回
#[derive(Clone, Default)]
pub struct Mailer {
    providers: Vec<Arc<dyn EmailProvider>>,
}

impl Mailer {
    pub fn new(
        primary: Option<Arc<dyn EmailProvider>>,
        fallback: Option<Arc<dyn EmailProvider>>,
    ) -> Self {
        Self {
            providers: primary.into_iter().chain(fallback).collect(),
        }
    }

    /// 根据配置构建，缺少密钥的通道不启用
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SISystemError::email_delivery(format!("创建 HTTP 客户端失败: {e}")))?;

        let primary: Option<Arc<dyn EmailProvider>> =
            if config.mailjet.api_key.is_empty() || config.mailjet.api_secret.is_empty() {
                warn!("Mailjet 未配置（缺少 API Key/Secret），跳过主通道");
                None
            } else {
                Some(Arc::new(MailjetProvider::new(
                    client.clone(),
                    &config.mailjet,
                    &config.sender_email,
                    &config.sender_name,
                )))
            };

        let fallback: Option<Arc<dyn EmailProvider>> = if config.resend.api_key.is_empty() {
            warn!("Resend 未配置（缺少 API Key），跳过备用通道");
            None
        } else {
            Some(Arc::new(ResendProvider::new(
                client,
                &config.resend,
                &config.sender_email,
                &config.sender_name,
            )))
        };

        Ok(Self::new(primary, fallback))
    }

    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// 所有通道均失败或没有可用通道时返回错误
    pub async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.providers.is_empty() {
            return Err(SISystemError::email_delivery("没有可用的邮件通道"));
        }

        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.send(message).await {
                Ok(()) => {
                    info!(
                        "邮件已通过 {} 发送: to={}, subject={}",
                        provider.name(),
                        message.to,
                        message.subject
                    );
                    return Ok(());
                }
                Err(e) => {
                    warn!("{} 发送失败，尝试下一个通道: {}", provider.name(), e);
                    failures.push(format!("{}: {}", provider.name(), e.message()));
                }
            }
        }

        Err(SISystemError::email_delivery(failures.join("; ")))
    }

    /// 发送失败只记录日志
    pub async fn send_best_effort(&self, message: &EmailMessage) {
        if let Err(e) = self.send(message).await {
            warn!("邮件发送失败（已忽略）: to={}, {}", message.to, e);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// 记录发送内容的测试通道
    #[derive(Default)]
    pub struct RecordingProvider {
        pub fail: bool,
        pub sent: Mutex<Vec<EmailMessage>>,
    }

    impl RecordingProvider {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            if self.fail { "failing" } else { "recording" }
        }

        async fn send(&self, message: &EmailMessage) -> Result<()> {
            if self.fail {
                return Err(SISystemError::email_delivery("simulated outage"));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingProvider;
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "kepala@sekolah.id".into(),
            subject: "Tes".into(),
            html: "<p>Tes</p>".into(),
            text: "Tes".into(),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = Arc::new(RecordingProvider::default());
        let fallback = Arc::new(RecordingProvider::default());
        let mailer = Mailer::new(Some(primary.clone()), Some(fallback.clone()));

        mailer.send(&message()).await.unwrap();
        assert_eq!(primary.sent().len(), 1);
        assert!(fallback.sent().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_fails() {
        let fallback = Arc::new(RecordingProvider::default());
        let mailer = Mailer::new(
            Some(Arc::new(RecordingProvider::failing())),
            Some(fallback.clone()),
        );

        mailer.send(&message()).await.unwrap();
        assert_eq!(fallback.sent(), vec![message()]);
    }

    #[tokio::test]
    async fn test_error_when_every_provider_fails() {
        let mailer = Mailer::new(
            Some(Arc::new(RecordingProvider::failing())),
            Some(Arc::new(RecordingProvider::failing())),
        );
        let err = mailer.send(&message()).await.unwrap_err();
        assert!(matches!(err, SISystemError::EmailDelivery(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_reports_error() {
        let mailer = Mailer::default();
        assert!(!mailer.is_configured());
        assert!(mailer.send(&message()).await.is_err());
        // best effort 不会 panic
        mailer.send_best_effort(&message()).await;
    }
}
