use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::SmsBackend;

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("sms request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sms provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Outgoing SMS transport.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError>;
}

pub fn from_config(backend: &SmsBackend) -> Arc<dyn SmsSender> {
    match backend {
        SmsBackend::Console => Arc::new(ConsoleSms),
        SmsBackend::Twilio {
            account_sid,
            auth_token,
            from,
        } => Arc::new(TwilioSms::new(account_sid, auth_token, from)),
    }
}

/// Development backend: the message, security code included, goes to the log.
pub struct ConsoleSms;

#[async_trait]
impl SmsSender for ConsoleSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        info!(to = %to, body = %body, "sms (console backend)");
        Ok(())
    }
}

/// Twilio Programmable Messaging.
pub struct TwilioSms {
    client: Client,
    account_sid: String,
    auth_token: String,
    from: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    message: Option<String>,
}

impl TwilioSms {
    pub fn new(account_sid: &str, auth_token: &str, from: &str) -> Self {
        Self {
            client: Client::new(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from: from.to_string(),
            base_url: "https://api.twilio.com".into(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let form = [("To", to), ("From", self.from.as_str()), ("Body", body)];
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(to = %to, "sms accepted by twilio");
            return Ok(());
        }

        let message = response
            .json::<TwilioError>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.to_string());
        error!(to = %to, status = status.as_u16(), message = %message, "twilio rejected sms");
        Err(SmsError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
