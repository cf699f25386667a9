use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsBackend {
    /// Writes outgoing messages to the log instead of delivering them.
    Console,
    Twilio {
        account_sid: String,
        auth_token: String,
        from: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    pub app_name: String,
    pub code_length: usize,
    pub code_ttl_seconds: i64,
    pub verify_only_once: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub sms: SmsBackend,
    pub verification: VerificationConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "agora".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "agora-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };

        let sms = match std::env::var("SMS_BACKEND")
            .unwrap_or_else(|_| "console".into())
            .as_str()
        {
            "console" => SmsBackend::Console,
            "twilio" => SmsBackend::Twilio {
                account_sid: std::env::var("TWILIO_ACCOUNT_SID")
                    .context("TWILIO_ACCOUNT_SID is required for the twilio backend")?,
                auth_token: std::env::var("TWILIO_AUTH_TOKEN")
                    .context("TWILIO_AUTH_TOKEN is required for the twilio backend")?,
                from: std::env::var("TWILIO_FROM")
                    .context("TWILIO_FROM is required for the twilio backend")?,
            },
            other => anyhow::bail!("unknown SMS_BACKEND `{}`", other),
        };

        let verification = VerificationConfig {
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "Agora".into()),
            code_length: env_or("SECURITY_CODE_LENGTH", 6),
            code_ttl_seconds: env_or("SECURITY_CODE_TTL_SECONDS", 3600),
            verify_only_once: env_or("VERIFY_SECURITY_CODE_ONLY_ONCE", false),
        };
        anyhow::ensure!(
            (4..=10).contains(&verification.code_length),
            "SECURITY_CODE_LENGTH must be between 4 and 10"
        );

        Ok(Self {
            database_url,
            jwt,
            sms,
            verification,
        })
    }
}
