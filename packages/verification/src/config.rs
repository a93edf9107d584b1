use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub movider_api_key: String,
    pub movider_api_secret: String,
    /// SMS sender name shown to recipients.
    pub otp_sender: String,
    pub verification: VerificationConfig,
}

/// Tunables consumed by the verification core.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Number of digits in a generated code.
    pub code_length: u8,
    /// How long an issued code stays valid.
    pub pin_expire: chrono::Duration,
    /// Minimum interval between issuances for one identity.
    pub resend_cooldown: chrono::Duration,
    /// Upper bound on a single provider round trip.
    pub provider_timeout: Duration,
    /// Failed verification attempts allowed before a challenge is dead.
    pub max_attempts: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            pin_expire: chrono::Duration::seconds(300),
            resend_cooldown: chrono::Duration::seconds(300),
            provider_timeout: Duration::from_secs(5),
            max_attempts: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = VerificationConfig::default();

        Ok(Self {
            movider_api_key: env::var("MOVIDER_API_KEY")
                .context("MOVIDER_API_KEY must be set")?,
            movider_api_secret: env::var("MOVIDER_API_SECRET")
                .context("MOVIDER_API_SECRET must be set")?,
            otp_sender: env::var("OTP_SENDER").unwrap_or_else(|_| "Chatkoto".to_string()),
            verification: VerificationConfig {
                code_length: env_or("OTP_CODE_LENGTH", defaults.code_length)?,
                pin_expire: chrono::Duration::seconds(env_or(
                    "OTP_PIN_EXPIRE_SECONDS",
                    defaults.pin_expire.num_seconds(),
                )?),
                resend_cooldown: chrono::Duration::seconds(env_or(
                    "OTP_RESEND_COOLDOWN_SECONDS",
                    defaults.resend_cooldown.num_seconds(),
                )?),
                provider_timeout: Duration::from_secs(env_or(
                    "OTP_PROVIDER_TIMEOUT_SECONDS",
                    defaults.provider_timeout.as_secs(),
                )?),
                max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts)?,
            },
        })
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
