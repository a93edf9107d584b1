// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (cooldown gating, challenge lifecycle) lives in domain
// functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseOtpProvider, BaseClock)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// OTP Provider Trait (Infrastructure - SMS verification vendor)
// =============================================================================

/// How a provider call failed, classified for the domain layer.
///
/// Actions translate these into the user-facing taxonomy; no transport error
/// type from any HTTP client crosses this boundary.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Transport failure, timeout, or provider-side 5xx. Worth retrying.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected the request itself (bad number, bad token).
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// The provider rejected the submitted code (wrong or expired).
    #[error("provider rejected the code: {0}")]
    CodeRejected(String),
}

/// Successful issuance result.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// Opaque token the provider expects back on acknowledge.
    pub request_token: String,
}

#[async_trait]
pub trait BaseOtpProvider: Send + Sync {
    /// Ask the provider to generate and deliver a code to `phone_number`.
    async fn issue_otp(
        &self,
        phone_number: &str,
        code_length: u8,
        pin_expire_seconds: u32,
    ) -> Result<IssuedOtp, ProviderError>;

    /// Check a user-submitted code against an issued request token.
    async fn acknowledge_otp(
        &self,
        request_token: &str,
        code: &str,
    ) -> Result<(), ProviderError>;
}

// =============================================================================
// Clock Trait (Infrastructure - time source)
// =============================================================================

/// Time source behind a trait so expiry and cooldown arithmetic is
/// deterministic under test.
pub trait BaseClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used everywhere outside tests.
pub struct SystemClock;

impl BaseClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
