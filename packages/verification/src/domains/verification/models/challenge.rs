use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One outstanding OTP issuance for an identity.
///
/// Lifecycle: created on issuance, consumed on successful verification,
/// superseded (replaced wholesale) when a new challenge is issued. The store
/// guarantees at most one per identity; this type decides whether that one is
/// still usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    /// Opaque provider token required to acknowledge the code.
    /// Emptied on consumption; tokens are not retained.
    pub request_token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    pub failed_attempts: u32,
}

impl Challenge {
    pub fn new(request_token: String, issued_at: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        Self {
            request_token,
            issued_at,
            expires_at: issued_at + ttl,
            consumed: false,
            failed_attempts: 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether a verify attempt may still run against this challenge.
    pub fn is_active(&self, now: DateTime<Utc>, max_attempts: u32) -> bool {
        !self.consumed && !self.is_expired(now) && self.failed_attempts < max_attempts
    }

    /// Count one provider rejection of the submitted code. Transport
    /// failures are not attempts and must not be recorded here.
    pub fn record_failed_attempt(&mut self) {
        self.failed_attempts += 1;
    }

    /// Mark verified and purge the token.
    pub fn consume(&mut self) {
        self.consumed = true;
        self.request_token.clear();
    }
}
