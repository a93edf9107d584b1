//! Verify code action

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domains::verification::context::VerificationContext;
use crate::domains::verification::error::VerifyError;
use crate::domains::verification::events::VerificationEvent;
use crate::kernel::ProviderError;

/// Successful verification outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub identity_id: Uuid,
    pub verified_at: chrono::DateTime<chrono::Utc>,
}

/// Check a user-submitted code against the identity's active challenge.
///
/// Format validation happens before anything else; a malformed code never
/// reaches the provider. A rejected code counts one failed attempt and
/// leaves the challenge usable until expiry or attempt exhaustion; a
/// transport failure counts nothing. On success the challenge is consumed,
/// the token purged, the cooldown cleared, and `PhoneVerified` is emitted.
pub async fn verify_code(
    identity_id: Uuid,
    submitted_code: &str,
    ctx: &VerificationContext,
) -> Result<Verified, VerifyError> {
    let expected_digits = ctx.config().code_length;
    if !is_well_formed(submitted_code, expected_digits) {
        return Err(VerifyError::MalformedCode { expected_digits });
    }

    let record = ctx
        .store()
        .find(identity_id)
        .ok_or(VerifyError::UnknownIdentity)?;
    let mut record = record.lock().await;

    let now = ctx.deps().now();
    let max_attempts = ctx.config().max_attempts;
    let request_token = match record.challenge.as_ref() {
        Some(challenge) if challenge.is_active(now, max_attempts) => {
            challenge.request_token.clone()
        }
        _ => return Err(VerifyError::NoActiveChallenge),
    };

    let acknowledge = ctx
        .deps()
        .provider
        .acknowledge_otp(&request_token, submitted_code);

    match tokio::time::timeout(ctx.config().provider_timeout, acknowledge).await {
        Err(_) => {
            error!(%identity_id, "OTP verification timed out");
            Err(VerifyError::ProviderUnavailable)
        }
        Ok(Err(ProviderError::Unavailable(message))) => {
            error!(%identity_id, %message, "OTP verification failed");
            Err(VerifyError::ProviderUnavailable)
        }
        Ok(Err(ProviderError::CodeRejected(message) | ProviderError::Rejected(message))) => {
            if let Some(challenge) = record.challenge.as_mut() {
                challenge.record_failed_attempt();
                if !challenge.is_active(now, max_attempts) {
                    warn!(%identity_id, "challenge invalidated after too many failed attempts");
                }
            }
            warn!(%identity_id, %message, "OTP code rejected");
            Err(VerifyError::InvalidCode)
        }
        Ok(Ok(())) => {
            let verified_at = ctx.deps().now();
            // Token purged, cooldown cleared, status flipped in one commit
            // under the identity's lock.
            record.challenge = None;
            record.last_issued_at = None;
            record.identity.mark_verified(verified_at);

            info!(%identity_id, "phone successfully verified");
            ctx.emit(VerificationEvent::PhoneVerified {
                identity_id,
                verified_at,
            });

            Ok(Verified {
                identity_id,
                verified_at,
            })
        }
    }
}

/// Codes are exactly `expected_digits` ASCII digits, nothing else.
fn is_well_formed(code: &str, expected_digits: u8) -> bool {
    code.len() == expected_digits as usize && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_requires_exact_digit_count() {
        assert!(is_well_formed("123456", 6));
        assert!(!is_well_formed("12345", 6));
        assert!(!is_well_formed("1234567", 6));
    }

    #[test]
    fn well_formed_rejects_non_digits() {
        assert!(!is_well_formed("12a45", 5));
        assert!(!is_well_formed("12 456", 6));
        assert!(!is_well_formed("", 6));
        // Unicode digits are not ASCII digits
        assert!(!is_well_formed("１２３４５６", 6));
    }
}
