//! Issue challenge action

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domains::verification::context::VerificationContext;
use crate::domains::verification::cooldown;
use crate::domains::verification::error::IssueError;
use crate::domains::verification::events::VerificationEvent;
use crate::domains::verification::models::Challenge;
use crate::kernel::ProviderError;

/// Opaque handle to the challenge just issued. The raw provider token stays
/// server-side; this exists so callers can correlate, not so they can show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request a new OTP for the identity, superseding any prior challenge.
///
/// Both the registration flow and the resend button land here; the cooldown
/// gate applies to both. Holds the identity's lock for the whole operation,
/// so concurrent resends serialize and exactly one reaches the provider.
/// Emits `ChallengeIssued` on success. On any failure nothing is mutated.
pub async fn issue_challenge(
    identity_id: Uuid,
    ctx: &VerificationContext,
) -> Result<ChallengeToken, IssueError> {
    let record = ctx
        .store()
        .find(identity_id)
        .ok_or(IssueError::UnknownIdentity)?;
    let mut record = record.lock().await;

    // Verified is terminal; nothing to issue.
    if record.identity.is_verified() {
        return Err(IssueError::AlreadyVerified);
    }

    let phone_number = record
        .identity
        .phone_number
        .clone()
        .ok_or(IssueError::MissingPhoneNumber)?;

    let now = ctx.deps().now();
    if let Some(remaining) =
        cooldown::remaining(record.last_issued_at, now, ctx.config().resend_cooldown)
    {
        debug!(
            %identity_id,
            remaining_seconds = remaining.num_seconds(),
            "OTP resend still cooling down"
        );
        return Err(IssueError::CooldownActive {
            remaining_seconds: remaining.num_seconds(),
        });
    }

    let pin_expire_seconds = ctx.config().pin_expire.num_seconds() as u32;
    let issue_call = ctx.deps().provider.issue_otp(
        &phone_number,
        ctx.config().code_length,
        pin_expire_seconds,
    );

    let issued = match tokio::time::timeout(ctx.config().provider_timeout, issue_call).await {
        Err(_) => {
            error!(%identity_id, "OTP issuance timed out");
            return Err(IssueError::ProviderUnavailable);
        }
        Ok(Err(ProviderError::Unavailable(message))) => {
            error!(%identity_id, %message, "failed to send OTP");
            return Err(IssueError::ProviderUnavailable);
        }
        Ok(Err(ProviderError::Rejected(message) | ProviderError::CodeRejected(message))) => {
            error!(%identity_id, %message, "provider rejected OTP request");
            return Err(IssueError::ProviderRejected);
        }
        Ok(Ok(issued)) => issued,
    };

    // Commit, still under the identity's lock. Timestamps are re-read so the
    // challenge window starts after the provider round trip, not before it.
    let now = ctx.deps().now();
    record.challenge = Some(Challenge::new(
        issued.request_token.clone(),
        now,
        ctx.config().pin_expire,
    ));
    record.last_issued_at = Some(now);
    record.identity.begin_verification();

    let expires_at = now + ctx.config().pin_expire;
    info!(%identity_id, "OTP sent successfully");
    ctx.emit(VerificationEvent::ChallengeIssued {
        identity_id,
        expires_at,
    });

    Ok(ChallengeToken(issued.request_token))
}
