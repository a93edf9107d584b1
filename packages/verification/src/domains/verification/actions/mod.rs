//! Verification domain actions - business logic functions
//!
//! Actions are async functions called by the presentation layer with a
//! `VerificationContext`.

mod issue_challenge;
mod verify_code;

pub use issue_challenge::{issue_challenge, ChallengeToken};
pub use verify_code::{verify_code, Verified};

use uuid::Uuid;

use super::context::VerificationContext;
use super::cooldown;

/// Whether a (re)send would currently be allowed for this identity.
/// Unknown identities report false.
pub async fn can_issue(identity_id: Uuid, ctx: &VerificationContext) -> bool {
    cooldown_remaining_seconds(identity_id, ctx).await == Some(0)
}

/// Seconds until the resend button unlocks, for the countdown UI.
/// Some(0) means issuance is allowed now; None means unknown identity.
pub async fn cooldown_remaining_seconds(
    identity_id: Uuid,
    ctx: &VerificationContext,
) -> Option<i64> {
    let record = ctx.store().find(identity_id)?;
    let guard = record.lock().await;
    let now = ctx.deps().now();
    match cooldown::remaining(guard.last_issued_at, now, ctx.config().resend_cooldown) {
        Some(remaining) => Some(remaining.num_seconds().max(1)),
        None => Some(0),
    }
}
