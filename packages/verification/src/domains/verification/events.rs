use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Verification events - facts about successful state changes
///
/// NOTE: Failures are not events. Errors go in Result::Err; events exist for
/// downstream listeners (audit trail, notification hooks, UI countdown
/// resets). Request tokens never appear here.
#[derive(Debug, Clone)]
pub enum VerificationEvent {
    /// A challenge was issued and an SMS is on its way
    ChallengeIssued {
        identity_id: Uuid,
        expires_at: DateTime<Utc>,
    },

    /// The identity proved possession of its phone number
    PhoneVerified {
        identity_id: Uuid,
        verified_at: DateTime<Utc>,
    },
}
