use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phone-verification status of one identity.
///
/// Unverified → PendingVerification → Verified. Pending may re-enter itself
/// through repeated issuance; Verified is terminal and never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneStatus {
    Unverified,
    PendingVerification,
    Verified,
}

/// A registered user, as far as this core cares: an id, the phone number we
/// may verify, and where that verification stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    /// E.164 phone number, if one was supplied at registration.
    pub phone_number: Option<String>,
    pub status: PhoneStatus,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(phone_number: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number,
            status: PhoneStatus::Unverified,
            phone_verified_at: None,
            created_at: now,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == PhoneStatus::Verified
    }

    /// Enter PendingVerification on first issuance. Re-issues keep the
    /// status; a Verified identity never gets here (guarded upstream).
    pub fn begin_verification(&mut self) {
        if self.status == PhoneStatus::Unverified {
            self.status = PhoneStatus::PendingVerification;
        }
    }

    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.status = PhoneStatus::Verified;
        self.phone_verified_at = Some(now);
    }
}
