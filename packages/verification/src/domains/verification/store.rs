//! In-memory identity registry with per-identity locking.
//!
//! The outer map lock is synchronous and covers only lookup and insert; it is
//! never held across an await. Each record carries its own async mutex, held
//! for a whole issue/verify operation (provider call included), which
//! serializes same-identity operations while leaving other identities free.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{Challenge, Identity};

/// Everything the core tracks for one identity. The cooldown timestamp lives
/// here, on the durable record, not in ambient session state.
#[derive(Debug)]
pub struct IdentityRecord {
    pub identity: Identity,
    /// The at-most-one outstanding challenge.
    pub challenge: Option<Challenge>,
    pub last_issued_at: Option<DateTime<Utc>>,
}

pub struct IdentityStore {
    records: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<IdentityRecord>>>>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new identity (the registration flow calls this right
    /// before issuing the first challenge).
    pub fn register(&self, phone_number: Option<String>, now: DateTime<Utc>) -> Identity {
        let identity = Identity::new(phone_number, now);
        let record = IdentityRecord {
            identity: identity.clone(),
            challenge: None,
            last_issued_at: None,
        };
        self.records
            .lock()
            .expect("identity map lock poisoned")
            .insert(identity.id, Arc::new(tokio::sync::Mutex::new(record)));
        identity
    }

    /// Handle to an identity's record, if registered.
    pub fn find(&self, id: Uuid) -> Option<Arc<tokio::sync::Mutex<IdentityRecord>>> {
        self.records
            .lock()
            .expect("identity map lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Point-in-time copy of the identity, for callers that only read.
    pub async fn identity(&self, id: Uuid) -> Option<Identity> {
        let record = self.find(id)?;
        let guard = record.lock().await;
        Some(guard.identity.clone())
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::new()
    }
}
