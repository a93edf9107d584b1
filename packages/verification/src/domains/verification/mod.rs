//! Verification domain - phone-number possession proof via OTP
//!
//! Flow:
//!   register → issue_challenge (Movider sends SMS) → verify_code →
//!   identity Verified; resends re-enter issue_challenge behind the cooldown.
//!
//! Responsibilities:
//! - One live challenge per identity, superseded on re-issue
//! - Resend cooldown enforced before any provider traffic
//! - Typed error taxonomy; no raw provider errors escape

pub mod actions;
pub mod context;
pub mod cooldown;
pub mod error;
pub mod events;
pub mod models;
pub mod store;

pub use actions::{issue_challenge, verify_code, ChallengeToken, Verified};
pub use context::VerificationContext;
pub use error::{IssueError, VerifyError};
pub use events::VerificationEvent;
