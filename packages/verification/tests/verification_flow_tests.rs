//! Integration tests for the phone verification flow.
//!
//! Drives the real actions against mock dependencies:
//! - issuance, cooldown, and resend behavior
//! - challenge lifecycle (supersede, consume, expire, exhaust)
//! - provider failure translation and no-partial-write guarantees
//! - fact events

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as Window;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

use verification_core::config::VerificationConfig;
use verification_core::domains::verification::models::PhoneStatus;
use verification_core::domains::verification::{
    actions, IssueError, VerificationContext, VerificationEvent, VerifyError,
};
use verification_core::kernel::test_dependencies::{MockClock, MockOtpProvider};
use verification_core::kernel::{BaseClock, ProviderError, VerifierDeps};

const PHONE: &str = "+15555550100";
const CODE: &str = "123456";

// ============================================================================
// Test Helpers
// ============================================================================

struct TestHarness {
    ctx: VerificationContext,
    provider: Arc<MockOtpProvider>,
    clock: Arc<MockClock>,
}

fn harness() -> TestHarness {
    harness_with(MockOtpProvider::new(), VerificationConfig::default())
}

fn harness_with(provider: MockOtpProvider, config: VerificationConfig) -> TestHarness {
    let provider = Arc::new(provider);
    let clock = Arc::new(MockClock::new());
    let deps = VerifierDeps::new(provider.clone(), clock.clone());
    TestHarness {
        ctx: VerificationContext::new(deps, config),
        provider,
        clock,
    }
}

impl TestHarness {
    fn register_with_phone(&self) -> Uuid {
        self.ctx
            .store()
            .register(Some(PHONE.to_string()), self.clock.now())
            .id
    }

    fn register_without_phone(&self) -> Uuid {
        self.ctx.store().register(None, self.clock.now()).id
    }

    async fn status(&self, id: Uuid) -> PhoneStatus {
        self.ctx.store().identity(id).await.unwrap().status
    }
}

// ============================================================================
// Issuance & Cooldown
// ============================================================================

#[tokio::test]
async fn issue_sends_one_provider_call_and_marks_pending() {
    let h = harness();
    let id = h.register_with_phone();

    actions::issue_challenge(id, &h.ctx).await.unwrap();

    assert_eq!(h.provider.issue_call_count(), 1);
    let call = &h.provider.issue_calls()[0];
    assert_eq!(call.phone_number, PHONE);
    assert_eq!(call.code_length, 6);
    assert_eq!(call.pin_expire_seconds, 300);
    assert_eq!(h.status(id).await, PhoneStatus::PendingVerification);
}

#[tokio::test]
async fn issue_for_unknown_identity_fails_without_provider_call() {
    let h = harness();
    let result = actions::issue_challenge(Uuid::new_v4(), &h.ctx).await;
    assert_eq!(result.unwrap_err(), IssueError::UnknownIdentity);
    assert_eq!(h.provider.issue_call_count(), 0);
}

#[tokio::test]
async fn issue_without_phone_number_fails_without_provider_call() {
    let h = harness();
    let id = h.register_without_phone();

    let result = actions::issue_challenge(id, &h.ctx).await;
    assert_eq!(result.unwrap_err(), IssueError::MissingPhoneNumber);
    assert_eq!(h.provider.issue_call_count(), 0);
}

#[tokio::test]
async fn resend_inside_cooldown_is_rejected_without_provider_call() {
    let h = harness();
    let id = h.register_with_phone();

    actions::issue_challenge(id, &h.ctx).await.unwrap();
    h.clock.advance(Window::seconds(100));

    let result = actions::issue_challenge(id, &h.ctx).await;
    assert_eq!(
        result.unwrap_err(),
        IssueError::CooldownActive {
            remaining_seconds: 200
        }
    );
    assert_eq!(h.provider.issue_call_count(), 1);
}

#[tokio::test]
async fn cooldown_countdown_is_visible_to_the_caller() {
    let h = harness();
    let id = h.register_with_phone();

    assert!(actions::can_issue(id, &h.ctx).await);
    actions::issue_challenge(id, &h.ctx).await.unwrap();
    assert!(!actions::can_issue(id, &h.ctx).await);

    h.clock.advance(Window::seconds(100));
    assert_eq!(
        actions::cooldown_remaining_seconds(id, &h.ctx).await,
        Some(200)
    );

    h.clock.advance(Window::seconds(200));
    assert!(actions::can_issue(id, &h.ctx).await);
}

#[tokio::test]
async fn reissue_after_cooldown_supersedes_the_previous_challenge() {
    let h = harness();
    let id = h.register_with_phone();

    let first = actions::issue_challenge(id, &h.ctx).await.unwrap();
    h.clock.advance(Window::seconds(300));
    let second = actions::issue_challenge(id, &h.ctx).await.unwrap();
    assert_ne!(first, second);

    // Status did not regress while the challenge was replaced
    assert_eq!(h.status(id).await, PhoneStatus::PendingVerification);

    // Verification runs against the superseding token only
    actions::verify_code(id, CODE, &h.ctx).await.unwrap();
    let acks = h.provider.acknowledge_calls();
    assert_eq!(acks.len(), 1);
    assert_eq!(acks[0].request_token, second.as_str());
}

#[tokio::test]
async fn concurrent_resends_reach_the_provider_exactly_once() {
    let h = harness();
    let id = h.register_with_phone();

    let (a, b) = tokio::join!(
        actions::issue_challenge(id, &h.ctx),
        actions::issue_challenge(id, &h.ctx)
    );

    assert_eq!(h.provider.issue_call_count(), 1);
    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser,
        Err(IssueError::CooldownActive {
            remaining_seconds: 300
        })
    ));
}

// ============================================================================
// Provider failures during issuance
// ============================================================================

#[tokio::test]
async fn provider_unavailable_on_issue_leaves_no_state_behind() {
    let h = harness_with(
        MockOtpProvider::new()
            .with_issue_result(Err(ProviderError::Unavailable("503".to_string()))),
        VerificationConfig::default(),
    );
    let id = h.register_with_phone();

    let result = actions::issue_challenge(id, &h.ctx).await;
    assert_eq!(result.unwrap_err(), IssueError::ProviderUnavailable);

    // No challenge persisted, no cooldown recorded
    assert_eq!(
        actions::verify_code(id, CODE, &h.ctx).await.unwrap_err(),
        VerifyError::NoActiveChallenge
    );
    assert!(actions::can_issue(id, &h.ctx).await);
    assert_eq!(h.status(id).await, PhoneStatus::Unverified);

    // And the very next attempt may succeed
    actions::issue_challenge(id, &h.ctx).await.unwrap();
}

#[tokio::test]
async fn provider_rejection_on_issue_is_distinguished_from_outages() {
    let h = harness_with(
        MockOtpProvider::new()
            .with_issue_result(Err(ProviderError::Rejected("to is invalid".to_string()))),
        VerificationConfig::default(),
    );
    let id = h.register_with_phone();

    let result = actions::issue_challenge(id, &h.ctx).await;
    assert_eq!(result.unwrap_err(), IssueError::ProviderRejected);
    assert!(actions::can_issue(id, &h.ctx).await);
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_on_issue_maps_to_unavailable() {
    // Mock stalls past the 5s bound; the paused runtime fast-forwards.
    let h = harness_with(
        MockOtpProvider::new().with_delay(Duration::from_secs(30)),
        VerificationConfig::default(),
    );
    let id = h.register_with_phone();

    let result = actions::issue_challenge(id, &h.ctx).await;
    assert_eq!(result.unwrap_err(), IssueError::ProviderUnavailable);

    assert!(actions::can_issue(id, &h.ctx).await);
    assert_eq!(
        actions::verify_code(id, CODE, &h.ctx).await.unwrap_err(),
        VerifyError::NoActiveChallenge
    );
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn successful_verification_consumes_the_challenge() {
    let h = harness();
    let id = h.register_with_phone();

    actions::issue_challenge(id, &h.ctx).await.unwrap();
    let verified = actions::verify_code(id, CODE, &h.ctx).await.unwrap();
    assert_eq!(verified.identity_id, id);

    let identity = h.ctx.store().identity(id).await.unwrap();
    assert_eq!(identity.status, PhoneStatus::Verified);
    assert!(identity.phone_verified_at.is_some());

    // Consumed challenges cannot be verified again
    assert_eq!(
        actions::verify_code(id, CODE, &h.ctx).await.unwrap_err(),
        VerifyError::NoActiveChallenge
    );
    assert_eq!(h.provider.acknowledge_call_count(), 1);

    // Cooldown is cleared on success
    assert!(actions::can_issue(id, &h.ctx).await);
}

#[tokio::test]
async fn verified_identity_cannot_be_issued_again() {
    let h = harness();
    let id = h.register_with_phone();

    actions::issue_challenge(id, &h.ctx).await.unwrap();
    actions::verify_code(id, CODE, &h.ctx).await.unwrap();

    let result = actions::issue_challenge(id, &h.ctx).await;
    assert_eq!(result.unwrap_err(), IssueError::AlreadyVerified);
    assert_eq!(h.provider.issue_call_count(), 1);
}

#[tokio::test]
async fn malformed_codes_never_reach_the_provider() {
    let h = harness();
    let id = h.register_with_phone();
    actions::issue_challenge(id, &h.ctx).await.unwrap();

    for bad in ["12a45", "12345", "1234567", "", "12 456"] {
        let result = actions::verify_code(id, bad, &h.ctx).await;
        assert_eq!(
            result.unwrap_err(),
            VerifyError::MalformedCode { expected_digits: 6 },
            "code {:?} should be rejected locally",
            bad
        );
    }
    assert_eq!(h.provider.acknowledge_call_count(), 0);
}

#[tokio::test]
async fn expired_challenge_yields_no_active_challenge() {
    let h = harness();
    let id = h.register_with_phone();

    actions::issue_challenge(id, &h.ctx).await.unwrap();
    h.clock.advance(Window::seconds(300));

    let result = actions::verify_code(id, CODE, &h.ctx).await;
    assert_eq!(result.unwrap_err(), VerifyError::NoActiveChallenge);
    assert_eq!(h.provider.acknowledge_call_count(), 0);
}

#[tokio::test]
async fn rejected_code_keeps_the_challenge_alive_for_a_retry() {
    let h = harness_with(
        MockOtpProvider::new()
            .with_acknowledge_result(Err(ProviderError::CodeRejected("wrong".to_string()))),
        VerificationConfig::default(),
    );
    let id = h.register_with_phone();
    actions::issue_challenge(id, &h.ctx).await.unwrap();

    let first = actions::verify_code(id, "000000", &h.ctx).await;
    assert_eq!(first.unwrap_err(), VerifyError::InvalidCode);

    // Same challenge, second try with the right code succeeds
    actions::verify_code(id, CODE, &h.ctx).await.unwrap();
    assert_eq!(h.provider.acknowledge_call_count(), 2);
}

#[tokio::test]
async fn too_many_rejected_codes_exhaust_the_challenge() {
    let config = VerificationConfig {
        max_attempts: 2,
        ..VerificationConfig::default()
    };
    let h = harness_with(
        MockOtpProvider::new()
            .with_acknowledge_result(Err(ProviderError::CodeRejected("wrong".to_string())))
            .with_acknowledge_result(Err(ProviderError::CodeRejected("wrong".to_string()))),
        config,
    );
    let id = h.register_with_phone();
    actions::issue_challenge(id, &h.ctx).await.unwrap();

    for _ in 0..2 {
        let result = actions::verify_code(id, "000000", &h.ctx).await;
        assert_eq!(result.unwrap_err(), VerifyError::InvalidCode);
    }

    // Exhausted: the correct code no longer even reaches the provider
    let result = actions::verify_code(id, CODE, &h.ctx).await;
    assert_eq!(result.unwrap_err(), VerifyError::NoActiveChallenge);
    assert_eq!(h.provider.acknowledge_call_count(), 2);
}

#[tokio::test]
async fn provider_outage_during_verify_does_not_burn_an_attempt() {
    let config = VerificationConfig {
        max_attempts: 1,
        ..VerificationConfig::default()
    };
    let h = harness_with(
        MockOtpProvider::new()
            .with_acknowledge_result(Err(ProviderError::Unavailable("timeout".to_string()))),
        config,
    );
    let id = h.register_with_phone();
    actions::issue_challenge(id, &h.ctx).await.unwrap();

    let first = actions::verify_code(id, CODE, &h.ctx).await;
    assert_eq!(first.unwrap_err(), VerifyError::ProviderUnavailable);

    // The single allowed attempt is still available
    actions::verify_code(id, CODE, &h.ctx).await.unwrap();
}

#[tokio::test]
async fn verify_for_unknown_identity_fails_cleanly() {
    let h = harness();
    let result = actions::verify_code(Uuid::new_v4(), CODE, &h.ctx).await;
    assert_eq!(result.unwrap_err(), VerifyError::UnknownIdentity);
    assert_eq!(h.provider.acknowledge_call_count(), 0);
}

// ============================================================================
// Fact events
// ============================================================================

#[tokio::test]
async fn events_fire_once_per_successful_transition() {
    let h = harness();
    let mut events = h.ctx.subscribe();
    let id = h.register_with_phone();

    actions::issue_challenge(id, &h.ctx).await.unwrap();
    actions::verify_code(id, CODE, &h.ctx).await.unwrap();

    match events.try_recv().unwrap() {
        VerificationEvent::ChallengeIssued {
            identity_id,
            expires_at,
        } => {
            assert_eq!(identity_id, id);
            assert_eq!(expires_at, h.clock.now() + Window::seconds(300));
        }
        other => panic!("expected ChallengeIssued, got {:?}", other),
    }
    match events.try_recv().unwrap() {
        VerificationEvent::PhoneVerified { identity_id, .. } => assert_eq!(identity_id, id),
        other => panic!("expected PhoneVerified, got {:?}", other),
    }
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn failures_emit_no_events() {
    let h = harness_with(
        MockOtpProvider::new()
            .with_issue_result(Err(ProviderError::Unavailable("503".to_string()))),
        VerificationConfig::default(),
    );
    let mut events = h.ctx.subscribe();
    let id = h.register_without_phone();

    let _ = actions::issue_challenge(id, &h.ctx).await; // MissingPhoneNumber
    let _ = actions::verify_code(id, "12a45", &h.ctx).await; // MalformedCode
    let _ = actions::verify_code(id, CODE, &h.ctx).await; // NoActiveChallenge

    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
