//! Dependencies for verification actions (using traits for testability)
//!
//! This module provides the dependency container handed to all domain
//! actions. External services sit behind trait abstractions so tests can
//! swap them out.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use movider::{MoviderError, MoviderService};

use crate::kernel::traits::{BaseClock, BaseOtpProvider, IssuedOtp, ProviderError, SystemClock};

// =============================================================================
// MoviderService Adapter (implements BaseOtpProvider trait)
// =============================================================================

/// Wrapper around MoviderService that implements the BaseOtpProvider trait
pub struct MoviderAdapter(pub Arc<MoviderService>);

impl MoviderAdapter {
    pub fn new(service: Arc<MoviderService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseOtpProvider for MoviderAdapter {
    async fn issue_otp(
        &self,
        phone_number: &str,
        code_length: u8,
        pin_expire_seconds: u32,
    ) -> Result<IssuedOtp, ProviderError> {
        match self
            .0
            .send_otp(phone_number, code_length, pin_expire_seconds)
            .await
        {
            Ok(request_token) => Ok(IssuedOtp { request_token }),
            Err(e) if e.is_transient() => Err(ProviderError::Unavailable(e.to_string())),
            Err(e) => Err(ProviderError::Rejected(e.to_string())),
        }
    }

    async fn acknowledge_otp(
        &self,
        request_token: &str,
        code: &str,
    ) -> Result<(), ProviderError> {
        match self.0.acknowledge_otp(request_token, code).await {
            Ok(()) => Ok(()),
            Err(MoviderError::CodeRejected { message }) => {
                Err(ProviderError::CodeRejected(message))
            }
            Err(e) if e.is_transient() => Err(ProviderError::Unavailable(e.to_string())),
            Err(e) => Err(ProviderError::Rejected(e.to_string())),
        }
    }
}

// =============================================================================
// VerifierDeps
// =============================================================================

/// Dependencies accessible to verification actions
#[derive(Clone)]
pub struct VerifierDeps {
    pub provider: Arc<dyn BaseOtpProvider>,
    pub clock: Arc<dyn BaseClock>,
}

impl VerifierDeps {
    pub fn new(provider: Arc<dyn BaseOtpProvider>, clock: Arc<dyn BaseClock>) -> Self {
        Self { provider, clock }
    }

    /// Production wiring: Movider behind the trait, wall clock.
    pub fn movider(service: Arc<MoviderService>) -> Self {
        Self {
            provider: Arc::new(MoviderAdapter::new(service)),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
