// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into VerifierDeps for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::{BaseClock, BaseOtpProvider, IssuedOtp, ProviderError};

// =============================================================================
// Mock OTP Provider
// =============================================================================

/// Arguments captured from an issue call
#[derive(Debug, Clone)]
pub struct IssueCallArgs {
    pub phone_number: String,
    pub code_length: u8,
    pub pin_expire_seconds: u32,
}

/// Arguments captured from an acknowledge call
#[derive(Debug, Clone)]
pub struct AcknowledgeCallArgs {
    pub request_token: String,
    pub code: String,
}

pub struct MockOtpProvider {
    issue_results: Arc<Mutex<Vec<Result<IssuedOtp, ProviderError>>>>,
    acknowledge_results: Arc<Mutex<Vec<Result<(), ProviderError>>>>,
    issue_calls: Arc<Mutex<Vec<IssueCallArgs>>>,
    acknowledge_calls: Arc<Mutex<Vec<AcknowledgeCallArgs>>>,
    /// When set, every call sleeps first; combine with a paused tokio runtime
    /// to exercise the caller-side timeout.
    delay: Mutex<Option<Duration>>,
    token_counter: Mutex<u64>,
}

impl MockOtpProvider {
    pub fn new() -> Self {
        Self {
            issue_results: Arc::new(Mutex::new(Vec::new())),
            acknowledge_results: Arc::new(Mutex::new(Vec::new())),
            issue_calls: Arc::new(Mutex::new(Vec::new())),
            acknowledge_calls: Arc::new(Mutex::new(Vec::new())),
            delay: Mutex::new(None),
            token_counter: Mutex::new(0),
        }
    }

    /// Queue a result for the next issue call (FIFO).
    pub fn with_issue_result(self, result: Result<IssuedOtp, ProviderError>) -> Self {
        self.issue_results.lock().unwrap().push(result);
        self
    }

    /// Queue a result for the next acknowledge call (FIFO).
    pub fn with_acknowledge_result(self, result: Result<(), ProviderError>) -> Self {
        self.acknowledge_results.lock().unwrap().push(result);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn issue_calls(&self) -> Vec<IssueCallArgs> {
        self.issue_calls.lock().unwrap().clone()
    }

    pub fn acknowledge_calls(&self) -> Vec<AcknowledgeCallArgs> {
        self.acknowledge_calls.lock().unwrap().clone()
    }

    pub fn issue_call_count(&self) -> usize {
        self.issue_calls.lock().unwrap().len()
    }

    pub fn acknowledge_call_count(&self) -> usize {
        self.acknowledge_calls.lock().unwrap().len()
    }

    async fn apply_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockOtpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOtpProvider for MockOtpProvider {
    async fn issue_otp(
        &self,
        phone_number: &str,
        code_length: u8,
        pin_expire_seconds: u32,
    ) -> Result<IssuedOtp, ProviderError> {
        self.apply_delay().await;

        // Record the call with all arguments
        self.issue_calls.lock().unwrap().push(IssueCallArgs {
            phone_number: phone_number.to_string(),
            code_length,
            pin_expire_seconds,
        });

        let mut results = self.issue_results.lock().unwrap();
        if !results.is_empty() {
            return results.remove(0);
        }

        // Fall back to a fresh deterministic token
        let mut counter = self.token_counter.lock().unwrap();
        *counter += 1;
        Ok(IssuedOtp {
            request_token: format!("mock-request-{}", counter),
        })
    }

    async fn acknowledge_otp(
        &self,
        request_token: &str,
        code: &str,
    ) -> Result<(), ProviderError> {
        self.apply_delay().await;

        self.acknowledge_calls
            .lock()
            .unwrap()
            .push(AcknowledgeCallArgs {
                request_token: request_token.to_string(),
                code: code.to_string(),
            });

        let mut results = self.acknowledge_results.lock().unwrap();
        if !results.is_empty() {
            return results.remove(0);
        }

        Ok(())
    }
}

// =============================================================================
// Mock Clock
// =============================================================================

/// Settable clock. Starts at a fixed instant so tests get stable timestamps.
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    pub fn starting_at(instant: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(instant),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseClock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
