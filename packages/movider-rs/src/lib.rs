//! Client for the Movider Verify API (https://movider.co).
//!
//! Two endpoints are wrapped: `POST /v1/verify` sends an OTP SMS and returns
//! an opaque `request_id`, and `POST /v1/verify/acknowledge` checks a
//! user-submitted code against that `request_id`. Both are form-encoded and
//! authenticate with an api key/secret pair in the body.

use std::collections::HashMap;
use std::time::Duration;

pub mod models;

use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use crate::models::{AcknowledgeResponse, VerifyResponse};

const BASE_URL: &str = "https://api.movider.co/v1";

#[derive(Debug, Error)]
pub enum MoviderError {
    /// Network failure, timeout, or an unparseable body.
    #[error("movider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Movider returned a 5xx, or a 2xx with neither request_id nor error.
    #[error("movider returned an unusable response (status {status})")]
    Unusable { status: StatusCode },

    /// Movider rejected the request (error member in the body).
    #[error("movider rejected the request: {message}")]
    Api { code: Option<i64>, message: String },

    /// Movider rejected the submitted code for an acknowledge call.
    #[error("movider rejected the code: {message}")]
    CodeRejected { message: String },
}

impl MoviderError {
    /// True when retrying later could plausibly succeed (network trouble or
    /// a provider-side failure), as opposed to a rejected request.
    pub fn is_transient(&self) -> bool {
        match self {
            MoviderError::Transport(_) | MoviderError::Unusable { .. } => true,
            MoviderError::Api { .. } | MoviderError::CodeRejected { .. } => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoviderOptions {
    pub api_key: String,
    pub api_secret: String,
    /// SMS sender name shown to the recipient.
    pub sender: String,
    /// Bound on each HTTP request; Movider occasionally hangs on carrier
    /// lookups and must not stall callers indefinitely.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MoviderService {
    options: MoviderOptions,
    client: Client,
    base_url: String,
}

impl MoviderService {
    pub fn new(options: MoviderOptions) -> Self {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .expect("HTTP client should build with a static configuration");
        Self {
            options,
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the API origin. Used to point the client at a stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send an OTP SMS to `recipient` and return the provider's request id.
    ///
    /// `code_length` is the number of digits Movider generates;
    /// `pin_expire_seconds` is how long the code stays valid provider-side.
    pub async fn send_otp(
        &self,
        recipient: &str,
        code_length: u8,
        pin_expire_seconds: u32,
    ) -> Result<String, MoviderError> {
        let url = format!("{}/verify", self.base_url);

        let code_length = code_length.to_string();
        let pin_expire = pin_expire_seconds.to_string();
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("api_key", &self.options.api_key);
        form_body.insert("api_secret", &self.options.api_secret);
        form_body.insert("to", recipient);
        form_body.insert("code_length", &code_length);
        form_body.insert("from", &self.options.sender);
        form_body.insert("language", "en-us");
        form_body.insert("pin_expire", &pin_expire);

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(MoviderError::Unusable { status });
        }

        let body: VerifyResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(MoviderError::Api {
                code: error.code,
                message: error.message(),
            });
        }
        body.request_id
            .ok_or(MoviderError::Unusable { status })
    }

    /// Check a user-submitted code against a previously issued request id.
    ///
    /// Movider signals success by omitting the `error` member; any error
    /// member on this endpoint means the code was wrong or expired.
    pub async fn acknowledge_otp(
        &self,
        request_id: &str,
        code: &str,
    ) -> Result<(), MoviderError> {
        let url = format!("{}/verify/acknowledge", self.base_url);

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("api_key", &self.options.api_key);
        form_body.insert("api_secret", &self.options.api_secret);
        form_body.insert("request_id", request_id);
        form_body.insert("code", code);

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(MoviderError::Unusable { status });
        }

        let body: AcknowledgeResponse = response.json().await?;
        match body.error {
            None => Ok(()),
            Some(error) => Err(MoviderError::CodeRejected {
                message: error.message(),
            }),
        }
    }
}
