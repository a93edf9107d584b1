use serde::Deserialize;

/// Error object Movider embeds in a response body.
///
/// Present on both endpoints whenever the request was not accepted; the
/// HTTP status alone is not a reliable signal.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ApiError {
    pub fn message(&self) -> String {
        match (&self.name, &self.description) {
            (Some(name), Some(desc)) => format!("{}: {}", name, desc),
            (Some(name), None) => name.clone(),
            (None, Some(desc)) => desc.clone(),
            (None, None) => format!("error code {:?}", self.code),
        }
    }
}

/// Response body of `POST /v1/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub request_id: Option<String>,
    pub error: Option<ApiError>,
}

/// Response body of `POST /v1/verify/acknowledge`.
///
/// Success is the absence of an `error` member, not a status field.
#[derive(Debug, Clone, Deserialize)]
pub struct AcknowledgeResponse {
    pub request_id: Option<String>,
    pub price: Option<serde_json::Value>,
    pub error: Option<ApiError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_response_parses_request_id() {
        let body = r#"{"request_id":"5f2a0b"}"#;
        let parsed: VerifyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.request_id.as_deref(), Some("5f2a0b"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn verify_response_parses_error_member() {
        let body = r#"{"error":{"code":1002,"name":"Invalid Parameters","description":"to is invalid"}}"#;
        let parsed: VerifyResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.request_id.is_none());
        let err = parsed.error.unwrap();
        assert_eq!(err.code, Some(1002));
        assert_eq!(err.message(), "Invalid Parameters: to is invalid");
    }

    #[test]
    fn acknowledge_response_without_error_is_success() {
        let body = r#"{"request_id":"5f2a0b","price":0.45}"#;
        let parsed: AcknowledgeResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.error.is_none());
    }
}
