use thiserror::Error;

/// Why a challenge could not be issued.
///
/// Everything except the provider variants is decided locally, before any
/// outbound call. Provider failures never leave state half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    #[error("unknown identity")]
    UnknownIdentity,

    #[error("phone number is already verified")]
    AlreadyVerified,

    #[error("no phone number on record")]
    MissingPhoneNumber,

    #[error("please wait {remaining_seconds}s before requesting another code")]
    CooldownActive { remaining_seconds: i64 },

    #[error("could not reach the verification service, try again later")]
    ProviderUnavailable,

    #[error("the verification service rejected the request")]
    ProviderRejected,
}

/// Why a submitted code was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("unknown identity")]
    UnknownIdentity,

    #[error("missing OTP session, please request a new code")]
    NoActiveChallenge,

    #[error("the code must be exactly {expected_digits} digits")]
    MalformedCode { expected_digits: u8 },

    #[error("invalid or expired OTP code")]
    InvalidCode,

    #[error("OTP verification failed, try again later")]
    ProviderUnavailable,
}
