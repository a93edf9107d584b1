//! Infrastructure: capability traits, the dependency container, and test
//! doubles. Business logic lives in `domains/`.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{MoviderAdapter, VerifierDeps};
pub use traits::{BaseClock, BaseOtpProvider, IssuedOtp, ProviderError, SystemClock};
