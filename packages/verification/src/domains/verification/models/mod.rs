mod challenge;
mod identity;

pub use challenge::Challenge;
pub use identity::{Identity, PhoneStatus};
