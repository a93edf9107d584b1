// Chatkoto phone verification core
//
// Issues one-time passcodes through the Movider Verify API, tracks the
// lifecycle of each outstanding challenge, and gates resends behind a
// per-identity cooldown. The chat features around it live elsewhere; this
// crate owns only the verification state machine.

pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
