//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `runtime.rs`: check/validate/checks.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate fixture and check logic to `fixture.rs` and `services/*`.
//! - Keep behavior and output schema stable.

pub mod runtime;

pub use runtime::handle_commands;
