//! Outbound fetch safety validation.
//!
//! Call [`Validator::validate`] before the server fetches any user-supplied
//! URL, and again on every redirect target. [`fetch_head::SafeFetcher`] does
//! both for HEAD-style metadata probes.

pub mod classify;
pub mod config;
pub mod fetch_head;
pub mod logging;
pub mod protocol;
pub mod resolve;
pub mod validate;

pub use validate::{validate_sync, RejectionReason, Validator, Verdict};
