//! CLI command handlers, one per file.

mod check;
mod probe;
mod rules;

pub use check::{run_check, CheckOptions};
pub use probe::run_probe;
pub use rules::run_rules;
