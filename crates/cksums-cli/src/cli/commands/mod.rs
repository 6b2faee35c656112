//! CLI command handlers, one per mode.

mod check;
mod completions;
mod digest;

pub use check::{run_check, CheckOutput};
pub use completions::run_completions;
pub use digest::run_digest;
