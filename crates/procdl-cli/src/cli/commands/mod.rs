//! CLI command handlers, one per file.

mod completions;
mod session;
mod submit;
mod types;

pub use completions::{run_completions, run_man};
pub use session::run_session;
pub use submit::run_submit;
pub use types::run_types;
