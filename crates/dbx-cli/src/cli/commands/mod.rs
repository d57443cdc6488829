//! CLI command handlers, one file per subcommand.

mod check;
mod extract;
mod formats;
mod session;

pub use check::run_check;
pub use extract::run_extract;
pub use formats::run_formats;
