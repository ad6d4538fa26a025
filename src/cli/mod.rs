//! Command-line glue: argument parsing, client setup, output

mod args;
mod context;
mod sync;

pub use args::Args;
pub use sync::run_sync_command;
