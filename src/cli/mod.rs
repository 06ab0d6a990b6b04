pub mod cli;
pub mod commands;
pub mod ui;

pub use cli::{Cli, Commands};
pub use commands::{ResetCommand, ResolveCommand, ResolveStatus, ShowCommand};
pub use commands::{run_reset, run_resolve, run_show};
