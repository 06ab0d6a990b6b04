pub mod reset;
pub mod resolve;
pub mod show;

pub use reset::ResetCommand;
pub use resolve::{ResolveCommand, ResolveStatus};
pub use show::ShowCommand;

pub use reset::execute as run_reset;
pub use resolve::execute as run_resolve;
pub use show::execute as run_show;
