pub mod resolver;
pub mod state;
pub mod view;

pub use resolver::{Activation, IdentityResolver};
pub use state::ProcessState;
pub use view::{Snapshot, render};
