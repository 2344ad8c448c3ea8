//! Command implementations.

pub mod completions;
pub mod dispatcher;
pub mod install;
pub mod status;

pub use completions::CompletionsCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use install::InstallCommand;
pub use status::StatusCommand;
