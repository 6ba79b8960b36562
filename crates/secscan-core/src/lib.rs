pub mod error;
pub mod exec;
pub mod hook_config;
pub mod repo;
pub mod setup;
pub mod tools;

pub use error::SecscanError;
pub use exec::{CommandOutput, CommandRunner, SystemRunner};
pub use setup::{run_setup, RunMode, SetupOptions, SetupReport};
pub use tools::{ToolProbe, ToolReport, ToolStatus};
