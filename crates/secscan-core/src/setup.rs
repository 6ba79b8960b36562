//! The setup run: repository check, tool probe, config update, hook install.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::info;

use crate::error::SecscanError;
use crate::exec::CommandRunner;
use crate::hook_config::{apply_plan, install_hooks, plan_config, ConfigPlan};
use crate::repo::require_repo_root;
use crate::tools::{probe_tools, ToolStatus};

/// Whether the run changes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Apply,
    DryRun,
}

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    /// Directory the run is started from; must be the repository root.
    pub root: PathBuf,
    pub mode: RunMode,
}

/// What a run did, or in [`RunMode::DryRun`] would have done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub mode: RunMode,
    pub scanner: ToolStatus,
    pub hook_manager: ToolStatus,
    pub plan: ConfigPlan,
    /// Output of `pre-commit install`. `None` for dry runs.
    pub install_output: Option<String>,
}

/// Run the setup.
///
/// Nothing is written unless the repository check and the tool probe both
/// succeed. In dry-run mode nothing is written at all and no command other
/// than the read-only queries is run.
///
/// # Errors
///
/// - [`SecscanError::NotRepoRoot`] if `options.root` is not a repository root.
/// - [`SecscanError::ToolsMissing`] if either tool is missing or unusable.
/// - [`SecscanError::Io`] if the config cannot be read, moved or written.
/// - [`SecscanError::Subprocess`] if `pre-commit install` fails. The config
///   written before it stays in place.
pub fn run_setup(
    options: &SetupOptions,
    runner: &dyn CommandRunner,
    now: DateTime<Utc>,
) -> Result<SetupReport, SecscanError> {
    let root = require_repo_root(runner, &options.root)?;

    let tools = probe_tools(runner, &root);
    if !tools.ready() {
        return Err(SecscanError::ToolsMissing {
            scanner: tools.scanner,
            hook_manager: tools.hook_manager,
        });
    }

    let plan = plan_config(&root, &tools.scanner.version, now)?;

    let install_output = match options.mode {
        RunMode::DryRun => None,
        RunMode::Apply => {
            apply_plan(&plan)?;
            let output = install_hooks(runner, &root)?;
            info!("pre-commit hooks installed");
            Some(output)
        }
    };

    Ok(SetupReport {
        mode: options.mode,
        scanner: tools.scanner,
        hook_manager: tools.hook_manager,
        plan,
        install_output,
    })
}
