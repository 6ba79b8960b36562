//! `.pre-commit-config.yaml` management.
//!
//! Writing the configuration is split in two: [`plan_config`] inspects the
//! repository and decides what to do without touching anything, and
//! [`apply_plan`] carries the decision out. Dry runs stop after planning.
//!
//! A config that already declares the gitleaks hook is never modified. Any
//! other existing config is renamed to a timestamped backup before the fresh
//! one is written. If the process dies between the rename and the write, the
//! backup is left without a replacement; rerunning setup recovers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::SecscanError;
use crate::exec::CommandRunner;

/// File name of the hook manager configuration at the repository root.
pub const CONFIG_FILE_NAME: &str = ".pre-commit-config.yaml";

/// Marker whose presence means the scanner hook is already declared.
pub const SCANNER_HOOK_MARKER: &str = "id: gitleaks";

/// Backup suffix format. Sortable, and unambiguous about being UTC.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const CONFIG_TEMPLATE: &str = "\
repos:
  - repo: https://github.com/gitleaks/gitleaks
    rev: v{version}
    hooks:
      - id: gitleaks
";

/// Render a fresh config pinning gitleaks to `version` (without a `v` prefix).
pub fn render_config(version: &str) -> String {
    CONFIG_TEMPLATE.replace("{version}", version)
}

/// Whether `content` already declares the gitleaks hook.
///
/// Works on raw bytes so a config that is not valid UTF-8 is simply treated
/// as lacking the hook.
pub fn declares_scanner_hook(content: &[u8]) -> bool {
    let marker = SCANNER_HOOK_MARKER.as_bytes();
    content.windows(marker.len()).any(|w| w == marker)
}

/// Path of the config file inside `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Backup location for `path`: `<file name>-<UTC timestamp>` in the same
/// directory.
///
/// Two backups taken within the same second get the same name.
pub fn backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let stamped = format!("{file_name}-{}", now.format(BACKUP_TIMESTAMP_FORMAT));
    path.with_file_name(stamped)
}

/// What the writer is going to do with the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPlan {
    /// No config exists; write `content` to `path`.
    Create { path: PathBuf, content: String },
    /// The config already declares the hook; leave it alone.
    AlreadyConfigured { path: PathBuf },
    /// A config without the hook exists; move it to `backup_path`, then
    /// write `content` to `path`.
    Replace {
        path: PathBuf,
        backup_path: PathBuf,
        content: String,
    },
}

impl ConfigPlan {
    /// Path of the config file the plan targets.
    pub fn path(&self) -> &Path {
        match self {
            ConfigPlan::Create { path, .. }
            | ConfigPlan::AlreadyConfigured { path }
            | ConfigPlan::Replace { path, .. } => path,
        }
    }

    /// Lines describing the plan for a dry run, ending with the install step.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self {
            ConfigPlan::Create { path, content } => {
                lines.push(format!(
                    "Would write new {} with content:\n{content}",
                    path.display()
                ));
            }
            ConfigPlan::AlreadyConfigured { .. } => {
                lines.push("gitleaks already configured.".to_string());
            }
            ConfigPlan::Replace {
                path,
                backup_path,
                content,
            } => {
                lines.push(format!(
                    "Would move existing {} -> {}",
                    path.display(),
                    backup_path.display()
                ));
                lines.push(format!(
                    "Would write new {} with content:\n{content}",
                    path.display()
                ));
            }
        }
        lines.push(format!("Would run: {}", INSTALL_COMMAND.join(" ")));
        lines
    }
}

/// Decide how to bring the config in `root` up to date. Reads only.
///
/// # Errors
///
/// Returns [`SecscanError::Io`] if an existing config cannot be read.
pub fn plan_config(
    root: &Path,
    scanner_version: &str,
    now: DateTime<Utc>,
) -> Result<ConfigPlan, SecscanError> {
    let path = config_path(root);

    if !path.exists() {
        debug!("{} does not exist", path.display());
        return Ok(ConfigPlan::Create {
            path,
            content: render_config(scanner_version),
        });
    }

    let existing = fs::read(&path)?;
    if declares_scanner_hook(&existing) {
        debug!("{} already declares the gitleaks hook", path.display());
        return Ok(ConfigPlan::AlreadyConfigured { path });
    }

    let backup_path = backup_path(&path, now);
    Ok(ConfigPlan::Replace {
        path,
        backup_path,
        content: render_config(scanner_version),
    })
}

/// Perform the file changes of `plan`. Does not run the install command.
///
/// # Errors
///
/// Returns [`SecscanError::Io`] if the rename or the write fails. A failed
/// write after a successful rename leaves the backup in place.
pub fn apply_plan(plan: &ConfigPlan) -> Result<(), SecscanError> {
    match plan {
        ConfigPlan::Create { path, content } => {
            fs::write(path, content)?;
            info!("Wrote {}", path.display());
        }
        ConfigPlan::AlreadyConfigured { .. } => {}
        ConfigPlan::Replace {
            path,
            backup_path,
            content,
        } => {
            fs::rename(path, backup_path)?;
            info!("Existing config moved to {}", backup_path.display());
            fs::write(path, content)?;
            info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// The hook registration command.
pub const INSTALL_COMMAND: [&str; 2] = ["pre-commit", "install"];

/// Register the hooks with `pre-commit install` in `root`.
///
/// # Errors
///
/// Returns [`SecscanError::Io`] if the command cannot be spawned and
/// [`SecscanError::Subprocess`] if it exits non-zero.
pub fn install_hooks(runner: &dyn CommandRunner, root: &Path) -> Result<String, SecscanError> {
    let [program, args @ ..] = INSTALL_COMMAND;
    let output = runner.run(program, &args, root)?;

    if !output.success() {
        return Err(SecscanError::Subprocess {
            command: INSTALL_COMMAND.join(" "),
            code: output.code,
            stderr: output.stderr,
        });
    }

    debug!("pre-commit install: {}", output.stdout.trim());
    Ok(output.stdout.trim().to_string())
}
