//! Detection of the external tools the setup depends on.
//!
//! Each tool is described by a [`ToolSpec`]: the executable name, the
//! arguments of its version query, and which whitespace-separated token of
//! the output carries the version. [`probe_tool`] turns a `ToolSpec` into a
//! [`ToolProbe`], and [`probe_tools`] does that for both required tools.
//!
//! Both tools are always probed independently. A missing scanner does not
//! hide the state of the hook manager.

use std::fmt;
use std::path::Path;

use log::{debug, info};

use crate::exec::CommandRunner;

/// How to find and query one external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub version_args: &'static [&'static str],
    /// Zero-based index of the version token in the version query output.
    pub version_token: usize,
    /// Install hint shown when the tool is missing.
    pub install_hint: &'static str,
    pub homepage: &'static str,
}

/// The secret scanner. `gitleaks version` prints e.g. `8.18.0` or `v8.18.0`.
pub const GITLEAKS: ToolSpec = ToolSpec {
    name: "gitleaks",
    version_args: &["version"],
    version_token: 0,
    install_hint: "brew install gitleaks",
    homepage: "https://github.com/gitleaks/gitleaks",
};

/// The hook manager. `pre-commit --version` prints e.g. `pre-commit 3.0.0`.
pub const PRE_COMMIT: ToolSpec = ToolSpec {
    name: "pre-commit",
    version_args: &["--version"],
    version_token: 1,
    install_hint: "brew install pre-commit",
    homepage: "https://pre-commit.com/",
};

/// Outcome of probing a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolProbe {
    /// On the search path and reported a version.
    Available { version: String },
    /// Not on the search path.
    Unavailable,
    /// On the search path but the version query failed or was unreadable.
    Broken { reason: String },
}

/// Installation state of one tool as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub installed: bool,
    /// Empty unless `installed`.
    pub version: String,
}

impl ToolStatus {
    pub fn from_probe(name: &str, probe: &ToolProbe) -> Self {
        match probe {
            ToolProbe::Available { version } => Self {
                name: name.to_string(),
                installed: true,
                version: version.clone(),
            },
            ToolProbe::Unavailable | ToolProbe::Broken { .. } => Self {
                name: name.to_string(),
                installed: false,
                version: String::new(),
            },
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.installed {
            write!(f, "{} {}", self.name, self.version)
        } else {
            write!(f, "{} not installed", self.name)
        }
    }
}

/// Probe results for both required tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub scanner: ToolStatus,
    pub hook_manager: ToolStatus,
    pub scanner_probe: ToolProbe,
    pub hook_manager_probe: ToolProbe,
}

impl ToolReport {
    /// True when both tools are installed with a known version.
    pub fn ready(&self) -> bool {
        self.scanner.installed && self.hook_manager.installed
    }
}

/// Extract a version from version-query output.
///
/// Takes the `token`-th whitespace-separated token and strips one leading
/// `v`. Returns `None` if there is no such token or it is empty after
/// stripping.
pub fn parse_version(output: &str, token: usize) -> Option<String> {
    let raw = output.split_whitespace().nth(token)?;
    let version = raw.strip_prefix('v').unwrap_or(raw);
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Probe a single tool.
pub fn probe_tool(runner: &dyn CommandRunner, spec: &ToolSpec, cwd: &Path) -> ToolProbe {
    let Some(path) = runner.which(spec.name) else {
        debug!("{} not found on PATH", spec.name);
        return ToolProbe::Unavailable;
    };
    debug!("Found {} at {}", spec.name, path.display());

    let output = match runner.run(spec.name, spec.version_args, cwd) {
        Ok(o) => o,
        Err(e) => {
            return ToolProbe::Broken {
                reason: format!("failed to run {}: {e}", spec.name),
            }
        }
    };

    if !output.success() {
        return ToolProbe::Broken {
            reason: format!(
                "`{} {}` exited with {:?}",
                spec.name,
                spec.version_args.join(" "),
                output.code
            ),
        };
    }

    match parse_version(&output.stdout, spec.version_token) {
        Some(version) => {
            info!("Detected {} {}", spec.name, version);
            ToolProbe::Available { version }
        }
        None => ToolProbe::Broken {
            reason: format!(
                "could not read a version from `{}` output: {:?}",
                spec.name,
                output.stdout.trim()
            ),
        },
    }
}

/// Probe the secret scanner and the hook manager.
pub fn probe_tools(runner: &dyn CommandRunner, cwd: &Path) -> ToolReport {
    let scanner_probe = probe_tool(runner, &GITLEAKS, cwd);
    let hook_manager_probe = probe_tool(runner, &PRE_COMMIT, cwd);

    ToolReport {
        scanner: ToolStatus::from_probe(GITLEAKS.name, &scanner_probe),
        hook_manager: ToolStatus::from_probe(PRE_COMMIT.name, &hook_manager_probe),
        scanner_probe,
        hook_manager_probe,
    }
}
