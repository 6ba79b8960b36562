//! Repository root detection.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::SecscanError;
use crate::exec::CommandRunner;

/// Ask git for the top-level directory of the repository containing `cwd`.
///
/// Returns `None` if git cannot be run or `cwd` is not inside a work tree.
pub fn git_toplevel(runner: &dyn CommandRunner, cwd: &Path) -> Option<PathBuf> {
    let output = match runner.run("git", &["rev-parse", "--show-toplevel"], cwd) {
        Ok(o) => o,
        Err(e) => {
            debug!("Failed to run git: {e}");
            return None;
        }
    };

    if !output.success() {
        debug!("git rev-parse failed: {}", output.stderr.trim());
        return None;
    }

    let toplevel = output.stdout.trim();
    if toplevel.is_empty() {
        return None;
    }
    Some(PathBuf::from(toplevel))
}

/// Whether `cwd` is exactly the top-level directory of a git repository.
///
/// Both paths are canonicalized before comparison, so symlinked checkouts
/// compare equal to their targets. A subdirectory of a repository is not a
/// root.
pub fn is_repo_root(runner: &dyn CommandRunner, cwd: &Path) -> bool {
    let Some(toplevel) = git_toplevel(runner, cwd) else {
        return false;
    };

    match (cwd.canonicalize(), toplevel.canonicalize()) {
        (Ok(cwd), Ok(top)) => {
            debug!("cwd={} toplevel={}", cwd.display(), top.display());
            cwd == top
        }
        _ => false,
    }
}

/// Require that `cwd` is a repository root, returning its canonical path.
///
/// # Errors
///
/// Returns [`SecscanError::NotRepoRoot`] when [`is_repo_root`] is false.
pub fn require_repo_root(runner: &dyn CommandRunner, cwd: &Path) -> Result<PathBuf, SecscanError> {
    if !is_repo_root(runner, cwd) {
        return Err(SecscanError::NotRepoRoot {
            cwd: cwd.to_path_buf(),
        });
    }
    Ok(cwd.canonicalize()?)
}
