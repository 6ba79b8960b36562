//! Process execution seam.
//!
//! Everything that touches an external program goes through [`CommandRunner`]
//! so the repository check, the tool probe and hook installation can be
//! exercised in tests without real binaries on the search path.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, trace};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs.
pub trait CommandRunner {
    /// Locate `program` on the search path.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Run `program` with `args` in `cwd` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the process could not be started. A
    /// process that starts and exits non-zero is *not* an error here; check
    /// [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command` and the process `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn which(&self, program: &str) -> Option<PathBuf> {
        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    }

    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> io::Result<CommandOutput> {
        debug!("Running `{} {}` in {}", program, args.join(" "), cwd.display());

        let output = Command::new(program).args(args).current_dir(cwd).output()?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!("`{program}` exited with {:?}", result.code);
        Ok(result)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted [`CommandRunner`] for unit tests.

    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeRunner {
        installed: HashMap<String, PathBuf>,
        responses: HashMap<String, io::Result<CommandOutput>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark `program` as present on the search path.
        pub fn install(mut self, program: &str) -> Self {
            self.installed
                .insert(program.to_string(), PathBuf::from("/fake/bin").join(program));
            self
        }

        /// Script the result of running `command` (program and args joined by spaces).
        pub fn respond(mut self, command: &str, code: i32, stdout: &str) -> Self {
            self.responses.insert(
                command.to_string(),
                Ok(CommandOutput {
                    code: Some(code),
                    stdout: stdout.to_string(),
                    stderr: if code == 0 { String::new() } else { "fake failure".into() },
                }),
            );
            self
        }

        /// Script a spawn failure for `command`.
        pub fn fail_spawn(mut self, command: &str) -> Self {
            self.responses.insert(
                command.to_string(),
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "cannot spawn")),
            );
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn which(&self, program: &str) -> Option<PathBuf> {
            self.installed.get(program).cloned()
        }

        fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> io::Result<CommandOutput> {
            let mut parts = vec![program];
            parts.extend_from_slice(args);
            let command = parts.join(" ");
            self.calls.borrow_mut().push(command.clone());

            match self.responses.get(&command) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(e)) => Err(io::Error::new(e.kind(), e.to_string())),
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no scripted response for `{command}`"),
                )),
            }
        }
    }
}
