use std::path::PathBuf;
use thiserror::Error;

use crate::tools::ToolStatus;

#[derive(Debug, Error)]
pub enum SecscanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not at a Git repository top-level: {}", .cwd.display())]
    NotRepoRoot { cwd: PathBuf },

    #[error("Missing required tools or versions could not be determined ({scanner}, {hook_manager})")]
    ToolsMissing {
        scanner: ToolStatus,
        hook_manager: ToolStatus,
    },

    #[error("`{command}` failed ({}){}", exit_label(.code), stderr_suffix(.stderr))]
    Subprocess {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
