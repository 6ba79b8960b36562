//! Handler for `secscan --setup` and `secscan --dry-run`.

use chrono::Utc;
use secscan_core::hook_config::{ConfigPlan, CONFIG_FILE_NAME};
use secscan_core::tools::{GITLEAKS, PRE_COMMIT};
use secscan_core::{run_setup, CommandRunner, RunMode, SecscanError, SetupOptions, SetupReport};

use crate::output::Reporter;

/// Run the setup and report the outcome.
///
/// Returns `true` on success or a completed dry run, `false` on any failure.
pub fn run_setup_command(
    options: &SetupOptions,
    runner: &dyn CommandRunner,
    reporter: &mut Reporter,
) -> bool {
    match run_setup(options, runner, Utc::now()) {
        Ok(report) => {
            match report.mode {
                RunMode::DryRun => report_dry_run(&report, reporter),
                RunMode::Apply => report_applied(&report, reporter),
            }
            true
        }
        Err(e) => {
            report_error(&e, reporter);
            false
        }
    }
}

fn report_dry_run(report: &SetupReport, reporter: &mut Reporter) {
    for line in report.plan.describe() {
        match line.split_once('\n') {
            Some((head, body)) => reporter.info_with_details(&format!("[dry-run] {head}"), body),
            None => reporter.info(&format!("[dry-run] {line}")),
        }
    }
}

fn report_applied(report: &SetupReport, reporter: &mut Reporter) {
    match &report.plan {
        ConfigPlan::AlreadyConfigured { .. } => {
            reporter.info(&format!(
                "Repository already configured with gitleaks rev {}; only installing hooks.",
                report.scanner.version
            ));
            reporter.success("pre-commit hooks installed");
            return;
        }
        ConfigPlan::Replace {
            path, backup_path, ..
        } => {
            reporter.info(&format!(
                "Existing config moved to {}",
                backup_path.display()
            ));
            reporter.success(&format!("Wrote {}", path.display()));
        }
        ConfigPlan::Create { path, .. } => {
            reporter.success(&format!("Wrote {}", path.display()));
        }
    }

    reporter.success("pre-commit hooks installed");
    reporter.success_with_details(
        "Setup complete!",
        &format!(
            "- Gitleaks version: {}\n\
             - pre-commit version: {}\n\
             - Config file: {CONFIG_FILE_NAME}\n\
             \n\
             Commits in this repo will now be scanned for secrets automatically.",
            report.scanner.version, report.hook_manager.version
        ),
    );
}

fn report_error(err: &SecscanError, reporter: &mut Reporter) {
    match err {
        SecscanError::NotRepoRoot { .. } => {
            reporter.error(
                "Not at a Git repository top-level. Run this command from the repository root.",
            );
        }
        SecscanError::ToolsMissing {
            scanner,
            hook_manager,
        } => {
            reporter.error("Missing required tools or versions could not be determined.");
            for (status, spec) in [(scanner, GITLEAKS), (hook_manager, PRE_COMMIT)] {
                if status.installed {
                    reporter.info(&format!("Found {status}"));
                } else {
                    reporter.warning(&format!(
                        "{status}. Install {} via: {}\n    More info: {}",
                        spec.name, spec.install_hint, spec.homepage
                    ));
                }
            }
        }
        SecscanError::Subprocess { .. } => {
            reporter.error(&format!("Failed to install hooks: {err}"));
        }
        SecscanError::Io(e) => {
            reporter.error(&format!("Setup failed: {e}"));
        }
    }
}
