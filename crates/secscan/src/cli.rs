use clap::{ArgAction, ArgGroup, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "secscan",
    version,
    about = "Configure gitleaks & pre-commit on the current repo for secret scanning",
    group(ArgGroup::new("action").required(true).args(["setup", "dry_run"]))
)]
pub struct Cli {
    /// Set up the repository to detect secrets using gitleaks via pre-commit
    #[arg(long)]
    pub setup: bool,

    /// Simulate setup actions without making any changes
    #[arg(long)]
    pub dry_run: bool,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,

    /// Color mode
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_and_dry_run_are_exclusive() {
        assert!(Cli::try_parse_from(["secscan", "--setup", "--dry-run"]).is_err());
    }

    #[test]
    fn one_action_is_required() {
        assert!(Cli::try_parse_from(["secscan"]).is_err());
        assert!(Cli::try_parse_from(["secscan", "--json"]).is_err());
    }

    #[test]
    fn parses_dry_run_with_verbosity() {
        let cli = Cli::try_parse_from(["secscan", "--dry-run", "-vv"]).unwrap();
        assert!(cli.dry_run);
        assert!(!cli.setup);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn default_log_level_is_warn() {
        let cli = Cli::try_parse_from(["secscan", "--setup"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
