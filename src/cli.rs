use crate::detector::Thresholds;
use crate::report::Format;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vibector")]
#[command(about = "Flags commits whose size, speed or spacing suggests tool-generated code")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to config file (defaults to ./.vibector.toml when present)"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository's history for suspicious commits
    Analyze(AnalyzeArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a commented sample configuration
    Init {
        #[arg(long, help = "Where to write the file", default_value = crate::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Branch to analyze (defaults to HEAD)")]
    pub branch: Option<String>,

    #[arg(long, help = "Maximum number of commits to walk (0 = unlimited)")]
    pub max_depth: Option<usize>,

    #[arg(long, value_enum, help = "Report format (inferred from --output when omitted)")]
    pub format: Option<Format>,

    #[arg(long, short, help = "Write the report to this file instead of stdout")]
    pub output: Option<PathBuf>,

    #[arg(long = "exclude", value_name = "GLOB", help = "Exclude matching files from detection (repeatable)")]
    pub exclude: Vec<String>,

    #[clap(flatten)]
    pub thresholds: ThresholdArgs,
}

#[derive(Args, Clone, Default)]
pub struct ThresholdArgs {
    #[arg(long, help = "Flag commits adding more lines than this (0 = disabled)")]
    pub suspicious_additions: Option<i64>,

    #[arg(long, help = "Flag commits deleting more lines than this (0 = disabled)")]
    pub suspicious_deletions: Option<i64>,

    #[arg(long, help = "Maximum additions per minute (0 = disabled)")]
    pub max_additions_per_min: Option<f64>,

    #[arg(long, help = "Maximum deletions per minute (0 = disabled)")]
    pub max_deletions_per_min: Option<f64>,

    #[arg(long, help = "Minimum seconds between commits (0 = disabled)")]
    pub min_time_delta_seconds: Option<i64>,
}

impl ThresholdArgs {
    /// Overlays the flags that were given onto `base`.
    pub fn apply(&self, base: &mut Thresholds) {
        if let Some(v) = self.suspicious_additions {
            base.suspicious_additions = v;
        }
        if let Some(v) = self.suspicious_deletions {
            base.suspicious_deletions = v;
        }
        if let Some(v) = self.max_additions_per_min {
            base.max_additions_per_min = v;
        }
        if let Some(v) = self.max_deletions_per_min {
            base.max_deletions_per_min = v;
        }
        if let Some(v) = self.min_time_delta_seconds {
            base.min_time_delta_seconds = v;
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => crate::analyze::exec(self.config.as_deref(), args),
            Commands::Config(ConfigCommand::Init { path }) => crate::init::exec(&path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "vibector",
            "--config",
            "custom.toml",
            "analyze",
            "--repo",
            "/tmp/r",
            "--max-depth",
            "10",
            "--format",
            "json",
            "--exclude",
            "*.lock",
            "--exclude",
            "*.log",
            "--max-additions-per-min",
            "12.5",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.max_depth, Some(10));
        assert_eq!(args.format, Some(Format::Json));
        assert_eq!(args.exclude, vec!["*.lock".to_string(), "*.log".to_string()]);

        let mut t = Thresholds::default();
        args.thresholds.apply(&mut t);
        assert_eq!(t.max_additions_per_min, 12.5);
        assert_eq!(t.suspicious_additions, 500);
    }

    #[test]
    fn config_init_defaults_path() {
        let cli = Cli::try_parse_from(["vibector", "config", "init"]).unwrap();
        let Commands::Config(ConfigCommand::Init { path }) = cli.command else {
            panic!("expected config init");
        };
        assert_eq!(path, PathBuf::from(".vibector.toml"));
    }
}
