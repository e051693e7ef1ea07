//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Static HTML dashboards from Google Test XML results
#[derive(Parser, Debug)]
#[command(name = "gtest-report", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (YAML), layered over ~/.config/gtest-report/config.yaml
    #[arg(long, global = true, env = "GTEST_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one report per test stage plus index.html
    Generate(GenerateArgs),

    /// Generate a single report from files or directories
    Report(ReportArgs),

    /// Print aggregate numbers for result files
    Summary(SummaryArgs),

    /// Summarize a static-analysis report per component
    Sa(SaArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the generate command.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Project name shown in titles
    pub project: String,

    /// Input root; stage results are read from <INPUT_DIR>/<CODE>/*.xml
    pub input_dir: PathBuf,

    /// Output directory (created if missing)
    pub output_dir: PathBuf,

    /// Git branch name
    #[arg(long)]
    pub branch: Option<String>,

    /// Release tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Commit ID
    #[arg(long)]
    pub commit: Option<String>,

    /// CI build number
    #[arg(long)]
    pub build: Option<String>,

    /// Stage list, e.g. "UT,CT=Component Test" (overrides config)
    #[arg(long)]
    pub categories: Option<String>,

    /// Stage codes that get a suite rollup section, comma-separated
    #[arg(long)]
    pub suite_rollup: Option<String>,

    /// Directory copied to <OUTPUT_DIR>/<resource prefix> (icons, scripts)
    #[arg(long)]
    pub resources: Option<PathBuf>,
}

/// Arguments for the report command.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Result files or directories containing *.xml
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Project name shown in the title
    #[arg(long, short = 'p')]
    pub project: String,

    /// Report name shown in the title
    #[arg(long, short = 'n', default_value = "Test Report")]
    pub name: String,

    /// Output HTML file
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Include the suite rollup section
    #[arg(long)]
    pub by_suite: bool,
}

/// Arguments for the summary command.
#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    /// Result files or directories containing *.xml
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Include per-suite outcomes
    #[arg(long)]
    pub by_suite: bool,

    /// Print cases as CSV instead of a summary
    #[arg(long, conflicts_with = "by_suite")]
    pub csv: bool,

    /// CSV fields (file,suite,case,full_name,status,elapsed,detail)
    #[arg(long, requires = "csv")]
    pub fields: Option<String>,

    /// Only export cases with this status (success, failed, skipped)
    #[arg(long, requires = "csv")]
    pub status: Option<String>,
}

/// Arguments for the sa command.
#[derive(Args, Debug, Clone, Default)]
pub struct SaArgs {
    /// Static-analysis XML report
    pub report_xml: PathBuf,

    /// Output directory for SA_Report_<component>.html files
    pub output_dir: PathBuf,

    /// Path segment whose successor names the component (default: para-api)
    #[arg(long)]
    pub anchor: Option<String>,
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate() {
        let cli = Cli::try_parse_from([
            "gtest-report",
            "-vv",
            "generate",
            "Demo",
            "in",
            "out",
            "--branch",
            "main",
            "--build",
            "42",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.project, "Demo");
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.branch.as_deref(), Some("main"));
        assert_eq!(args.tag, None);
    }

    #[test]
    fn parse_summary_csv_flags() {
        let cli = Cli::try_parse_from([
            "gtest-report",
            "summary",
            "a.xml",
            "dir",
            "--csv",
            "--fields",
            "case,status",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.inputs.len(), 2);
        assert!(args.csv);

        assert!(Cli::try_parse_from(["gtest-report", "summary", "a.xml", "--fields", "case"]).is_err());
        assert!(Cli::try_parse_from(["gtest-report", "summary"]).is_err());
    }

    #[test]
    fn parse_report_requires_output() {
        assert!(Cli::try_parse_from(["gtest-report", "report", "-p", "P", "a.xml"]).is_err());
        let cli =
            Cli::try_parse_from(["gtest-report", "report", "-p", "P", "-o", "r.html", "a.xml"]).unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.name, "Test Report");
    }
}
