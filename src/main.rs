use clap::Parser;
use gtest_report::cli::commands::{self, OutputContext};
use gtest_report::cli::{Cli, Commands};
use gtest_report::config::{self, CliOverrides};
use gtest_report::logging::init_logging;
use gtest_report::{ReportError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let ctx = OutputContext {
        json: cli.json,
        quiet: cli.quiet,
        use_color: !cli.json && io::stdout().is_terminal(),
    };

    if let Err(e) = run(&cli, ctx) {
        handle_error(&e, cli.json);
    }
}

fn run(cli: &Cli, ctx: OutputContext) -> gtest_report::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return commands::completions::execute(args);
    }

    let config = config::load_config(cli.config.as_deref(), &build_cli_overrides(cli))?;

    match &cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &config, ctx),
        Commands::Report(args) => commands::report::execute(args, &config, ctx),
        Commands::Summary(args) => commands::summary::execute(args, &config, ctx),
        Commands::Sa(args) => commands::sa::execute(args, &config, ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs a human-readable error, colored if stderr is a terminal.
fn handle_error(err: &ReportError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    if json_mode || !io::stdout().is_terminal() {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        eprintln!("{}", structured.to_human(io::stderr().is_terminal()));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> CliOverrides {
    match &cli.command {
        Commands::Generate(args) => CliOverrides {
            categories: args.categories.clone(),
            suite_rollup: args.suite_rollup.clone(),
            resources_dir: args.resources.clone(),
            sa_anchor: None,
        },
        Commands::Sa(args) => CliOverrides {
            sa_anchor: args.anchor.clone(),
            ..CliOverrides::default()
        },
        _ => CliOverrides::default(),
    }
}
