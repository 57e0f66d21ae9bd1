use clap::{CommandFactory, Parser};
use icp_journal::config::{CliConfig, Config, ReportConfig};
use icp_journal::core::constants::{defaults, output_formats};
use icp_journal::logging;
use icp_journal::pipeline::generate_report_from_path;
use icp_journal::ui::completion::print_completions;
use icp_journal::ui::output;
use icp_journal::ui::{Cli, Commands, ProgressReporter, cli_to_config};

use std::path::{Path, PathBuf};

fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    let Some(input) = cli.input.as_deref() else {
        eprintln!("Error: No input CSV provided");
        eprintln!("\nFor more information, try '--help'.");
        std::process::exit(1);
    };

    match run_journal_logic(&cli, input) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle completion commands and return exit code if a completion command was processed
pub fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Some(Commands::CompletionGenerate { shell }) => {
            let mut app = Cli::command();
            print_completions(shell, &mut app);
            Some(0)
        }
        None => None,
    }
}

/// Main journal generation logic extracted from main() for testing
pub fn run_journal_logic(cli: &Cli, input: &str) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);

    let report_config = build_report_config(&config)?;
    logging::log_config_info(&report_config);

    let output_path = resolve_output_path(input, cli_config.output_path.as_deref());
    if output_path.exists() {
        logging::log_warning(&format!("Overwriting {}", output_path.display()));
    }

    let mut progress = create_progress_reporter(&output_settings);
    if let Some(ref mut progress) = progress {
        progress.stage(&format!("Analyzing {input}"));
    }

    let report = generate_report_from_path(input, &report_config).inspect_err(|e| {
        finalize_progress_reporter(progress.as_ref(), None);
        logging::log_error(&format!("Could not generate a journal from '{input}'"), Some(e));
    })?;

    if let Some(ref mut progress) = progress {
        progress.stage(&format!("Writing {}", output_path.display()));
    }
    report.document.write_to(&output_path).inspect_err(|e| {
        finalize_progress_reporter(progress.as_ref(), None);
        logging::log_error("Could not write the journal", Some(e));
    })?;
    logging::log_report_written(
        &output_path,
        report.document.len(),
        report.document.charts().len(),
    );
    finalize_progress_reporter(progress.as_ref(), Some("Journal ready"));

    if !output_settings.quiet {
        output::display_summary(
            &report,
            &output_path,
            &output_settings.output_format,
            &report_config,
        )?;
    }

    Ok(0)
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    Ok(config)
}

/// Freeze the merged config, stamping the generation time when asked to
pub fn build_report_config(config: &Config) -> Result<ReportConfig, Box<dyn std::error::Error>> {
    let report_config = config.to_report_config()?;
    if config.include_timestamp.unwrap_or(false) {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        return Ok(report_config.with_generated_at(now));
    }
    Ok(report_config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config
        .output_format
        .as_deref()
        .unwrap_or(output_formats::DEFAULT)
        .to_string();
    let show_progress = !quiet && !cli_config.no_progress;

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Explicit output path, or `<stem>_journal.html` next to the input
pub fn resolve_output_path(input: &str, explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    let input = Path::new(input);
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    input.with_file_name(format!("{stem}{}", defaults::OUTPUT_SUFFIX))
}

/// Create progress reporter if needed
pub fn create_progress_reporter(output_settings: &OutputSettings) -> Option<ProgressReporter> {
    if output_settings.show_progress && output_settings.output_format == output_formats::TEXT {
        Some(ProgressReporter::new(true))
    } else {
        None
    }
}

/// Stop the spinner, leaving `message` behind when given
pub fn finalize_progress_reporter(progress: Option<&ProgressReporter>, message: Option<&str>) {
    if let Some(progress) = progress {
        match message {
            Some(message) => progress.finish(message),
            None => progress.finish_and_clear(),
        }
    }
}
