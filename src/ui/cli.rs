// Command-line interface definitions and parsing for icp-journal

use crate::config::CliConfig;
use crate::core::constants::{degenerate, output_formats};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CSV file with customer records
    pub input: Option<String>,

    // Report Options
    /// Where to write the journal (default: <input>_journal.html)
    #[arg(short = 'o', long, value_name = "PATH", help_heading = "Report Options")]
    pub output: Option<String>,

    /// Report title
    #[arg(long, value_name = "TEXT", help_heading = "Report Options")]
    pub title: Option<String>,

    /// Entries listed in top countries/industries (default: 5)
    #[arg(long, value_name = "COUNT", help_heading = "Report Options")]
    pub top_n: Option<usize>,

    /// Histogram bins for numeric distributions (default: 8)
    #[arg(long, value_name = "COUNT", help_heading = "Report Options")]
    pub bins: Option<usize>,

    /// What to do with charts that have too little data
    #[arg(long, value_name = "POLICY", value_parser = degenerate::ALL, help_heading = "Report Options")]
    pub degenerate: Option<String>,

    /// Stamp the journal with the generation time
    #[arg(long, help_heading = "Report Options")]
    pub timestamp: bool,

    // Output & Verbosity
    /// Suppress summary and progress output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Summary format (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Disable the progress spinner
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    #[command(name = "completion-generate", arg_required_else_help = true)]
    CompletionGenerate {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Convert parsed CLI arguments into a CliConfig
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        title: cli.title.clone(),
        top_n: cli.top_n,
        histogram_bins: cli.bins,
        degenerate_charts: cli.degenerate.clone(),
        include_timestamp: cli.timestamp,
        output_path: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        no_progress: cli.no_progress,
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}
