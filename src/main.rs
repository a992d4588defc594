use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wikijs_exporter::cli::commands;
use wikijs_exporter::cli::commands::analyze::AnalyzeArgs;
use wikijs_exporter::cli::commands::export::ExportArgs;
use wikijs_exporter::config::{ConfigLoader, DEFAULT_CONFIG_FILE, ExportFormat};

/// Parse export format from string
fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "wikijs")]
#[command(
    version,
    about = "Export Wiki.js content to local files and analyze it against a style guide"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Test connectivity and authentication against the Wiki.js API
    Test {
        #[arg(long, help = "Base URL of the Wiki.js instance")]
        url: Option<String>,
        #[arg(long, help = "API token with read permissions")]
        token: Option<String>,
    },

    /// Fetch page metadata (without content) and save it as JSON
    List {
        #[arg(long, help = "Base URL of the Wiki.js instance")]
        url: Option<String>,
        #[arg(long, help = "API token with read permissions")]
        token: Option<String>,
        #[arg(long, short, default_value = "wiki_pages.json", help = "Output file")]
        output: PathBuf,
    },

    /// Export pages with content to local files
    Export {
        #[arg(long, help = "Base URL of the Wiki.js instance")]
        url: Option<String>,
        #[arg(long, help = "API token with read permissions")]
        token: Option<String>,
        #[arg(long, short, help = "Output file or directory (default: from config)")]
        output: Option<String>,
        #[arg(long, help = "Delay between page fetches in seconds")]
        delay: Option<f64>,
        #[arg(long, value_parser = parse_format, help = "Output format: json, markdown, html")]
        format: Option<ExportFormat>,
        #[arg(long, help = "Export everything, ignoring previous sync state")]
        full: bool,
        #[arg(long, help = "Force a full export even with existing sync state")]
        force_full: bool,
        #[arg(
            long,
            help = "Clear stored content hashes and re-derive them from disk"
        )]
        reset_hashes: bool,
        #[arg(long, help = "File holding sync state between runs")]
        metadata_file: Option<PathBuf>,
    },

    /// Analyze exported content against a style guide with Gemini
    Analyze {
        #[arg(long, help = "Google Gemini API key")]
        api_key: Option<String>,
        #[arg(long, help = "List available Gemini models and exit")]
        list_models: bool,
        #[arg(long, short, help = "Directory of exported files to analyze")]
        input: Option<PathBuf>,
        #[arg(long, help = "Path to the style guide file")]
        style_guide: Option<PathBuf>,
        #[arg(long, help = "Path to the AI-specific instructions file")]
        ai_guide: Option<PathBuf>,
        #[arg(
            long,
            short,
            default_value = "analysis_results.json",
            help = "Output JSON file"
        )]
        output: PathBuf,
        #[arg(
            long,
            default_value = "analysis_report.html",
            help = "Output HTML report"
        )]
        report: PathBuf,
    },

    /// Render an HTML report from saved analysis results
    Report {
        #[arg(
            long,
            short,
            default_value = "analysis_results.json",
            help = "Analysis results file"
        )]
        input: PathBuf,
        #[arg(
            long,
            short,
            default_value = "analysis_report.html",
            help = "Output HTML report"
        )]
        output: PathBuf,
    },

    /// Create a sample configuration and supporting files
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Path for the configuration file")]
        path: PathBuf,
        #[arg(long, short, help = "Overwrite existing files")]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Test { url, token } => {
            let config = ConfigLoader::load(config_file)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::test::run(&config, url, token))?;
        }
        Commands::List { url, token, output } => {
            let config = ConfigLoader::load(config_file)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::list::run(&config, url, token, &output))?;
        }
        Commands::Export {
            url,
            token,
            output,
            delay,
            format,
            full,
            force_full,
            reset_hashes,
            metadata_file,
        } => {
            let config = ConfigLoader::load(config_file)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::export::run(
                &config,
                ExportArgs {
                    url,
                    token,
                    output,
                    delay,
                    format,
                    incremental: !full,
                    force_full,
                    reset_hashes,
                    metadata_file,
                },
            ))?;
        }
        Commands::Analyze {
            api_key,
            list_models,
            input,
            style_guide,
            ai_guide,
            output,
            report,
        } => {
            let config = ConfigLoader::load(config_file)?;
            let rt = Runtime::new()?;
            if list_models {
                rt.block_on(commands::analyze::list_models(&config, api_key))?;
                return Ok(());
            }
            rt.block_on(commands::analyze::run(
                &config,
                AnalyzeArgs {
                    api_key,
                    input,
                    style_guide,
                    ai_guide,
                    output,
                    report,
                },
            ))?;
        }
        Commands::Report { input, output } => {
            commands::report::run(&input, &output)?;
        }
        Commands::Init { path, force } => {
            commands::init::run(&path, force)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                commands::config::show(config_file, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path(config_file)?;
            }
        },
    }

    Ok(())
}
