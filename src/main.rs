use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reference_format::batch::{process_titles_to_csv, process_titles_to_docx};
use reference_format::config::{find_config_file, load_config, Config, LOCAL_CONFIG_FILE};
use reference_format::sources::{CrossRefSource, MetadataSource};
use reference_format::ui::{self, Status, TitleProgress};
use reference_format::utils::{compose_reference, AuthorStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reference Format - APA 7th edition references from publication titles
#[derive(Parser, Debug)]
#[command(name = "reference-format")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up publication titles on CrossRef and write APA 7th edition references", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// How author names are joined
    #[arg(long, value_enum, global = true)]
    author_style: Option<AuthorStyleArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Author list policy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum AuthorStyleArg {
    /// "A & B", "A, B, & C"
    Apa,
    /// "A, B, C"
    Flat,
}

impl From<AuthorStyleArg> for AuthorStyle {
    fn from(arg: AuthorStyleArg) -> Self {
        match arg {
            AuthorStyleArg::Apa => AuthorStyle::Apa,
            AuthorStyleArg::Flat => AuthorStyle::Flat,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write references to a CSV file (input columns plus an "APA Reference" column)
    Csv {
        /// Input CSV with a title column (default: titles.csv)
        input: Option<PathBuf>,

        /// Output CSV (default: apa_references.csv)
        output: Option<PathBuf>,

        /// Name of the title column
        #[arg(long)]
        title_column: Option<String>,
    },

    /// Write references to a Word document
    Docx {
        /// Input CSV with a title column (default: titles.csv)
        input: Option<PathBuf>,

        /// Output document (default: apa_references.docx)
        output: Option<PathBuf>,

        /// Name of the title column
        #[arg(long)]
        title_column: Option<String>,
    },

    /// Look up a single title and print its reference
    Cite {
        /// Publication title
        title: String,

        /// Print the structured reference as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Destination (default: ./reference-format.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("reference_format={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    if let Some(timeout) = cli.timeout {
        config.crossref.timeout_secs = timeout;
    }
    if let Some(style) = cli.author_style {
        config.output.author_style = style.into();
    }

    match cli.command {
        Some(Commands::Csv {
            input,
            output,
            title_column,
        }) => {
            let input = input.unwrap_or_else(|| config.output.input_csv.clone());
            let output = output.unwrap_or_else(|| config.output.output_csv.clone());
            let title_column = title_column.unwrap_or_else(|| config.output.title_column.clone());
            run_csv(&config, &input, &output, &title_column, cli.quiet).await?;
        }

        Some(Commands::Docx {
            input,
            output,
            title_column,
        }) => {
            let input = input.unwrap_or_else(|| config.output.input_csv.clone());
            let output = output.unwrap_or_else(|| config.output.output_docx.clone());
            let title_column = title_column.unwrap_or_else(|| config.output.title_column.clone());
            run_docx(&config, &input, &output, &title_column, cli.quiet).await?;
        }

        Some(Commands::Cite { title, json }) => {
            let source = CrossRefSource::from_config(&config.crossref)?;
            let result = source.resolve(&title).await;
            let reference = compose_reference(&result, config.output.author_style);

            if json {
                println!("{}", serde_json::to_string_pretty(&reference)?);
            } else {
                println!("{}", reference);
            }
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Init { path, force } => {
                let path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                Config::default().save(&path)?;
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Wrote default configuration to {}", path.display()),
                    );
                }
            }
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },

        // No subcommand: the CSV export with default file names
        None => {
            let input = config.output.input_csv.clone();
            let output = config.output.output_csv.clone();
            let title_column = config.output.title_column.clone();
            run_csv(&config, &input, &output, &title_column, cli.quiet).await?;
        }
    }

    Ok(())
}

async fn run_csv(
    config: &Config,
    input: &Path,
    output: &Path,
    title_column: &str,
    quiet: bool,
) -> Result<()> {
    let source = CrossRefSource::from_config(&config.crossref)?;
    let progress = TitleProgress::new(count_rows(input), !quiet && ui::is_terminal());

    let summary = process_titles_to_csv(
        &source,
        input,
        output,
        title_column,
        &config.output.reference_column,
        config.output.author_style,
        |done, title| progress.advance(done, title),
    )
    .await;
    progress.finish();

    let summary = summary.with_context(|| format!("Failed to process {}", input.display()))?;
    if !quiet {
        ui::print_summary(&summary);
        println!("APA formatted references saved to {}", output.display());
    }
    Ok(())
}

async fn run_docx(
    config: &Config,
    input: &Path,
    output: &Path,
    title_column: &str,
    quiet: bool,
) -> Result<()> {
    let source = CrossRefSource::from_config(&config.crossref)?;
    let progress = TitleProgress::new(count_rows(input), !quiet && ui::is_terminal());

    let summary = process_titles_to_docx(
        &source,
        input,
        output,
        title_column,
        config.output.author_style,
        |done, title| progress.advance(done, title),
    )
    .await;
    progress.finish();

    let summary = summary.with_context(|| format!("Failed to process {}", input.display()))?;
    if !quiet {
        ui::print_summary(&summary);
        println!("APA formatted references saved to {}", output.display());
    }
    Ok(())
}

/// Data rows in a CSV file, for sizing the progress bar; 0 if unreadable
fn count_rows(path: &Path) -> usize {
    csv::Reader::from_path(path)
        .map(|mut reader| reader.records().count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["reference-format"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.timeout.is_none());
        assert!(cli.author_style.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["reference-format", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["reference-format", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::parse_from([
            "reference-format",
            "--timeout",
            "5",
            "--author-style",
            "flat",
            "--config",
            "/path/to/config.toml",
            "-q",
        ]);
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.author_style, Some(AuthorStyleArg::Flat));
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
        assert!(cli.quiet);
        assert_eq!(AuthorStyle::from(AuthorStyleArg::Flat), AuthorStyle::Flat);
    }

    #[test]
    fn test_cli_csv_command() {
        let cli = Cli::parse_from(["reference-format", "csv", "in.csv", "out.csv"]);
        match &cli.command {
            Some(Commands::Csv { input, output, .. }) => {
                assert_eq!(input.as_deref(), Some(Path::new("in.csv")));
                assert_eq!(output.as_deref(), Some(Path::new("out.csv")));
            }
            _ => panic!("Expected Csv command"),
        }
    }

    #[test]
    fn test_cli_docx_defaults() {
        let cli = Cli::parse_from(["reference-format", "docx"]);
        match &cli.command {
            Some(Commands::Docx {
                input,
                output,
                title_column,
            }) => {
                assert!(input.is_none());
                assert!(output.is_none());
                assert!(title_column.is_none());
            }
            _ => panic!("Expected Docx command"),
        }
    }

    #[test]
    fn test_cli_cite_command() {
        let cli = Cli::parse_from(["reference-format", "cite", "Attention is all you need", "--json"]);
        match &cli.command {
            Some(Commands::Cite { title, json }) => {
                assert_eq!(title, "Attention is all you need");
                assert!(*json);
            }
            _ => panic!("Expected Cite command"),
        }
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["reference-format", "config", "init", "my.toml", "--force"]);
        match &cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Init { path, force },
            }) => {
                assert_eq!(path.as_deref(), Some(Path::new("my.toml")));
                assert!(*force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_count_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        std::fs::write(&path, "Title\nA\nB\nC\n").unwrap();
        assert_eq!(count_rows(&path), 3);
        assert_eq!(count_rows(&dir.path().join("missing.csv")), 0);
    }
}
