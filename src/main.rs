use clap::{Parser, Subcommand};
use plex_wallpapers::config::{self, ConfigError, Settings};
use plex_wallpapers::output;
use plex_wallpapers::process::{self, EXIT_FATAL};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plex-wallpapers")]
#[command(about = "Generate desktop wallpapers from a Plex movie library")]
#[command(long_about = "\
Generate desktop wallpapers from a Plex movie library

Every movie of the configured library section becomes one wallpaper: its
background art (the \"still\"), center cropped and scaled, with its poster
drawn next to it or over it on either side.

Output directory:

  wallpapers/
  ├── foo (2020).42.jpg        # <title> (<year>).<plex id>.<ext>
  └── bar_baz.7.jpg

A wallpaper is regenerated only when the movie was updated on the server
after the file was written. When a title changes, the file with the old
name is removed.

Exit codes: 0 success, 2 finished with warnings, 1 fatal error.

Run 'plex-wallpapers gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "plex-wallpapers.toml", global = true)]
    config: PathBuf,

    /// Output directory (overrides output.directory)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Plex token (overrides server.token)
    #[arg(long, env = "PLEX_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Report what would be written and deleted without touching any file
    #[arg(long, global = true)]
    simulated: bool,

    /// Read the library listing from a JSON file instead of the server
    #[arg(long, global = true)]
    catalog_file: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate, refresh and clean up wallpapers
    Run,
    /// Show which library items would be processed, without image work
    Check,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file, then command-line overrides, then validation.
fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(dir) = &cli.output {
        config.output.directory = Some(dir.clone());
    }
    if let Some(token) = &cli.token {
        config.server.token = Some(token.clone());
    }
    if cli.simulated {
        config.output.simulated = true;
    }
    config.resolve()
}

fn execute(cli: &Cli) -> Result<u8, Box<dyn std::error::Error>> {
    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(0)
        }
        Command::Run => {
            let settings = load_settings(cli)?;
            if settings.simulated {
                tracing::info!("simulated run: no file will be written or deleted");
            }
            let report = process::run(&settings, cli.catalog_file.as_deref())?;
            output::print_report(&report);
            Ok(report.exit_code())
        }
        Command::Check => {
            let settings = load_settings(cli)?;
            let report = process::check(&settings, cli.catalog_file.as_deref())?;
            output::print_report(&report);
            Ok(report.exit_code())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
