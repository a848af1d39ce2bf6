mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xcodeninja_lib::error::GenerateError;

use crate::cmd::GenerateArgs;
use crate::output::{print_error, print_failure};

/// Create build.ninja files from Xcode projects
#[derive(Parser)]
#[command(name = "xcodeninja")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Xcode project: a `*.xcodeproj` directory or its `project.json`
  project: Option<PathBuf>,

  /// Directory the ninja files are written to
  #[arg(default_value = ".")]
  output: PathBuf,

  /// Generator configuration file (default: $XCODENINJA_CONFIG, then xcodeninja.toml next to the project)
  #[arg(short, long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Only generate these targets
  #[arg(short, long = "target", value_name = "NAME")]
  targets: Vec<String>,

  /// Only generate these build configurations
  #[arg(short = 'C', long = "configuration", value_name = "NAME")]
  configurations: Vec<String>,

  /// Disable colored output
  #[arg(long)]
  no_ansi: bool,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  if cli.no_ansi {
    owo_colors::set_override(false);
  }

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(!cli.no_ansi)
    .without_time()
    .init();

  let args = GenerateArgs {
    project: cli.project.as_deref(),
    output: &cli.output,
    config: cli.config.as_deref(),
    targets: &cli.targets,
    configurations: &cli.configurations,
  };

  match cmd::cmd_generate(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      match err.downcast_ref::<GenerateError>() {
        Some(e) if e.is_informative() => print_failure(&e.to_string()),
        _ => print_error(&format!("{err:#}")),
      }
      ExitCode::FAILURE
    }
  }
}
