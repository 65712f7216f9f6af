//! dicebag CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use dicebag_runtime::{Config, DEFAULT_STORE_DIR, Repl};

/// Build dice and collections of dice, then roll them.
#[derive(Parser, Debug)]
#[command(name = "dicebag", version)]
#[command(about = "Build dice and collections of dice, then roll them")]
struct Cli {
    /// Saved file to open (started empty if it doesn't exist yet)
    file: Option<String>,

    /// Directory holding saved files
    #[arg(long, env = "DICEBAG_STORE_DIR", default_value = DEFAULT_STORE_DIR)]
    store_dir: PathBuf,

    /// Fixed RNG seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Don't save the loaded file on exit
    #[arg(long)]
    no_autosave: bool,

    /// Don't print the startup banner
    #[arg(long)]
    no_banner: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Run a command line and exit instead of starting the REPL (repeatable)
    #[arg(short, long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config::new()
            .with_store_dir(&self.store_dir)
            .with_seed(self.seed)
            .with_autosave(!self.no_autosave)
            .with_banner(!self.no_banner)
            .with_color(!self.no_color)
            .with_initial_file(self.file.clone())
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError - {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> dicebag_foundation::Result<bool> {
    let config = cli.config();
    debug!(?config, "starting");

    let mut repl = Repl::new(&config)?;
    if cli.commands.is_empty() {
        repl.run()?;
        Ok(true)
    } else {
        repl.run_batch(&cli.commands)
    }
}
