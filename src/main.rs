// src/main.rs
//
// attributify — fold utility attributes into `class`
//
// - Reads INPUT, rewrites every opening tag whose attributes resolve to known
//   utilities, writes OUTPUT (default: overwrite INPUT).
// - Known utilities come from a word list (--utilities), one class per line.
// - Options come from an optional TOML file (--config); flags override it.
//
// CLI flags:
//   --prefix <P>      : prefix stripped from names with --prefixed-only
//   --prefixed-only   : strip the prefix before classification
//   --no-non-valued   : ignore bare attributes like `mt-2`
//   --ignore <NAME>   : attribute never treated as a utility (repeatable)
//   --delete-class    : drop attributes that were folded into `class`
//
// Logging goes to stderr, filtered by RUST_LOG (default: warn).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use attributify::{Error, Options, UtilitySet};
use clap::{ArgAction, Parser};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Word list of known utility classes
    #[arg(long, short = 'u')]
    utilities: PathBuf,

    /// TOML file with transformer options
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Attribute prefix (default "un-")
    #[arg(long)]
    prefix: Option<String>,

    /// Strip the prefix from attribute names
    #[arg(long = "prefixed-only", action = ArgAction::SetTrue)]
    prefixed_only: bool,

    /// Do not treat bare attributes as utilities
    #[arg(long = "no-non-valued", action = ArgAction::SetTrue)]
    no_non_valued: bool,

    /// Attribute to ignore; replaces the default list when given
    #[arg(long = "ignore", value_name = "NAME")]
    ignore: Vec<String>,

    /// Remove attributes that were moved into `class`
    #[arg(long = "delete-class", action = ArgAction::SetTrue)]
    delete_class: bool,

    /// Input file
    input: PathBuf,

    /// Output file (default: overwrite input)
    output: Option<PathBuf>,
}

impl Cli {
    /// Config file first, then flags on top.
    fn options(&self) -> Result<Options, Error> {
        let mut options = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };
        if let Some(prefix) = &self.prefix {
            options.prefix = prefix.clone();
        }
        if self.prefixed_only {
            options.prefixed_only = true;
        }
        if self.no_non_valued {
            options.non_valued_attribute = false;
        }
        if !self.ignore.is_empty() {
            options.ignore_attributes = self.ignore.clone();
        }
        if self.delete_class {
            options.delete_class = true;
        }
        Ok(options)
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let options = cli.options()?;
    let engine = UtilitySet::load(&cli.utilities)?;
    if engine.is_empty() {
        warn!(path = %cli.utilities.display(), "utility list is empty, nothing will be rewritten");
    } else {
        info!(utilities = engine.len(), "loaded utility list");
    }

    let src = fs::read_to_string(&cli.input).map_err(|source| Error::Io {
        path: cli.input.clone(),
        source,
    })?;
    let out = attributify::transform(&src, &engine, &options).await?;

    let out_path = cli.output.as_ref().unwrap_or(&cli.input);
    fs::write(out_path, out).map_err(|source| Error::Io {
        path: out_path.clone(),
        source,
    })?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("attributify: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
