//! `cascini`: inspect cascade-ini documents from the command line.
//!
//! # Usage
//!
//! ```text
//! cascini [OPTIONS] <FILE> <COMMAND>
//!
//! Commands:
//!   sections                         List section names, sorted
//!   get <SECTION> <OPTION>           Print one value
//!       [--default <VALUE>] [--type string|int|bool]
//!   dump [--format ini|json]         Print the whole store
//!
//! Options:
//!   --cache <PATH>        Use (and refresh) a binary cache for FILE
//!   --ignore-cache        Re-parse FILE even when the cache is fresh
//!   --log-level <LEVEL>   Log filter, e.g. `debug` or `cascade_ini=trace`
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable        | Default | Description                      |
//! |-----------------|---------|----------------------------------|
//! | `CASCINI_CACHE` | *none*  | Cache file, same as `--cache`    |
//! | `CASCINI_LOG`   | *none*  | Log filter, same as `--log-level`|
//!
//! Without `--log-level`, the `RUST_LOG` variable is honoured; if that is
//! absent too, only warnings are printed.  Logs go to stderr so they never mix
//! with command output.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use cascade_ini::store::literal::{parse_bool, parse_int};
use cascade_ini::{ConfigStore, Loader};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect an INI document with section inheritance.
#[derive(Debug, Parser)]
#[command(name = "cascini", version)]
struct Cli {
    /// Document to load.
    file: PathBuf,

    /// Binary cache file.
    ///
    /// When set, a fresh cache is loaded instead of parsing FILE, and the
    /// cache is rewritten after every parse.
    #[arg(long, env = "CASCINI_CACHE")]
    cache: Option<PathBuf>,

    /// Re-parse FILE even when the cache is fresh.
    #[arg(long)]
    ignore_cache: bool,

    /// Log filter directive (overrides `RUST_LOG`).
    #[arg(long, env = "CASCINI_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List section names, one per line, sorted.
    Sections,

    /// Print the value of one option.
    Get {
        section: String,
        option: String,

        /// Value to print when the option is missing.
        #[arg(long)]
        default: Option<String>,

        /// Interpret the value as this type.
        #[arg(long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,
    },

    /// Print the whole store.
    Dump {
        #[arg(long, value_enum, default_value_t = DumpFormat::Ini)]
        format: DumpFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ValueType {
    String,
    Int,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    Ini,
    Json,
}

impl Cli {
    /// Builds the [`Loader`] described by the global options.
    fn loader(&self) -> Loader {
        let loader = Loader::new().ignore_cache(self.ignore_cache);
        match &self.cache {
            Some(cache) => loader.cache_path(cache),
            None => loader,
        }
    }

    /// The log filter: `--log-level`, else `RUST_LOG`, else `warn`.
    fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(directive) => EnvFilter::new(directive),
            None => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
            }
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Loads the document and runs the selected command, writing to `out`.
fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let mut store = cli
        .loader()
        .load_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    debug!(
        "store ready (from cache: {}, sections: {})",
        store.is_from_cache(),
        store.section_count()
    );

    match &cli.command {
        Command::Sections => {
            let mut names = store.section_names();
            names.sort();
            for name in names {
                writeln!(out, "{name}")?;
            }
        }
        Command::Get {
            section,
            option,
            default,
            value_type,
        } => {
            let value = lookup(&mut store, section, option, default.as_deref(), *value_type)?;
            writeln!(out, "{value}")?;
        }
        Command::Dump { format } => match format {
            DumpFormat::Ini => write!(out, "{store}")?,
            DumpFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &sorted_sections(&store))
                    .context("failed to render JSON")?;
                writeln!(out)?;
            }
        },
    }
    Ok(())
}

/// Resolves one `get` request to its printable form.
fn lookup(
    store: &mut ConfigStore,
    section: &str,
    option: &str,
    default: Option<&str>,
    value_type: ValueType,
) -> anyhow::Result<String> {
    let context = || format!("[{section}] {option}");
    let value = match (value_type, default) {
        (ValueType::String, None) => store
            .get_string(section, option)
            .with_context(context)?
            .to_string(),
        (ValueType::String, Some(default)) => {
            store.get_string_or_record_default(section, option, default)
        }
        (ValueType::Int, None) => store
            .get_int(section, option)
            .with_context(context)?
            .to_string(),
        (ValueType::Int, Some(default)) => {
            let default = parse_int(default)
                .with_context(|| format!("--default '{default}' is not an integer"))?;
            store
                .get_int_or_record_default(section, option, default)
                .with_context(context)?
                .to_string()
        }
        (ValueType::Bool, None) => store
            .get_bool(section, option)
            .with_context(context)?
            .to_string(),
        (ValueType::Bool, Some(default)) => {
            let default = parse_bool(default)
                .with_context(|| format!("--default '{default}' is not a boolean"))?;
            store
                .get_bool_or_default(section, option, default)
                .with_context(context)?
                .to_string()
        }
    };
    Ok(value)
}

/// Section → option → value, ordered for stable output.
fn sorted_sections(store: &ConfigStore) -> BTreeMap<&str, BTreeMap<&str, &str>> {
    store
        .sections()
        .map(|(name, section)| (name, section.iter().collect()))
        .collect()
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.env_filter())
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)?;
    out.flush()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
