//! dirlist - Bounded, MIME-filtered directory listings.
//!
//! Usage:
//!   dirlist list PATH...        Direct children of each path
//!   dirlist recursive PATH...   Everything below each path, flat
//!   dirlist structure PATH...   Everything below each path, nested
//!   dirlist methods             Describe the published methods
//!   dirlist --help              Show help
//!
//! Results are printed to stdout as JSON. Logging goes to stderr and is
//! controlled by the `DIRLIST_LOG` environment variable.

use std::io::Write;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use dirlist_scan::{
    DEFAULT_LIMIT, DirectoryService, ListMode, Notification, Notify, SERVICE_NAME,
};

const LOG_ENV: &str = "DIRLIST_LOG";

#[derive(Parser)]
#[command(
    name = "dirlist",
    version,
    about = "Bounded, MIME-filtered directory listings",
    long_about = "dirlist walks one or more paths and reports what it finds as JSON, \
                  either as a flat list of handles or as a nested tree.\n\n\
                  Set DIRLIST_LOG (e.g. `debug`) to see what the walker is doing."
)]
struct Cli {
    /// Print compact JSON instead of pretty-printed output
    #[arg(short, long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the direct children of each path
    List(ListArgs),

    /// List everything below each path as flat handles
    Recursive(ListArgs),

    /// List everything below each path as a nested tree
    Structure(ListArgs),

    /// Describe the published methods
    Methods,
}

#[derive(Args)]
struct ListArgs {
    /// Paths or file:// references to list
    #[arg(required = true)]
    paths: Vec<String>,

    /// Do not follow symbolic links
    #[arg(long)]
    no_follow_links: bool,

    /// Only report entries of this MIME type (repeatable, globs allowed)
    #[arg(short, long = "mime", value_name = "TYPE")]
    mime: Vec<String>,

    /// Maximum number of entries to examine across all paths
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Print each match as a JSON line on stderr while walking
    #[arg(short, long)]
    notify: bool,
}

impl ListArgs {
    /// Argument map in the shape the service methods accept.
    fn to_value(&self) -> Value {
        json!({
            "files": self.paths,
            "followLinks": !self.no_follow_links,
            "mimetypes": self.mime,
            "limit": self.limit,
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::List(args) => run_listing(ListMode::List, &args, cli.compact),
        Command::Recursive(args) => run_listing(ListMode::RecursiveList, &args, cli.compact),
        Command::Structure(args) => {
            run_listing(ListMode::RecursiveListWithStructure, &args, cli.compact)
        }
        Command::Methods => {
            let value = json!({
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "methods": DirectoryService::methods(),
            });
            print_json(&value, cli.compact)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run one listing and print the response; exits non-zero on failure.
fn run_listing(mode: ListMode, args: &ListArgs, compact: bool) -> Result<()> {
    let service = DirectoryService::new();

    let mut print_note = |note: &Notification| {
        if let Ok(line) = serde_json::to_string(note) {
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
    };
    let notifier: Option<&mut dyn Notify> = if args.notify {
        Some(&mut print_note)
    } else {
        None
    };

    tracing::debug!(method = mode.method_name(), paths = args.paths.len(), "dispatching");
    let response = service.call(mode.method_name(), &args.to_value(), notifier);
    print_json(&response, compact)?;

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialize output")?;

    println!("{text}");
    Ok(())
}
