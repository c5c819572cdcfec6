//! designsync: keeps a rendered web UI and a design document in sync.
//!
//! A rendered page is canonicalized into a tree of named IR nodes, the
//! design document is reverse-converted into the same IR, and the two
//! snapshots are diffed by node name. Names are deterministic, so a node
//! pushed to the design tool can be found again when it comes back.
//!
//! # Modules
//!
//! - [`ir`]: Intermediate representation types and JSON I/O
//! - [`naming`]: Hierarchical naming engine
//! - [`canonical`]: Raw DOM extraction → IR
//! - [`reverse`]: Design-tool document → IR
//! - [`diff`]: Name-keyed structural diff and patch routing
//! - [`config`]: Project configuration
//! - [`error`]: Error types for designsync operations

pub mod canonical;
pub mod config;
pub mod diff;
pub mod error;
pub mod ir;
pub mod naming;
pub mod reverse;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::canonical::Canonicalizer;
use crate::config::{load_config, SyncConfig};
use crate::ir::io_json::{self, IrInput};
use crate::naming::NamingEngine;
use crate::reverse::ReverseConverter;

pub use error::SyncError;

/// The designsync CLI application.
#[derive(Parser)]
#[command(name = "designsync")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Canonicalize an extracted DOM tree into an IR document.
    Canonicalize(CanonicalizeArgs),
    /// Convert a design-tool document into an IR tree.
    Reverse(ReverseArgs),
    /// Diff two IR snapshots.
    Diff(DiffArgs),
    /// Print the naming tree of an IR snapshot or raw extraction.
    Preview(PreviewArgs),
}

#[derive(clap::Args)]
struct CanonicalizeArgs {
    /// Extractor output (`{tree, viewport}` or a bare raw tree).
    input: PathBuf,

    /// Output file (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (JSON or YAML).
    #[arg(long, env = "DESIGNSYNC_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    framework: Option<String>,

    #[arg(long)]
    entry_file: Option<String>,

    #[arg(long)]
    style_strategy: Option<String>,

    /// Keep inert wrapper elements.
    #[arg(long)]
    no_flatten: bool,

    /// Timestamp for the document header (defaults to now, RFC 3339).
    #[arg(long)]
    generated_at: Option<String>,

    /// Also write the name mapping table to this file.
    #[arg(long)]
    mapping_out: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ReverseArgs {
    /// Design document (file response or a bare node).
    input: PathBuf,

    /// Output file (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plugin-data namespace holding source locators.
    #[arg(long)]
    namespace: Option<String>,

    /// Config file (JSON or YAML).
    #[arg(long, env = "DESIGNSYNC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct DiffArgs {
    /// Earlier snapshot (IR document or bare tree).
    before: PathBuf,

    /// Later snapshot (IR document or bare tree).
    after: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Ignore width/height differences up to this many pixels.
    #[arg(long)]
    tolerance: Option<f64>,

    /// Fail when any node lost its auto layout.
    #[arg(long)]
    strict: bool,

    /// Do not report added unstyled GROUP/FRAME wrappers.
    #[arg(long)]
    ignore_inert_wrappers: bool,

    /// Config file (JSON or YAML).
    #[arg(long, env = "DESIGNSYNC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// IR snapshot, or raw extractor output to canonicalize first.
    input: PathBuf,

    /// Config file (JSON or YAML).
    #[arg(long, env = "DESIGNSYNC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Run the designsync CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SyncError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Canonicalize(args)) => run_canonicalize(args),
        Some(Commands::Reverse(args)) => run_reverse(args),
        Some(Commands::Diff(args)) => run_diff(args),
        Some(Commands::Preview(args)) => run_preview(args),
        None => {
            println!("designsync {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Canonicalize, reverse-convert and diff UI trees for design sync.");
            println!();
            println!("Run 'designsync --help' for usage information.");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "designsync=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A subscriber may already be installed when run() is called twice in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load(config: Option<&Path>) -> Result<SyncConfig, SyncError> {
    match config {
        Some(path) => load_config(path),
        None => Ok(SyncConfig::default()),
    }
}

/// Writes `value` as pretty JSON to `output`, or to stdout.
fn emit_json<T: Serialize>(output: Option<&Path>, value: &T) -> Result<(), SyncError> {
    match output {
        Some(path) => io_json::write_json(path, value),
        None => {
            let json = io_json::to_json_string(value).map_err(|source| SyncError::JsonWrite {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
            println!("{json}");
            Ok(())
        }
    }
}

fn run_canonicalize(args: CanonicalizeArgs) -> Result<(), SyncError> {
    let mut config = load(args.config.as_deref())?;
    if let Some(framework) = args.framework {
        config.source.framework = framework;
    }
    if let Some(entry_file) = args.entry_file {
        config.source.entry_file = entry_file;
    }
    if let Some(style_strategy) = args.style_strategy {
        config.source.style_strategy = style_strategy;
    }
    if args.no_flatten {
        config.source.smart_flatten = false;
    }
    let generated_at = args
        .generated_at
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    let extraction = io_json::read_raw_json(&args.input)?;
    let canonicalizer = Canonicalizer::new(
        NamingEngine::new(config.naming.clone()),
        config.build_options(generated_at),
    );
    let doc = canonicalizer.build_extraction(&extraction);
    info!(
        input = %args.input.display(),
        nodes = doc.stats.node_count,
        "canonicalized"
    );

    emit_json(args.output.as_deref(), &doc)?;
    if let Some(path) = &args.mapping_out {
        io_json::write_json(path, &doc.name_mapping)?;
    }
    if let Some(path) = &args.output {
        println!(
            "Canonicalized {} node(s) -> {}",
            doc.stats.node_count,
            path.display()
        );
    }
    Ok(())
}

fn run_reverse(args: ReverseArgs) -> Result<(), SyncError> {
    let config = load(args.config.as_deref())?;
    let namespace = args
        .namespace
        .or(config.source.namespace)
        .unwrap_or_else(|| reverse::DEFAULT_NAMESPACE.to_string());

    let design = io_json::read_design_json(&args.input)?;
    let tree = ReverseConverter::new(namespace).convert(&design);
    debug!(nodes = tree.count(), "reverse-converted design document");

    emit_json(args.output.as_deref(), &tree)?;
    if let Some(path) = &args.output {
        println!("Converted {} node(s) -> {}", tree.count(), path.display());
    }
    Ok(())
}

fn run_diff(args: DiffArgs) -> Result<(), SyncError> {
    let config = load(args.config.as_deref())?;
    let mut opts = config.diff_options();
    if let Some(tolerance) = args.tolerance {
        opts.size_tolerance = tolerance;
    }
    if args.ignore_inert_wrappers {
        opts.ignore_inert_wrappers = true;
    }

    let before = io_json::read_ir_json(&args.before)?;
    let after = io_json::read_ir_json(&args.after)?.into_tree();
    let mapping = match &before {
        IrInput::Document(doc) if !doc.name_mapping.is_empty() => Some(doc.name_mapping.clone()),
        _ => None,
    };
    let before = before.into_tree();

    let changes = diff::diff_trees(&before, &after, &opts);

    match args.output {
        OutputFormat::Json => emit_json(None, &changes)?,
        OutputFormat::Text => {
            println!("Diff: {} -> {}", args.before.display(), args.after.display());
            print!("{changes}");
            if let Some(mapping) = &mapping {
                if !changes.is_empty() {
                    println!();
                    print!("{}", changes.route(mapping, &config.naming.separator));
                }
            }
        }
    }

    let warnings = changes.layout_warnings();
    if args.strict && !warnings.is_empty() {
        return Err(SyncError::LayoutIntegrity {
            count: warnings.len(),
        });
    }
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<(), SyncError> {
    let config = load(args.config.as_deref())?;
    let tree = match io_json::read_ir_json(&args.input) {
        Ok(input) => input.into_tree(),
        Err(SyncError::JsonParse { .. }) => {
            debug!(input = %args.input.display(), "not an IR snapshot, canonicalizing as raw tree");
            let extraction = io_json::read_raw_json(&args.input)?;
            let canonicalizer = Canonicalizer::new(
                NamingEngine::new(config.naming.clone()),
                config.build_options(String::new()),
            );
            canonicalizer.build_extraction(&extraction).tree
        }
        Err(e) => return Err(e),
    };
    print!("{}", naming::preview_tree(&tree, &config.naming.separator));
    Ok(())
}
