//! ijroi: reader for ImageJ region-of-interest files.
//!
//! ijroi decodes the binary `.roi` format written by ImageJ's ROI manager,
//! either one file at a time or as a whole ROI set stored in a zip archive
//! or directory, and exposes the result as plain Rust values that can be
//! inspected or exported to JSON and CSV.
//!
//! # Modules
//!
//! - [`roi`]: ROI records, the binary decoder, and the collection reader
//! - [`archive`]: Named byte-stream sources (zip archives, directories)
//! - [`inspect`]: Collection summaries
//! - [`error`]: Error types for ijroi operations

pub mod archive;
pub mod error;
pub mod inspect;
pub mod roi;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{CollectionError, DecodeError, RoiError};

/// The ijroi CLI application.
#[derive(Parser)]
#[command(name = "ijroi")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Decode ROIs and print a summary report.
    Inspect(InspectArgs),
    /// List the members of a zip archive without decoding them.
    List(ListArgs),
    /// Decode ROIs and export them as JSON or coordinate CSV.
    Export(ExportArgs),
}

/// Options shared by every subcommand that decodes a collection.
#[derive(clap::Args)]
struct ReadArgs {
    /// Input: a .roi file, a .zip ROI set, or a directory of .roi files.
    input: PathBuf,

    /// Key ROIs as '<type>.<ordinal>' instead of by file name.
    #[arg(long)]
    no_names: bool,

    /// Decode entries in parallel.
    #[arg(long)]
    parallel: bool,

    /// Reject ROI files whose format version is below this value.
    #[arg(long, env = "IJROI_MIN_VERSION")]
    min_version: Option<i32>,

    /// Handling of duplicate keys ('last-wins', 'first-wins', or 'error').
    #[arg(long, default_value = "last-wins")]
    duplicates: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    #[command(flatten)]
    read: ReadArgs,

    /// Maximum number of entries listed in the report.
    #[arg(long, default_value_t = 25)]
    max_rows: usize,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Zip archive to list.
    archive: PathBuf,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    #[command(flatten)]
    read: ReadArgs,

    /// Export format ('json' or 'csv').
    #[arg(long, default_value = "json")]
    to: String,

    /// Output file (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Run the ijroi CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RoiError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::List(args)) => run_list(args),
        Some(Commands::Export(args)) => run_export(args),
        None => {
            println!("ijroi {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Reader for ImageJ region-of-interest files.");
            println!();
            println!("Run 'ijroi --help' for usage information.");
            Ok(())
        }
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so report output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "ijroi=debug" } else { "ijroi=info" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Decode the input named by `args` into a collection.
fn read_input(args: &ReadArgs) -> Result<roi::RoiCollection, RoiError> {
    let duplicates = match args.duplicates.as_str() {
        "last-wins" => roi::DuplicatePolicy::LastWins,
        "first-wins" => roi::DuplicatePolicy::FirstWins,
        "error" => roi::DuplicatePolicy::Error,
        other => {
            return Err(RoiError::UnsupportedFormat(format!(
                "duplicate policy '{}' (supported: last-wins, first-wins, error)",
                other
            )));
        }
    };

    let opts = roi::CollectionOptions {
        use_names: !args.no_names,
        duplicates,
        parallel: args.parallel,
        decode: roi::DecodeOptions {
            min_version: args.min_version,
        },
    };

    let entries = archive::read_entries(&args.input)?;
    info!(
        input = %args.input.display(),
        entries = entries.len(),
        "decoding ROI entries"
    );
    Ok(roi::read_collection_with(&entries, &opts)?)
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), RoiError> {
    let collection = read_input(&args.read)?;
    let opts = inspect::InspectOptions {
        max_rows: args.max_rows,
        ..Default::default()
    };
    let report = inspect::inspect_collection(&collection, &opts);

    match args.output.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&report).map_err(|source| RoiError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{}", json);
        }
        "text" => print!("{}", report),
        other => {
            return Err(RoiError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    Ok(())
}

/// Execute the list subcommand.
fn run_list(args: ListArgs) -> Result<(), RoiError> {
    let listing = archive::list_zip(&args.archive)?;

    match args.output.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&listing).map_err(|source| RoiError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{}", json);
        }
        "text" => {
            println!("{:>12} {:>12}  name", "compressed", "size");
            for member in &listing {
                println!(
                    "{:>12} {:>12}  {}",
                    member.compressed_size, member.uncompressed_size, member.name
                );
            }
            println!("{} member(s)", listing.len());
        }
        other => {
            return Err(RoiError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    Ok(())
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), RoiError> {
    let collection = read_input(&args.read)?;

    match (args.to.as_str(), args.output.as_deref()) {
        ("json", Some(path)) => roi::io_json::write_json(path, &collection)?,
        ("json", None) => {
            let json = roi::io_json::to_json_string(&collection).map_err(|source| {
                RoiError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        ("csv", Some(path)) => roi::io_csv::write_coordinates_csv(path, &collection)?,
        ("csv", None) => print!("{}", roi::io_csv::to_coordinates_csv_string(&collection)?),
        (other, _) => {
            return Err(RoiError::UnsupportedFormat(format!(
                "'{}' (supported: json, csv)",
                other
            )));
        }
    }

    if let Some(path) = args.output.as_deref() {
        info!(path = %path.display(), rois = collection.len(), "export written");
    }

    Ok(())
}
