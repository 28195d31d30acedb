//! dirtree - Scan, copy, remove and create directory trees.
//!
//! Usage:
//!   dirtree scan <ROOT>            List entries matching the filters
//!   dirtree copy <SOURCE> <DEST>   Copy a tree into an existing directory
//!   dirtree remove <PATH>          Remove a tree, children first
//!   dirtree make <PATH>...         Create directories like `mkdir -p`
//!   dirtree tempnam                Print an unused temporary path
//!   dirtree --help                 Show help

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use dirtree_ops::{
    copy_tree, make_dirs, remove_tree, tempnam, CopyOptions, MakeOptions, OperationSummary,
    DEFAULT_DIR_MODE,
};
use dirtree_scan::{scan_entries, EntryType, TraversalConfig};

#[derive(Parser)]
#[command(
    name = "dirtree",
    version,
    about = "Directory tree utility",
    long_about = "dirtree walks directory trees with shared filters.\n\n\
                  The same --include/--exclude/--type flags select entries \
                  for scan, copy and remove."
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the entries under a path
    Scan {
        /// Directory or file to scan
        root: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Only list the root's immediate children
        #[arg(long)]
        shallow: bool,

        /// Report a directory only when nothing below it matched
        #[arg(long)]
        leaves_only: bool,

        /// Include `.` and `..` entries
        #[arg(long)]
        show_dots: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a tree into an existing directory
    Copy {
        /// Directory or file to copy
        source: PathBuf,

        /// Existing directory that receives the copy
        destination: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a tree, children before parents
    Remove {
        /// Directory or file to remove
        path: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create directories and any missing parents
    Make {
        /// Directories to create
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Permission bits in octal (e.g. 755)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<u32>,
    },

    /// Print a path that does not exist yet
    Tempnam {
        /// Parent directory (defaults to the system temp dir)
        #[arg(short, long)]
        base: Option<PathBuf>,

        /// File name prefix
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
}

/// Filter flags shared by scan, copy and remove.
#[derive(Args)]
struct FilterArgs {
    /// Entry type to keep
    #[arg(short = 't', long = "type", default_value = "any")]
    entry_type: TypeArg,

    /// Glob the full path must match
    #[arg(short, long)]
    include: Option<String>,

    /// Glob that rejects a full path
    #[arg(short, long)]
    exclude: Option<String>,

    /// Do not descend into symlinked directories
    #[arg(long)]
    no_follow: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum TypeArg {
    #[default]
    Any,
    File,
    Directory,
}

impl From<TypeArg> for EntryType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Any => EntryType::Any,
            TypeArg::File => EntryType::File,
            TypeArg::Directory => EntryType::Directory,
        }
    }
}

impl FilterArgs {
    /// Map the flags onto a traversal config.
    fn config(&self, recursive: bool, leaves_only: bool, skip_dots: bool) -> Result<TraversalConfig> {
        let mut builder = TraversalConfig::builder();
        builder
            .recursive(recursive)
            .entry_type(self.entry_type)
            .follow_symlinks(!self.no_follow)
            .leaves_only(leaves_only)
            .skip_dots(skip_dots);
        if let Some(include) = &self.include {
            builder.include(include.as_str());
        }
        if let Some(exclude) = &self.exclude {
            builder.exclude(exclude.as_str());
        }
        builder.build().wrap_err("Invalid filter options")
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan {
            root,
            filter,
            shallow,
            leaves_only,
            show_dots,
            json,
        } => {
            let config = filter.config(!shallow, leaves_only, !show_dots)?;
            run_scan(&root, &config, json)?;
        }
        Command::Copy {
            source,
            destination,
            filter,
            json,
        } => {
            let options = CopyOptions::new(filter.config(true, false, true)?);
            let summary = copy_tree(&source, &destination, &options).wrap_err_with(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    destination.display()
                )
            })?;
            print_summary(&summary, json)?;
        }
        Command::Remove { path, filter, json } => {
            let config = filter.config(true, false, true)?;
            let summary = remove_tree(&path, &config)
                .wrap_err_with(|| format!("Failed to remove {}", path.display()))?;
            print_summary(&summary, json)?;
        }
        Command::Make { paths, mode } => {
            let options = MakeOptions::with_mode(mode.unwrap_or(DEFAULT_DIR_MODE));
            make_dirs(&paths, &options).wrap_err("Failed to create directories")?;
        }
        Command::Tempnam { base, prefix } => {
            let path = tempnam(base.as_deref(), &prefix).wrap_err("Failed to pick a name")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// List matching entries, one path per line.
fn run_scan(root: &Path, config: &TraversalConfig, json: bool) -> Result<()> {
    let entries = scan_entries(root, config)
        .wrap_err_with(|| format!("Failed to scan {}", root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry.path.display());
        }
    }

    Ok(())
}

fn print_summary(summary: &OperationSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary.summary());
    }
    Ok(())
}

/// Parse an octal mode such as "755" or "0o700".
fn parse_mode(s: &str) -> std::result::Result<u32, String> {
    let digits = s.trim_start_matches("0o");
    let mode = u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode `{s}`: {e}"))?;
    if mode > 0o7777 {
        return Err(format!("mode `{s}` out of range"));
    }
    Ok(mode)
}
