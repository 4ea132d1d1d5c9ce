//! prefixmaps CLI
//!
//! - Rebuilding persisted contexts from upstream registries (`etl`)
//! - Inspecting and validating contexts (`list`, `show`, `validate`)
//! - CURIE expansion and URI compression against one or more contexts

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use prefixmaps_io::DataDir;
use prefixmaps_ingest::SourceRegistry;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "prefixmaps")]
#[command(author, version, about = "Curated prefix maps for CURIE/URI conversion")]
struct Cli {
    /// Log filter (EnvFilter syntax, e.g. `info` or `prefixmaps_ingest=debug`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Directory holding persisted contexts (default: $PREFIXMAPS_DATA_DIR, then the bundled data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Source registry JSON (default: the standard upstream registries)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild every context from its upstream source and write `<name>.csv` files.
    Etl {
        /// Output directory (default: the data directory)
        #[arg(short = 'd', long)]
        output_directory: Option<PathBuf>,
    },

    /// List persisted contexts.
    List,

    /// Print a context (several names are merged, first name wins).
    Show {
        #[arg(required = true)]
        names: Vec<String>,
        /// Build from upstream instead of the persisted snapshot
        #[arg(long)]
        refresh: bool,
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
        /// With `json`, print every record instead of the canonical map
        #[arg(long)]
        all: bool,
    },

    /// Report malformed records and integrity problems.
    Validate {
        #[arg(required = true)]
        names: Vec<String>,
        /// Also check alias records
        #[arg(long)]
        all_records: bool,
        /// Exit nonzero when anything is reported
        #[arg(long)]
        strict: bool,
    },

    /// Expand a CURIE to a URI.
    Expand {
        curie: String,
        #[arg(short = 'c', long = "context", default_value = "merged")]
        contexts: Vec<String>,
    },

    /// Compress a URI to a CURIE.
    Compress {
        uri: String,
        #[arg(short = 'c', long = "context", default_value = "merged")]
        contexts: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ShowFormat {
    /// Full record table, persisted layout
    Csv,
    /// Canonical prefix -> namespace map
    Json,
    /// Extended prefix map
    Epm,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let data_dir = DataDir::resolve(cli.data_dir.as_deref());
    let registry = match &cli.registry {
        Some(path) => SourceRegistry::from_file(path)?,
        None => SourceRegistry::standard(),
    };
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Etl { output_directory } => {
            let output_directory =
                output_directory.unwrap_or_else(|| data_dir.root().to_path_buf());
            commands::cmd_etl(&registry, &data_dir, &output_directory)
        }
        Commands::List => commands::cmd_list(&data_dir, &mut out),
        Commands::Show {
            names,
            refresh,
            format,
            all,
        } => {
            let context = commands::load(&registry, &data_dir, &names, refresh)?;
            commands::cmd_show(&context, format, all, &mut out)
        }
        Commands::Validate {
            names,
            all_records,
            strict,
        } => {
            let context = commands::load(&registry, &data_dir, &names, false)?;
            commands::cmd_validate(&context, all_records, strict, &mut out)
        }
        Commands::Expand { curie, contexts } => {
            let converter = prefixmaps_io::load_converter(&data_dir, &contexts)?;
            commands::cmd_expand(&converter, &curie, &mut out)
        }
        Commands::Compress { uri, contexts } => {
            let converter = prefixmaps_io::load_converter(&data_dir, &contexts)?;
            commands::cmd_compress(&converter, &uri, &mut out)
        }
    }
}
