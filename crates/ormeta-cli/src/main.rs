//! ORMeta Command-Line Inspector
//!
//! Loads a schema document, registers and validates every entity, and prints
//! the registry or a single entity's attributes.

mod config;
mod formatter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::Parser;
use config::CliConfig;
use formatter::OutputFormat;
use ormeta_core::SchemaDocument;
use tracing::info;

/// ORMeta Command-Line Inspector
#[derive(Parser, Debug)]
#[command(name = "ormeta")]
#[command(version, about = "Inspect and validate ORMeta entity metadata")]
pub struct Args {
    /// Schema document (JSON) to load
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Show the attributes of a single entity
    #[arg(short = 'e', long)]
    pub entity: Option<String>,

    /// Keep the registry writable after validation
    #[arg(long)]
    pub no_freeze: bool,
}

fn main() {
    // The binary's own events log under the `ormeta` target.
    let filter = ["ormeta=info", "ormeta_core=info"]
        .into_iter()
        .filter_map(|directive| directive.parse::<tracing_subscriber::filter::Directive>().ok())
        .fold(
            tracing_subscriber::EnvFilter::from_default_env(),
            tracing_subscriber::EnvFilter::add_directive,
        );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(CliConfig::from(&args)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = SchemaDocument::from_path(&config.file)?.into_metadata(config.metadata)?;
    info!(
        entities = metadata.len(),
        frozen = metadata.is_frozen(),
        "schema loaded"
    );

    let formatter = formatter::create_formatter(config.format);
    let output = match &config.entity {
        Some(uid) => formatter.format_entity(metadata.get(uid)?)?,
        None => formatter.format_registry(&metadata)?,
    };
    println!("{}", output);

    Ok(())
}
