use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use gridpack::error::Result;
use gridpack::etl::package::{run_bundle, validate_bundle};
use gridpack::load::CsvTableWriter;
use gridpack::logging;
use gridpack::registry::TableRegistry;
use gridpack::settings::{default_bundle_dir, BundleSettings};
use gridpack::sources::in_memory::fixture_sources;

#[derive(Parser)]
#[command(name = "gridpack")]
#[command(about = "Utility data ETL coordinator: validates bundle settings and builds data packages")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a bundle settings file without running any ETL
    Validate {
        /// Path to the bundle settings TOML file
        #[arg(long, default_value = "settings/bundle_demo.toml")]
        settings: PathBuf,
    },
    /// Run a full bundle against the in-memory demo sources
    Demo {
        /// Path to the bundle settings TOML file
        #[arg(long, default_value = "settings/bundle_demo.toml")]
        settings: PathBuf,
        /// Bundle output directory (default: GRIDPACK_BUNDLE_DIR or output/bundles)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

async fn validate(settings_path: &PathBuf) -> Result<()> {
    let settings = BundleSettings::load(settings_path)?;
    let registry = TableRegistry::default();
    let packages = validate_bundle(&settings, &registry)?;

    println!("\n📋 Bundle validation results:");
    println!("   Packages in file: {}", settings.packages.len());
    println!("   Packages validated: {}", packages.len());
    for pkg in &packages {
        println!("   - {} ({} datasets)", pkg.name, pkg.datasets.len());
    }
    Ok(())
}

async fn demo(settings_path: &PathBuf, out: Option<PathBuf>) -> Result<()> {
    let settings = BundleSettings::load(settings_path)?;
    let registry = TableRegistry::default();
    let packages = validate_bundle(&settings, &registry)?;
    if packages.is_empty() {
        println!("⚠️  Nothing to do: no package requested any data");
        return Ok(());
    }

    let bundle_dir = out.unwrap_or_else(default_bundle_dir);
    info!("Writing bundle to {}", bundle_dir.display());

    let sources = fixture_sources();
    let writer = CsvTableWriter;
    let manifest = run_bundle(&packages, &bundle_dir, &sources, &writer).await?;

    let manifest_path = bundle_dir.join("manifest.json");
    manifest.write_json(&manifest_path)?;

    println!("\n📦 Bundle {} complete:", manifest.bundle_id);
    for (name, tables) in &manifest.packages {
        println!("   {} -> {} tables", name, tables.len());
    }
    println!("   Manifest: {}", manifest_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Validate { settings } => {
            println!("🔍 Validating bundle settings...");
            validate(&settings).await
        }
        Commands::Demo { settings, out } => {
            println!("🚀 Running demo bundle...");
            demo(&settings, out).await
        }
    };

    if let Err(e) = &outcome {
        error!("Run failed: {e}");
        println!("❌ {e}");
    } else {
        println!("✅ Done");
    }
    outcome
}
