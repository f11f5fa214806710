mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder")]
#[command(about = "Find nearby retail stores for a US ZIP code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search configured brands near a ZIP code
    Search {
        /// 5-digit US postal code
        zip: String,
        /// Search radius in miles (must be one of the allowed radii)
        #[arg(long)]
        radius: Option<u32>,
        /// Print the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List configured brands and their search terms
    Brands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = storefinder_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search { zip, radius, json } => {
            search::run_search(&config, &zip, radius, json).await
        }
        Commands::Brands => search::list_brands(&config),
    }
}
