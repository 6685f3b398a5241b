mod crawl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelfscan-cli")]
#[command(about = "Retail catalogue crawler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the configured categories and write the catalogue dataset
    Crawl {
        /// Restrict the crawl to one category (by name or id)
        #[arg(long)]
        category: Option<String>,

        /// Write the dataset here instead of `SHELFSCAN_OUTPUT_PATH`
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the first-page request for each category without fetching
        #[arg(long)]
        dry_run: bool,
    },
    /// List the configured categories
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = shelfscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalogue = shelfscan_core::load_catalogue(&config.catalogue_path)?;

    match cli.command {
        Commands::Crawl {
            category,
            output,
            dry_run,
        } => {
            crawl::run_crawl(
                &config,
                &catalogue,
                category.as_deref(),
                output.as_deref(),
                dry_run,
            )
            .await?;
        }
        Commands::Categories => crawl::run_categories(&catalogue),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
