mod browse;
mod indexnow;
mod product;
mod sitemaps;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use preisradio_client::ApiClient;
use preisradio_core::{AppConfig, RetailerDirectory, SiteConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "preisradio-cli")]
#[command(about = "Preisradio storefront tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the metadata and JSON-LD generated for one product
    Product {
        /// Upstream product id
        id: String,
        /// Which documents to print
        #[arg(long, value_enum, default_value_t = ProductOutput::All)]
        output: ProductOutput,
    },
    /// Write the sitemap index and every sitemap into a directory
    Sitemaps {
        /// Target directory, created when missing
        #[arg(long, default_value = "public")]
        out: PathBuf,
    },
    /// Submit URLs to IndexNow
    Indexnow {
        /// Absolute URLs to submit
        #[arg(required_unless_present = "sitemap")]
        urls: Vec<String>,
        /// Submit the sitemap index URL
        #[arg(long)]
        sitemap: bool,
    },
    /// Search products interactively; each line read from stdin is a query
    Browse {
        /// Restrict results to one retailer
        #[arg(long)]
        retailer: Option<String>,
        /// Sort order (price_asc, price_desc, newest)
        #[arg(long)]
        sort: Option<String>,
        /// Results per query
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProductOutput {
    Metadata,
    Schema,
    All,
}

/// Everything the commands share, built once from the environment.
struct Context {
    config: AppConfig,
    site: SiteConfig,
    retailers: RetailerDirectory,
    api: ApiClient,
}

impl Context {
    fn load() -> anyhow::Result<Self> {
        let config = preisradio_core::load_app_config()?;
        let retailers = RetailerDirectory::load_or_builtin(config.retailers_path.as_deref())?;
        let api = ApiClient::from_config(&config)?;
        Ok(Self {
            site: SiteConfig::from_app_config(&config),
            config,
            retailers,
            api,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("preisradio-cli: run with --help to list commands");
        return Ok(());
    };

    let ctx = Context::load()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(ctx.config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Product { id, output } => product::run_product(&ctx, &id, output).await,
        Commands::Sitemaps { out } => sitemaps::run_sitemaps(&ctx, &out).await,
        Commands::Indexnow { urls, sitemap } => indexnow::run_indexnow(&ctx, urls, sitemap).await,
        Commands::Browse {
            retailer,
            sort,
            limit,
        } => browse::run_browse(&ctx, retailer, sort.as_deref(), limit).await,
    }
}
