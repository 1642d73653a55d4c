use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use routegen_api::ContentApiClient;
use routegen_engine::{DefaultHttpFetcher, PluginRegistry, default_config_path, load_site_config};
use routegen_types::HandledRoute;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Expand parameterized site routes by querying a content API.
#[derive(Debug, Parser)]
#[command(name = "routegen", version)]
struct Cli {
    /// Site configuration file (JSON, or YAML by extension).
    /// Defaults to $ROUTEGEN_CONFIG_PATH or ./routegen.json.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Output format for expanded routes.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Only report configuration warnings; no requests are made.
    #[arg(long)]
    validate: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON array of `{ route, type }` objects.
    Json,
    /// One route per line.
    Lines,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let site = load_site_config(&path).with_context(|| format!("loading {}", path.display()))?;

    let client = ContentApiClient::new()?;
    let fetcher = Arc::new(DefaultHttpFetcher::new(client));
    let registry = PluginRegistry::with_builtin_routers(fetcher, site.max_concurrent_fetches);

    if cli.validate {
        let warnings = registry.validate_site(&site).await;
        for warning in &warnings {
            println!("{warning}");
        }
        if warnings.is_empty() {
            info!(routes = site.routes.len(), "configuration looks valid");
        } else {
            warn!(warnings = warnings.len(), "configuration has warnings");
        }
        return Ok(());
    }

    let routes = registry.expand_site(&site).await;
    info!(templates = site.routes.len(), routes = routes.len(), "expanded site routes");
    print_routes(&routes, cli.format)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// `RUST_LOG` when set and valid, otherwise `info`.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn print_routes(routes: &[HandledRoute], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(routes)?),
        OutputFormat::Lines => {
            for route in routes {
                println!("{}", route.route);
            }
        }
    }
    Ok(())
}
