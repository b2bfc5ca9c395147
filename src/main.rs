//! Preview server binary.
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http server ─▶ routing (SiteRouter) ─┬─▶ redirect rules
//!                                                         ├─▶ content store ─▶ disk
//!     Client Response                                     └─▶ header rules
//!     ◀───────────── http response ◀──────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use preview_server::config::DevServerConfig;
use preview_server::http::HttpServer;
use preview_server::lifecycle::{self, signals, Shutdown};
use preview_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "preview-server")]
#[command(about = "Serve a static site build with its redirect and header rules", long_about = None)]
struct Cli {
    /// Hostname to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Platform config file with [[redirects]] and [[headers]]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expose Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> DevServerConfig {
        let mut config = DevServerConfig::default();
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.dir {
            config.served_dir = dir;
        }
        if let Some(site_config) = self.config {
            config.site_config = site_config;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config.observability.metrics_address = self.metrics_address;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();

    logging::init_logging(&config.observability.log_level);
    tracing::info!("preview-server v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(address) = &config.observability.metrics_address {
        // Validation rejects unparsable addresses before this is reached.
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(metrics_address = %address, error = %e, "Failed to parse metrics address"),
        }
    }

    let site = Arc::new(lifecycle::build_site(&config).await?);
    let listener = lifecycle::bind(&config).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("\n{}", lifecycle::ready_banner(&config, local_addr));

    let shutdown = Shutdown::new();
    signals::spawn_ctrl_c_handler(shutdown.clone());

    let server = HttpServer::new(config, site);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
