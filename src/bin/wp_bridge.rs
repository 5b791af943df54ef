//! WP Bridge CLI binary.
//!
//! JSON-RPC 2.0 tool server for WordPress and WooCommerce REST APIs.
//!
//! # Commands
//!
//! - `serve` - Start the bridge on stdio or SSE
//! - `sites` - List the configured site inventory
//! - `tools` - List the advertised tool catalog

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use wp_bridge::{
    config::{default_config_path, load_sites, load_sites_from_env, BridgeConfig, SiteConfig},
    protocol::{Dispatcher, ServerCapabilities},
    security::{SecurityGate, TracingSink},
    server::ServerConfig,
    tools,
    transport::{self, TransportKind},
    wp::SiteRegistry,
    VERSION,
};

#[derive(Parser)]
#[command(name = "wp-bridge")]
#[command(author = "WP Bridge Contributors")]
#[command(version = VERSION)]
#[command(about = "WP Bridge - WordPress control over JSON-RPC", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bridge
    Serve {
        /// Transport to speak: stdio, sse
        #[arg(short, long)]
        transport: Option<String>,

        /// SSE listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// SSE listen host
        #[arg(long)]
        host: Option<String>,

        /// Bind SSE to all interfaces
        #[arg(long)]
        bind_all: bool,

        /// Bridge config file (default: <config dir>/wp-bridge/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Site inventory file (default: WP_SITES_PATH)
        #[arg(short, long)]
        sites: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the configured site inventory
    Sites {
        /// Bridge config file (default: <config dir>/wp-bridge/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Site inventory file (default: WP_SITES_PATH)
        #[arg(short, long)]
        sites: Option<PathBuf>,
    },

    /// List the advertised tool catalog
    Tools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            transport,
            port,
            host,
            bind_all,
            config,
            sites,
            verbose,
        } => cmd_serve(transport, port, host, bind_all, config, sites, verbose),

        Commands::Sites { config, sites } => cmd_sites(config, sites),

        Commands::Tools { json } => cmd_tools(json),
    }
}

fn cmd_serve(
    transport: Option<String>,
    port: Option<u16>,
    host: Option<String>,
    bind_all: bool,
    config_path: Option<PathBuf>,
    sites_path: Option<PathBuf>,
    verbose: bool,
) -> anyhow::Result<()> {
    // Resolve settings: defaults, then config file, then environment,
    // then command-line flags.
    let mut config = load_bridge_config(config_path)?.merge(BridgeConfig::from_env());
    if let Some(transport) = transport {
        config.transport = transport;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    // Logging goes to stderr; stdout is the protocol channel on stdio.
    let log_level = if verbose { "debug" } else { &config.log_level };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let kind = TransportKind::from_str(&config.transport)
        .map_err(|_| anyhow::anyhow!("Invalid transport: {}. Use: stdio, sse", config.transport))?;

    let inventory = resolve_sites(sites_path, &config)?;
    let registry = SiteRegistry::new(inventory).map_err(|e| anyhow::anyhow!("{}", e))?;
    tracing::info!("Loaded {} site(s)", registry.len());

    let security = SecurityGate::new(Arc::new(TracingSink));
    let dispatcher = Arc::new(Dispatcher::new(registry, security));
    let capabilities = ServerCapabilities::default();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match kind {
            TransportKind::Stdio => transport::stdio::run(dispatcher, capabilities).await,
            TransportKind::Sse => {
                let mut server_config = ServerConfig::default().with_port(config.port);
                if bind_all {
                    server_config = server_config.bind_all();
                } else {
                    let addr: std::net::SocketAddr = config.listen_addr().parse()?;
                    server_config = server_config.with_addr(addr);
                }
                transport::sse::serve(server_config, dispatcher, capabilities).await
            }
        }
        .map_err(|e| anyhow::anyhow!("{}", e))
    })
}

fn cmd_sites(config_path: Option<PathBuf>, sites_path: Option<PathBuf>) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_bridge_config(config_path)?.merge(BridgeConfig::from_env());
    let inventory = resolve_sites(sites_path, &config)?;

    println!("Configured sites ({}):", inventory.len());
    println!();
    println!("{:<20} {:<12} {:<40}", "Alias", "Auth", "URL");
    println!("{}", "-".repeat(72));

    let mut aliases: Vec<&String> = inventory.keys().collect();
    aliases.sort();
    for alias in aliases {
        let site = &inventory[alias];
        println!(
            "{:<20} {:<12} {:<40}",
            alias,
            format!("{:?}", site.auth_type).to_lowercase(),
            site.url
        );
    }

    Ok(())
}

fn cmd_tools(json_output: bool) -> anyhow::Result<()> {
    let catalog = tools::catalog();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Advertised tools ({}):", catalog.len());
    println!();
    println!("{:<45} {:<10}", "Name", "Category");
    println!("{}", "-".repeat(56));

    for spec in &catalog {
        let category = tools::ToolId::from_name(spec.name)
            .map(|id| id.category().as_str())
            .unwrap_or("?");
        println!("{:<45} {:<10}", spec.name, category);
    }

    Ok(())
}

// Helper functions

fn load_bridge_config(explicit: Option<PathBuf>) -> anyhow::Result<BridgeConfig> {
    if let Some(path) = explicit {
        return BridgeConfig::from_file(path).map_err(|e| anyhow::anyhow!("{}", e));
    }
    if let Some(path) = default_config_path() {
        if path.exists() {
            return BridgeConfig::from_file(path).map_err(|e| anyhow::anyhow!("{}", e));
        }
    }
    Ok(BridgeConfig::default())
}

fn resolve_sites(
    explicit: Option<PathBuf>,
    config: &BridgeConfig,
) -> anyhow::Result<HashMap<String, SiteConfig>> {
    let inventory = if let Some(path) = explicit {
        load_sites(&path)
    } else if let Some(path) = &config.sites_path {
        load_sites(path)
    } else {
        load_sites_from_env()
    };
    inventory.map_err(|e| anyhow::anyhow!("{}", e))
}
