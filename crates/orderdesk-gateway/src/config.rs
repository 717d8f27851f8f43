//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;

/// orderdesk HTTP/JSON gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "orderdesk-gateway")]
#[command(about = "HTTP/JSON gateway for the orders grid")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path of the SQLite database holding the order/invoice tables.
    #[arg(short, long, default_value = "orderdesk.db")]
    pub database: PathBuf,

    /// Create the order/invoice tables if they are missing.
    #[arg(long)]
    pub init_schema: bool,

    /// Default log directive when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// SQLite database path.
    pub database: PathBuf,
    /// Whether to create the schema at startup.
    pub init_schema: bool,
    /// Default log directive.
    pub log_level: String,
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            database: args.database.clone(),
            init_schema: args.init_schema,
            log_level: args.log_level.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database: PathBuf::from("orderdesk.db"),
            init_schema: false,
            log_level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Log filter used when RUST_LOG is unset.
    pub fn default_log_filter(&self) -> String {
        format!(
            "orderdesk_gateway={level},orderdesk_core={level},tower_http={level}",
            level = self.log_level
        )
    }
}
