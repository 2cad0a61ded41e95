use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the buques binary.
#[derive(Debug, Parser)]
#[command(name = "buques", version, about = "Vessels-in-port read service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BUQUES_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(Box<ServeArgs>),
    /// Verify connectivity to the database and the cache, then exit.
    Check(CheckArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub connections: ConnectionOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ConnectionOverrides {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the cache host.
    #[arg(long = "cache-host", value_name = "HOST")]
    pub cache_host: Option<String>,

    /// Override the cache port.
    #[arg(long = "cache-port", value_name = "PORT")]
    pub cache_port: Option<u16>,

    /// Override the cache password.
    #[arg(long = "cache-password", value_name = "PASSWORD")]
    pub cache_password: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub connections: ConnectionOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the vessels query deadline.
    #[arg(long = "database-query-timeout-ms", value_name = "MS")]
    pub database_query_timeout_ms: Option<u64>,

    /// Select the cache backend (redis|memory).
    #[arg(long = "cache-backend", value_name = "BACKEND")]
    pub cache_backend: Option<String>,

    /// Override the cache entry expiry.
    #[arg(long = "cache-ttl-seconds", value_name = "SECONDS")]
    pub cache_ttl_seconds: Option<u64>,

    /// Override the per-operation cache deadline.
    #[arg(long = "cache-operation-timeout-ms", value_name = "MS")]
    pub cache_operation_timeout_ms: Option<u64>,

    /// Collapse concurrent cache misses into a single source query.
    #[arg(
        long = "cache-coalesce-misses",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_coalesce_misses: Option<bool>,

    /// Return raw source error text to clients.
    #[arg(
        long = "http-expose-error-detail",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub http_expose_error_detail: Option<bool>,
}
