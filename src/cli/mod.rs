use clap::{Parser, Subcommand};

use crate::config::{AppConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "users-api")]
#[command(about = "User CRUD REST service backed by PostgreSQL")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Bind address (overrides SERVER_HOST)")]
    pub host: Option<String>,

    #[arg(long, global = true, help = "Listen port (overrides SERVER_PORT)")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Log level or filter (overrides LOG_LEVEL)")]
    pub log_level: Option<String>,

    #[arg(long, global = true, help = "Log output format: json or text (overrides LOG_FORMAT)")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create the users table and trigger if missing, then exit")]
    Migrate,

    #[command(about = "Print the effective configuration as JSON (password omitted)")]
    Config,
}

impl Cli {
    pub fn action(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Layer command-line flags over the environment-derived config
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        config
    }
}
