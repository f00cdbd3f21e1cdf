use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{AppConfig, DEFAULT_DATABASE_URL};

pub mod commands;

use commands::{init_database, serve};

#[derive(Parser)]
#[command(name = "almid")]
#[command(about = "ALMID administration: documents, fleet, trips and HR records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply migrations, seed the admin account and start the web server
    Serve(AppConfig),
    /// Initialize the database using migrations
    ///
    /// Examples:
    ///   SQLite: sqlite:///path/to/database.sqlite?mode=rwc
    InitDb {
        /// Database URL
        #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(config) => {
                serve(config).await?;
            }
            Commands::InitDb { database_url } => {
                init_database(&database_url).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["almid", "serve", "--port", "8081"]).unwrap();
        match cli.command {
            Commands::Serve(config) => assert_eq!(config.port, 8081),
            Commands::InitDb { .. } => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_init_db() {
        let cli = Cli::try_parse_from(["almid", "init-db", "--database-url", "sqlite::memory:"]).unwrap();
        match cli.command {
            Commands::InitDb { database_url } => assert_eq!(database_url, "sqlite::memory:"),
            Commands::Serve(_) => panic!("expected init-db"),
        }
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["almid", "import-django"]).is_err());
    }
}
