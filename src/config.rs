use std::{fmt, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Args;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info};

use crate::auth::seed_admin;
use crate::schemas::AppState;
use crate::session::SessionStore;
use crate::views::Views;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///tmp/almid.db?mode=rwc";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-almid-2026";
pub const DEFAULT_UPLOAD_DIR: &str = "/tmp/uploads";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 8 * 60;

/// Runtime settings of the web server. Every option can also be given
/// through the environment (or a `.env` file).
#[derive(Args, Clone)]
pub struct AppConfig {
    /// Database URL
    ///
    /// For SQLite databases, use:
    ///   - sqlite:///absolute/path/to/database.sqlite?mode=rwc
    ///
    /// `mode=rwc` creates the file when it does not exist yet.
    #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Interface to listen on
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Key used to sign session cookies
    #[arg(long, env = "SECRET_KEY", default_value = DEFAULT_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Directory uploaded documents are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    /// Username of the account seeded at startup
    #[arg(long, env = "ADMIN_USERNAME", default_value = DEFAULT_ADMIN_USERNAME)]
    pub admin_username: String,

    /// Password of the account seeded at startup
    #[arg(long, env = "ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
    pub admin_password: String,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Minutes of inactivity after which a session expires
    #[arg(long, env = "SESSION_IDLE_MINUTES", default_value_t = DEFAULT_SESSION_IDLE_MINUTES)]
    pub session_idle_minutes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upload_dir", &self.upload_dir)
            .field("admin_username", &self.admin_username)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("session_idle_minutes", &self.session_idle_minutes)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Get bind address in the `HOST:PORT` form
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes * 60)
    }
}

/// Connects to the database and applies any pending migrations.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    debug!("Running database migrations");
    Migrator::up(&db, None).await?;
    info!("Database schema is up to date");

    Ok(db)
}

/// Builds the shared state on top of a migrated connection: seeds the admin
/// account, prepares the upload directory and compiles the templates.
pub async fn build_app_state(db: DatabaseConnection, config: &AppConfig) -> Result<AppState> {
    if seed_admin(&db, &config.admin_username, &config.admin_password).await? {
        info!(username = %config.admin_username, "Seeded admin account");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    debug!(upload_dir = %config.upload_dir.display(), "Upload directory ready");

    let views = Views::new()?;
    let sessions = SessionStore::new(&config.secret_key, config.session_idle())
        .map_err(|e| anyhow::anyhow!("Unusable SECRET_KEY: {}", e))?;

    Ok(AppState {
        db,
        sessions,
        views: Arc::new(views),
        upload_dir: Arc::new(config.upload_dir.clone()),
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Initialize application configuration and state
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    let db = connect_and_migrate(&config.database_url).await?;
    build_app_state(db, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn test_explicit_arguments() {
        let cli = TestCli::parse_from([
            "almid",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--upload-dir",
            "/srv/uploads",
            "--max-upload-bytes",
            "1024",
        ]);

        assert_eq!(cli.config.bind_address(), "127.0.0.1:8080");
        assert_eq!(cli.config.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(cli.config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.session_idle(), Duration::from_secs(8 * 60 * 60));
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", AppConfig::default());
        assert!(!rendered.contains(DEFAULT_SECRET_KEY));
        assert!(!rendered.contains(DEFAULT_ADMIN_PASSWORD));
    }

    #[tokio::test]
    async fn test_build_app_state_seeds_admin() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            upload_dir: dir.path().join("uploads"),
            ..AppConfig::default()
        };

        let state = initialize_app_state(&config).await.unwrap();
        assert!(state.upload_dir.is_dir());

        let identity = crate::auth::authenticate(&state.db, "admin", "admin123")
            .await
            .unwrap();
        assert_eq!(identity.role, "admin");
    }
}
