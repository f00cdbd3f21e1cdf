use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::{build_app_state, AppConfig};
use crate::router::create_router;
use crate::schemas::AppState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// A running router with its state and a private upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    // Removed from disk when the test ends.
    pub upload_dir: TempDir,
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is taken from RUST_LOG, defaulting to WARN.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create the app on a fresh database with the admin account seeded. The
/// server keeps cookies between requests, like a browser.
pub async fn setup_test_app() -> TestApp {
    let _guard = init_test_tracing();

    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        upload_dir: upload_dir.path().join("uploads"),
        ..AppConfig::default()
    };

    let db = setup_test_db().await;
    let state = build_app_state(db, &config)
        .await
        .expect("Failed to build app state");

    let mut server = TestServer::new(create_router(state.clone())).expect("Failed to start test server");
    server.do_save_cookies();

    TestApp { server, state, upload_dir }
}

/// Value of the `Location` header of a redirect.
pub fn location(response: &TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("location is ASCII")
        .to_string()
}

pub fn assert_redirect(response: &TestResponse, to: &str) {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

/// Logs in as the seeded admin.
pub async fn login(server: &TestServer) {
    let response = server
        .post("/login")
        .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
        .await;
    assert_redirect(&response, "/dashboard");
}
