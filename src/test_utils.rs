#[cfg(test)]
pub mod test_utils {
    use crate::config::{build_app_state, Settings};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header, HeaderName, HeaderValue};
    use axum::Router;
    use axum_test::TestServer;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use domain::{HashingConfig, Registration};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const ADMIN_PASSWORD: &str = "admin123";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Settings with the cheapest Argon2 parameters so tests stay fast
    pub fn test_settings() -> Settings {
        Settings {
            password_hashing: HashingConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
            ..Settings::default()
        }
    }

    /// AppState over a fresh database with two users, `alice` and `bob`, and the default admin
    pub async fn setup_test_app_state_with(settings: Settings) -> AppState {
        let db = setup_test_db().await;
        let state = build_app_state(db, &settings).expect("Failed to build app state");

        for (username, email) in [("alice", "alice@example.com"), ("bob", "bob@example.com")] {
            state
                .auth
                .register(Registration {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password_for(username),
                })
                .await
                .expect("Failed to create test user");
        }

        state
            .auth
            .ensure_default_admin(ADMIN_PASSWORD)
            .await
            .expect("Failed to seed admin");

        state
    }

    /// Password given to the fixture users
    pub fn password_for(username: &str) -> String {
        format!("{}-password", username)
    }

    /// Authorization header carrying Basic credentials
    pub fn basic_auth(username: &str, password: &str) -> (HeaderName, HeaderValue) {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        let value = HeaderValue::from_str(&format!("Basic {}", encoded))
            .expect("base64 is a valid header value");
        (header::AUTHORIZATION, value)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        setup_test_app_with(test_settings()).await
    }

    pub async fn setup_test_app_with(settings: Settings) -> Router {
        let _guard = init_test_tracing();

        let state = setup_test_app_state_with(settings).await;
        create_router(state)
    }

    pub async fn setup_test_server() -> TestServer {
        TestServer::new(setup_test_app().await).expect("Failed to start test server")
    }
}
