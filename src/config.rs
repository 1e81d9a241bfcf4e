use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use config::{Config, Environment, File};
use domain::store::{SeaOrmCredentialStore, SeaOrmRequestStore};
use domain::{AuthService, CredentialHasher, HashingConfig, RequestService};
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://servicedesk.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_FILTER: &str = "servicedesk=debug,tower_http=debug,axum::rejection=trace";

/// Application settings, layered from defaults, an optional config file and
/// `SERVICEDESK__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    pub log_filter: Option<String>,
    pub request_timeout_secs: u64,
    /// Single allowed CORS origin. CORS is permissive when unset.
    pub cors_allowed_origin: Option<String>,
    pub security: AccessPolicy,
    pub bootstrap: BootstrapSettings,
    pub password_hashing: HashingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_filter: None,
            request_timeout_secs: 30,
            cors_allowed_origin: None,
            security: AccessPolicy::default(),
            bootstrap: BootstrapSettings::default(),
            password_hashing: HashingConfig::default(),
        }
    }
}

/// Who may reach the administrative listing and status endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessPolicy {
    /// When false those endpoints are open to anyone.
    pub enforce_admin_role: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    /// Create the `admin` account on startup when it does not exist
    pub seed_admin: bool,
    pub admin_password: String,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            seed_admin: true,
            admin_password: "admin123".to_string(),
        }
    }
}

/// Transport settings consumed by the router middleware.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub cors_allowed_origin: Option<HeaderValue>,
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise `servicedesk.{toml,yaml,json}`
    /// in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("servicedesk").required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("SERVICEDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        Ok(settings)
    }

    pub fn http(&self) -> Result<HttpSettings> {
        let cors_allowed_origin = self
            .cors_allowed_origin
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()
            .context("cors_allowed_origin is not a valid header value")?;

        Ok(HttpSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            cors_allowed_origin,
        })
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

/// Connect to the configured database and build the application state
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", settings.database_url))?;

    build_app_state(db, settings)
}

/// Wire services over an existing connection
pub fn build_app_state(db: DatabaseConnection, settings: &Settings) -> Result<AppState> {
    let hasher = CredentialHasher::new(&settings.password_hashing)
        .context("Invalid password_hashing settings")?;
    debug!("Password hashing configured: {:?}", settings.password_hashing);

    let auth = AuthService::new(Arc::new(SeaOrmCredentialStore::new(db.clone())), hasher);
    let requests = RequestService::new(Arc::new(SeaOrmRequestStore::new(db.clone())));

    Ok(AppState {
        db,
        auth,
        requests,
        access: settings.security,
        http: settings.http()?,
    })
}
