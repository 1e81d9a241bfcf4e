//! Fixtures shared by the domain unit tests.

use std::sync::{Arc, Once};

use migration::{Migrator, MigratorTrait};
use model::entities::user;
use sea_orm::{Database, DatabaseConnection};

use crate::auth::{AuthService, Registration};
use crate::lifecycle::{RequestDraft, RequestService};
use crate::password::{CredentialHasher, HashingConfig};
use crate::store::{SeaOrmCredentialStore, SeaOrmRequestStore};

static INIT_TRACING: Once = Once::new();

/// Smallest Argon2 cost the crate accepts, so tests do not spend seconds hashing.
pub fn cheap_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

pub async fn setup_db() -> DatabaseConnection {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn setup_services() -> (DatabaseConnection, AuthService, RequestService) {
    let db = setup_db().await;
    let hasher = CredentialHasher::new(&cheap_hashing()).expect("cheap params are valid");
    let auth = AuthService::new(Arc::new(SeaOrmCredentialStore::new(db.clone())), hasher);
    let requests = RequestService::new(Arc::new(SeaOrmRequestStore::new(db.clone())));
    (db, auth, requests)
}

pub async fn register(auth: &AuthService, username: &str, email: &str, password: &str) -> user::Model {
    auth.register(Registration {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
    .await
    .expect("Failed to register test user")
}

pub fn draft(category: &str, description: &str) -> RequestDraft {
    RequestDraft {
        category: category.to_string(),
        description: description.to_string(),
    }
}
