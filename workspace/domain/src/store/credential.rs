use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use model::entities::user::{self, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use tracing::{debug, instrument, warn};

use crate::error::{DomainError, Result};

/// A user record ready to be persisted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// Storage for user records.
#[async_trait]
pub trait CredentialStore: Debug + Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>>;

    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    /// Insert a user. A unique-constraint violation surfaces as [`DomainError::Conflict`].
    async fn insert(&self, new_user: NewUser) -> Result<user::Model>;
}

/// [`CredentialStore`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct SeaOrmCredentialStore {
    db: DatabaseConnection,
}

impl SeaOrmCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username, role = %new_user.role))]
    async fn insert(&self, new_user: NewUser) -> Result<user::Model> {
        let username = new_user.username.clone();
        let active = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        match active.insert(&self.db).await {
            Ok(model) => {
                debug!("Inserted user {} with ID {}", model.username, model.id);
                Ok(model)
            }
            Err(db_error) => match db_error.sql_err() {
                // Lost a race against a concurrent registration.
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    warn!("Unique constraint violated inserting user '{}': {}", username, detail);
                    Err(DomainError::Conflict("Username or email already exists".to_string()))
                }
                _ => Err(db_error.into()),
            },
        }
    }
}
