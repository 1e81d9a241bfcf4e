use std::sync::Arc;

use model::entities::user::{self, Role};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::{DomainError, Result};
use crate::password::CredentialHasher;
use crate::store::{CredentialStore, NewUser};

/// Username of the administrator seeded at bootstrap.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Self-service registration input. The role is never taken from here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    #[validate(length(min = 3, max = 100, message = "Username must be between 3 and 100 characters"))]
    pub username: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: String,
}

/// Result of [`AuthService::ensure_default_admin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminSeed {
    Created(user::Model),
    AlreadyPresent,
}

/// Authentication, principal resolution and registration.
///
/// Both login paths go through this service: [`authenticate`](Self::authenticate)
/// checks a password, [`resolve_current_user`](Self::resolve_current_user) trusts a
/// principal name the transport has already authenticated.
#[derive(Debug, Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: CredentialHasher,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialStore>, hasher: CredentialHasher) -> Self {
        Self {
            credentials,
            hasher,
        }
    }

    /// Verify a username/password pair and return the full user record.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<user::Model> {
        let user = self
            .credentials
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                debug!("Authentication failed: no user named '{}'", username);
                DomainError::UserNotFound(username.to_string())
            })?;

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!("Authentication failed: wrong password for '{}'", username);
            return Err(DomainError::InvalidCredentials);
        }

        debug!("Authenticated '{}' with role {}", user.username, user.role);
        Ok(user)
    }

    /// Look up the user behind an already-authenticated principal. No password check.
    #[instrument(skip(self))]
    pub async fn resolve_current_user(&self, principal: &str) -> Result<user::Model> {
        self.credentials
            .find_by_username(principal)
            .await?
            .ok_or_else(|| DomainError::not_found("User", principal))
    }

    /// Register a new USER account.
    ///
    /// Duplicate username is checked before duplicate email, and both before the
    /// password is hashed.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: Registration) -> Result<user::Model> {
        registration.validate()?;

        if self
            .credentials
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            warn!("Registration rejected: username '{}' taken", registration.username);
            return Err(DomainError::Conflict("Username already exists".to_string()));
        }

        if self
            .credentials
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            warn!("Registration rejected: email for '{}' taken", registration.username);
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let user = self
            .credentials
            .insert(NewUser {
                username: registration.username,
                email: Some(registration.email),
                password_hash,
                role: Role::User,
            })
            .await?;

        info!("Registered user '{}' with ID {}", user.username, user.id);
        Ok(user)
    }

    /// Create the `admin` account with role ADMIN unless a user by that name exists.
    #[instrument(skip(self, password))]
    pub async fn ensure_default_admin(&self, password: &str) -> Result<AdminSeed> {
        if self
            .credentials
            .exists_by_username(DEFAULT_ADMIN_USERNAME)
            .await?
        {
            info!("Admin user already exists");
            return Ok(AdminSeed::AlreadyPresent);
        }

        let password_hash = self.hasher.hash(password)?;
        let admin = self
            .credentials
            .insert(NewUser {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                email: None,
                password_hash,
                role: Role::Admin,
            })
            .await?;

        info!("Default admin user created: username='{}'", admin.username);
        Ok(AdminSeed::Created(admin))
    }
}
