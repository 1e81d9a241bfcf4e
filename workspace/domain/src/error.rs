use model::entities::service_request::ParseStatusError;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Error types for the service desk domain
#[derive(Error, Debug)]
pub enum DomainError {
    /// Input failed a shape or length rule. `message` names the bound.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// No record with the given key
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Username or email already taken
    #[error("{0}")]
    Conflict(String),

    /// Authentication attempted for a username that does not exist
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Status name outside the enumerated set; carries the raw input
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Caller does not own the record it tried to change
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Password hashing primitive failed (bad parameters or corrupt stored hash)
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for failures the caller can do nothing about.
    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Database(_) | DomainError::PasswordHash(_))
    }
}

impl From<ParseStatusError> for DomainError {
    fn from(err: ParseStatusError) -> Self {
        DomainError::InvalidStatus(err.0)
    }
}

impl From<argon2::password_hash::Error> for DomainError {
    fn from(err: argon2::password_hash::Error) -> Self {
        let err = DomainError::PasswordHash(err.to_string());
        error!(?err, "Password hashing failed");
        err
    }
}

// Reports the first failing field in name order, with the message attached to
// its first failing rule.
impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.into_iter().next() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                DomainError::Validation { field, message }
            }
            None => DomainError::validation("request", "Request is invalid"),
        }
    }
}

/// Type alias for Result with DomainError
pub type Result<T> = std::result::Result<T, DomainError>;
