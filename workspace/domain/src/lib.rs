//! Business rules of the service desk: who a caller is, and what may happen
//! to a service request over its lifetime.

pub mod auth;
pub mod error;
pub mod lifecycle;
pub mod password;
pub mod store;

#[cfg(test)]
mod testing;

pub use auth::{AdminSeed, AuthService, Registration, DEFAULT_ADMIN_USERNAME};
pub use error::{DomainError, Result};
pub use lifecycle::{RequestDraft, RequestService};
pub use password::{CredentialHasher, HashingConfig};
