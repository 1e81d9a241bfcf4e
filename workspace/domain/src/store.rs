//! Persistence seams for the service desk.
//!
//! Services depend on the traits; the SeaORM implementations are the only ones
//! shipped, and tests run them against in-memory SQLite.

pub mod credential;
pub mod request;

pub use credential::{CredentialStore, NewUser, SeaOrmCredentialStore};
pub use request::{NewServiceRequest, RequestStore, SeaOrmRequestStore};
