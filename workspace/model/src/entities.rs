//! Root of the SeaORM entity modules for the service desk.
//! Users and the service requests they submit are the only persisted records.

pub mod service_request;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::service_request::Entity as ServiceRequest;
    pub use super::user::Entity as User;
}
