use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use model::entities::service_request::{self, Status};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, instrument};

use crate::error::{DomainError, Result};

/// A validated service request about to be persisted.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub category: String,
    pub description: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

/// Storage for service requests. Listings are ordered by id.
#[async_trait]
pub trait RequestStore: Debug + Send + Sync {
    /// Persist a new request with status PENDING and no `updated_at`.
    async fn insert(&self, new_request: NewServiceRequest) -> Result<service_request::Model>;

    async fn find_all(&self) -> Result<Vec<service_request::Model>>;

    async fn find_by_created_by(&self, username: &str) -> Result<Vec<service_request::Model>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<service_request::Model>>;

    /// Write `status` and `updated_at` onto an existing record.
    ///
    /// Only those two columns are written, so concurrent status changes to the
    /// same id are last-write-wins. A row deleted in the meantime is `NotFound`.
    async fn set_status(
        &self,
        existing: service_request::Model,
        status: Status,
        updated_at: NaiveDateTime,
    ) -> Result<service_request::Model>;

    /// Returns false when no row had that id.
    async fn delete_by_id(&self, id: i32) -> Result<bool>;
}

/// [`RequestStore`] backed by the `service_requests` table.
#[derive(Debug, Clone)]
pub struct SeaOrmRequestStore {
    db: DatabaseConnection,
}

impl SeaOrmRequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequestStore for SeaOrmRequestStore {
    #[instrument(skip(self, new_request), fields(created_by = %new_request.created_by))]
    async fn insert(&self, new_request: NewServiceRequest) -> Result<service_request::Model> {
        let active = service_request::ActiveModel {
            category: Set(new_request.category),
            description: Set(new_request.description),
            status: Set(Status::Pending),
            created_by: Set(new_request.created_by),
            created_at: Set(new_request.created_at),
            updated_at: Set(None),
            ..Default::default()
        };
        let model = active.insert(&self.db).await?;
        debug!("Inserted service request with ID {}", model.id);
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<service_request::Model>> {
        let all = service_request::Entity::find()
            .order_by_asc(service_request::Column::Id)
            .all(&self.db)
            .await?;
        Ok(all)
    }

    #[instrument(skip(self))]
    async fn find_by_created_by(&self, username: &str) -> Result<Vec<service_request::Model>> {
        let owned = service_request::Entity::find()
            .filter(service_request::Column::CreatedBy.eq(username))
            .order_by_asc(service_request::Column::Id)
            .all(&self.db)
            .await?;
        Ok(owned)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<service_request::Model>> {
        let found = service_request::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found)
    }

    #[instrument(skip(self, existing), fields(id = existing.id))]
    async fn set_status(
        &self,
        existing: service_request::Model,
        status: Status,
        updated_at: NaiveDateTime,
    ) -> Result<service_request::Model> {
        let id = existing.id;
        let mut active: service_request::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Some(updated_at));

        match active.update(&self.db).await {
            Ok(model) => Ok(model),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("Service request", id)),
            Err(db_error) => Err(db_error.into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i32) -> Result<bool> {
        let result = service_request::Entity::delete_by_id(id).exec(&self.db).await?;
        debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
        Ok(result.rows_affected > 0)
    }
}
