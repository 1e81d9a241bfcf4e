use std::sync::Arc;

use chrono::Utc;
use model::entities::service_request::{self, Status};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use validator::{Validate, ValidationError};

use crate::error::{DomainError, Result};
use crate::store::{NewServiceRequest, RequestStore};

/// What a caller submits. The submitter identity is supplied separately.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestDraft {
    #[validate(
        custom(function = "not_blank", message = "Category is required"),
        length(min = 2, max = 100, message = "Category must be between 2 and 100 characters")
    )]
    pub category: String,
    #[validate(
        custom(function = "not_blank", message = "Description is required"),
        length(min = 5, max = 255, message = "Description must be between 5 and 255 characters")
    )]
    pub description: String,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Creation, listing, status transitions and deletion of service requests.
///
/// Transitions are unrestricted: any status can be set from any status.
/// [`list_all`](Self::list_all) and [`update_status`](Self::update_status) do no
/// access control of their own; callers decide who may reach them.
#[derive(Debug, Clone)]
pub struct RequestService {
    requests: Arc<dyn RequestStore>,
}

impl RequestService {
    pub fn new(requests: Arc<dyn RequestStore>) -> Self {
        Self { requests }
    }

    /// Submit a new request as `created_by`, which must come from the authenticated caller.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: RequestDraft, created_by: &str) -> Result<service_request::Model> {
        draft.validate()?;

        let created = self
            .requests
            .insert(NewServiceRequest {
                category: draft.category,
                description: draft.description,
                created_by: created_by.to_string(),
                created_at: Utc::now().naive_utc(),
            })
            .await?;

        info!("Service request {} created by '{}'", created.id, created.created_by);
        Ok(created)
    }

    /// Every request in the system.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<service_request::Model>> {
        let all = self.requests.find_all().await?;
        debug!("Retrieved {} service requests", all.len());
        Ok(all)
    }

    /// Requests whose `created_by` equals `username`.
    #[instrument(skip(self))]
    pub async fn list_by_owner(&self, username: &str) -> Result<Vec<service_request::Model>> {
        let owned = self.requests.find_by_created_by(username).await?;
        debug!("Retrieved {} service requests owned by '{}'", owned.len(), username);
        Ok(owned)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<service_request::Model> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service request", id))
    }

    /// Set the status named by `status_name` (ASCII case-insensitive) and stamp `updated_at`.
    ///
    /// The name is parsed before the record is looked up, so an unknown status
    /// is reported even for a missing id and never touches the store.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i32, status_name: &str) -> Result<service_request::Model> {
        let status: Status = status_name.parse().map_err(|e| {
            warn!("Rejected status '{}' for service request {}", status_name, id);
            DomainError::from(e)
        })?;

        let existing = self.get_by_id(id).await?;
        let previous = existing.status;
        let updated = self
            .requests
            .set_status(existing, status, Utc::now().naive_utc())
            .await?;

        info!("Service request {} moved from {} to {}", id, previous, updated.status);
        Ok(updated)
    }

    /// Delete a request on behalf of `requesting_username`. Only the owner may delete;
    /// there is no administrator override.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32, requesting_username: &str) -> Result<()> {
        let existing = self.get_by_id(id).await?;

        if existing.created_by != requesting_username {
            warn!(
                "'{}' tried to delete service request {} owned by '{}'",
                requesting_username, id, existing.created_by
            );
            return Err(DomainError::Forbidden(
                "You are not allowed to delete this request".to_string(),
            ));
        }

        if !self.requests.delete_by_id(id).await? {
            // Removed between the ownership check and the delete.
            return Err(DomainError::not_found("Service request", id));
        }

        info!("Service request {} deleted by '{}'", id, requesting_username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{draft, setup_services};

    fn assert_validation(result: Result<service_request::Model>, expected_field: &str) -> String {
        match result {
            Err(DomainError::Validation { field, message }) => {
                assert_eq!(field, expected_field);
                message
            }
            other => panic!("expected Validation on {}, got {:?}", expected_field, other),
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending_without_updated_at() {
        let (_, _, requests) = setup_services().await;

        let created = requests
            .create(draft("Plumbing", "Leaky faucet"), "alice")
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.status, Status::Pending);
        assert_eq!(created.created_by, "alice");
        assert!(created.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_create_accepts_boundary_lengths() {
        let (_, _, requests) = setup_services().await;

        let shortest = requests.create(draft("ab", "abcde"), "alice").await.unwrap();
        assert_eq!(shortest.category, "ab");

        let longest = requests
            .create(draft(&"c".repeat(100), &"d".repeat(255)), "alice")
            .await
            .unwrap();
        assert_eq!(longest.category.len(), 100);
        assert_eq!(longest.description.len(), 255);
    }

    #[tokio::test]
    async fn test_create_rejects_category_out_of_bounds() {
        let (_, _, requests) = setup_services().await;

        let message = assert_validation(requests.create(draft("a", "Leaky faucet"), "alice").await, "category");
        assert_eq!(message, "Category must be between 2 and 100 characters");

        let message = assert_validation(
            requests.create(draft(&"c".repeat(101), "Leaky faucet"), "alice").await,
            "category",
        );
        assert_eq!(message, "Category must be between 2 and 100 characters");

        assert_validation(requests.create(draft("", "Leaky faucet"), "alice").await, "category");
        assert!(requests.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_description_out_of_bounds() {
        let (_, _, requests) = setup_services().await;

        let message = assert_validation(requests.create(draft("Plumbing", "Leak"), "alice").await, "description");
        assert_eq!(message, "Description must be between 5 and 255 characters");

        assert_validation(
            requests.create(draft("Plumbing", &"d".repeat(256)), "alice").await,
            "description",
        );

        let message = assert_validation(requests.create(draft("Plumbing", "       "), "alice").await, "description");
        assert_eq!(message, "Description is required");
    }

    #[tokio::test]
    async fn test_list_by_owner_only_returns_own_requests() {
        let (_, _, requests) = setup_services().await;
        requests.create(draft("Plumbing", "Leaky faucet"), "alice").await.unwrap();
        requests.create(draft("Electrical", "Flickering lights"), "bob").await.unwrap();
        requests.create(draft("Heating", "Radiator is cold"), "alice").await.unwrap();

        let alice = requests.list_by_owner("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.created_by == "alice"));
        assert_eq!(alice[0].category, "Plumbing");
        assert_eq!(alice[1].category, "Heating");

        assert_eq!(requests.list_all().await.unwrap().len(), 3);
        assert!(requests.list_by_owner("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_is_case_insensitive_and_stamps_updated_at() {
        let (_, _, requests) = setup_services().await;
        let created = requests.create(draft("Plumbing", "Leaky faucet"), "alice").await.unwrap();

        let lower = requests.update_status(created.id, "resolved").await.unwrap();
        assert_eq!(lower.status, Status::Resolved);
        let first_stamp = lower.updated_at.expect("updated_at set on transition");
        assert!(first_stamp >= created.created_at);

        let upper = requests.update_status(created.id, "RESOLVED").await.unwrap();
        assert_eq!(upper.status, lower.status);
        assert_eq!(upper.created_at, created.created_at);
        assert!(upper.updated_at.unwrap() >= first_stamp);
    }

    #[tokio::test]
    async fn test_update_status_allows_any_transition() {
        let (_, _, requests) = setup_services().await;
        let created = requests.create(draft("Plumbing", "Leaky faucet"), "alice").await.unwrap();

        for name in ["rejected", "pending", "on_hold", "in_progress", "resolved", "pending"] {
            let updated = requests.update_status(created.id, name).await.unwrap();
            assert_eq!(updated.status, name.parse::<Status>().unwrap());
        }
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_status_and_leaves_record() {
        let (_, _, requests) = setup_services().await;
        let created = requests.create(draft("Plumbing", "Leaky faucet"), "alice").await.unwrap();

        match requests.update_status(created.id, "bogus").await {
            Err(DomainError::InvalidStatus(raw)) => assert_eq!(raw, "bogus"),
            other => panic!("expected InvalidStatus, got {:?}", other),
        }

        let unchanged = requests.get_by_id(created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_status_missing_id_is_not_found() {
        let (_, _, requests) = setup_services().await;

        assert!(matches!(
            requests.update_status(999, "resolved").await,
            Err(DomainError::NotFound { .. })
        ));
        // Parse errors win over missing ids.
        assert!(matches!(
            requests.update_status(999, "bogus").await,
            Err(DomainError::InvalidStatus(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_owner_succeeds() {
        let (_, _, requests) = setup_services().await;
        let created = requests.create(draft("Plumbing", "Leaky faucet"), "alice").await.unwrap();

        requests.delete(created.id, "alice").await.unwrap();

        assert!(matches!(
            requests.get_by_id(created.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden_and_keeps_record() {
        let (_, _, requests) = setup_services().await;
        let created = requests.create(draft("Plumbing", "Leaky faucet"), "alice").await.unwrap();
        let in_progress = requests.update_status(created.id, "in_progress").await.unwrap();

        assert!(matches!(
            requests.delete(created.id, "bob").await,
            Err(DomainError::Forbidden(_))
        ));
        // Administrators get no override either.
        assert!(matches!(
            requests.delete(created.id, "admin").await,
            Err(DomainError::Forbidden(_))
        ));

        let still_there = requests.get_by_id(created.id).await.unwrap();
        assert_eq!(still_there, in_progress);
        assert_eq!(still_there.status, Status::InProgress);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let (_, _, requests) = setup_services().await;

        assert!(matches!(
            requests.delete(42, "alice").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
