use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle stage of a service request.
///
/// Any status may be set from any other; the set itself is closed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "PENDING")]
    Pending, // Initial state of every new request.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "ON_HOLD")]
    OnHold,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::InProgress => "IN_PROGRESS",
            Status::OnHold => "ON_HOLD",
            Status::Resolved => "RESOLVED",
            Status::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Status`]. Carries the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    /// Parses a status name ignoring ASCII case, so `in_progress` and `IN_PROGRESS`
    /// are the same status. Separators are not normalised: `in-progress` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Status::Pending),
            "IN_PROGRESS" => Ok(Status::InProgress),
            "ON_HOLD" => Ok(Status::OnHold),
            "RESOLVED" => Ok(Status::Resolved),
            "REJECTED" => Ok(Status::Rejected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// A unit of work submitted by a user and triaged by administrators.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Free-form category, 2 to 100 characters.
    pub category: String,

    /// What the submitter needs, 5 to 255 characters.
    pub description: String,

    pub status: Status,

    /// Username of the submitter. Never changes after creation.
    pub created_by: String,

    /// Set once at creation.
    pub created_at: NaiveDateTime,

    /// Null until the first status change, then the time of the latest one.
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
