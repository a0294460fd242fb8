use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    auth::repo_types::PublicUser, categories::repo::Category, comments::repo_types::Comment,
    customers::repo_types::Customer, db::StoreError,
};

/// Complaint urgency. Stored and serialized as its code (High = 0, Medium = 1,
/// Low = 2); on input the case-insensitive names are accepted as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PriorityRepr", into = "i16")]
pub enum Priority {
    #[default]
    High,
    Medium,
    Low,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriorityRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<PriorityRepr> for Priority {
    type Error = String;

    fn try_from(repr: PriorityRepr) -> Result<Self, Self::Error> {
        match repr {
            PriorityRepr::Code(code) => i16::try_from(code)
                .map_err(|_| format!("invalid priority {code}"))
                .and_then(Priority::try_from),
            PriorityRepr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "high" => Ok(Priority::High),
                "medium" => Ok(Priority::Medium),
                "low" => Ok(Priority::Low),
                _ => Err(format!("invalid priority {name:?}")),
            },
        }
    }
}

impl TryFrom<i16> for Priority {
    type Error = String;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Priority::High),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::Low),
            other => Err(format!("invalid priority {other}")),
        }
    }
}

impl From<Priority> for i16 {
    fn from(p: Priority) -> Self {
        match p {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Handling state. Every complaint starts as `New`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Status {
    #[default]
    New,
    UnderTreatment,
    Solved,
}

impl TryFrom<i16> for Status {
    type Error = String;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Status::New),
            1 => Ok(Status::UnderTreatment),
            2 => Ok(Status::Solved),
            other => Err(format!("invalid status {other}")),
        }
    }
}

impl From<Status> for i16 {
    fn from(s: Status) -> Self {
        match s {
            Status::New => 0,
            Status::UnderTreatment => 1,
            Status::Solved => 2,
        }
    }
}

/// Complaint with its customer, creator, category and comments (newest first).
#[derive(Debug, Clone, Serialize)]
pub struct Complaint {
    pub id: i64,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified_at: OffsetDateTime,
    pub customer_id: i64,
    pub customer: Customer,
    pub created_by_id: i64,
    pub created_by: PublicUser,
    pub category_id: i64,
    pub category: Category,
    pub comments: Vec<Comment>,
}

/// One row of the complaint/customer/user/category join.
#[derive(Debug, FromRow)]
pub struct ComplaintRow {
    pub id: i64,
    pub description: String,
    pub priority: i16,
    pub status: i16,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_created_at: OffsetDateTime,
    pub created_by_id: i64,
    pub creator_name: String,
    pub creator_email: String,
    pub creator_created_at: OffsetDateTime,
    pub category_id: i64,
    pub category_name: String,
    pub category_created_at: OffsetDateTime,
}

impl ComplaintRow {
    pub fn into_complaint(self, comments: Vec<Comment>) -> Result<Complaint, StoreError> {
        Ok(Complaint {
            id: self.id,
            description: self.description,
            priority: Priority::try_from(self.priority).map_err(StoreError::Corrupt)?,
            status: Status::try_from(self.status).map_err(StoreError::Corrupt)?,
            created_at: self.created_at,
            modified_at: self.modified_at,
            customer_id: self.customer_id,
            customer: Customer {
                id: self.customer_id,
                name: self.customer_name,
                created_at: self.customer_created_at,
            },
            created_by_id: self.created_by_id,
            created_by: PublicUser {
                id: self.created_by_id,
                name: self.creator_name,
                email: self.creator_email,
                created_at: self.creator_created_at,
            },
            category_id: self.category_id,
            category: Category {
                id: self.category_id,
                name: self.category_name,
                created_at: self.category_created_at,
            },
            comments,
        })
    }
}

/// Insert request. The customer is resolved by name in the same transaction.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub customer_name: String,
    pub description: String,
    pub category_id: i64,
    pub priority: Priority,
    pub created_by_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedComplaint {
    pub id: i64,
    pub customer_id: i64,
}

/// Fields an edit may overwrite.
#[derive(Debug, Clone)]
pub struct ComplaintUpdate {
    pub description: String,
    pub category_id: i64,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    ModifiedAt,
}

impl SortColumn {
    /// Unknown or missing values fall back to `created_at`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("modified_at") => SortColumn::ModifiedAt,
            _ => SortColumn::CreatedAt,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::CreatedAt => "created_at",
            SortColumn::ModifiedAt => "modified_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Unknown or missing values fall back to `desc`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub user_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
}
