use serde::{Deserialize, Serialize};

use crate::complaints::repo_types::Priority;

/// Body of `POST /api/complaints/create`. An omitted priority means High.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateComplaintRequest {
    pub customername: String,
    pub description: String,
    pub category: i64,
    pub priority: Option<Priority>,
}

/// Body of `PUT /api/complaints/edit/:id`. Every field is mandatory.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditComplaintRequest {
    pub description: String,
    pub category: i64,
    pub priority: Option<Priority>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComplaintsQuery {
    pub user_id: Option<String>,
    pub customer_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ComplaintResponse {
    pub message: &'static str,
    pub complaintid: i64,
}
