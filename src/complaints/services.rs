use tracing::{info, warn};

use crate::{
    complaints::{
        dto::{CreateComplaintRequest, EditComplaintRequest, ListComplaintsQuery},
        repo::ComplaintRepo,
        repo_types::{ComplaintFilter, ComplaintUpdate, NewComplaint, SortColumn, SortOrder},
    },
    customers::handlers::customer_name_too_long,
    db::{name_fits, Store, StoreError},
    error::{AppError, AppResult},
};

/// Parse a complaint id taken from the URL.
pub fn parse_complaint_id(raw: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation("Invalid complaint ID format")),
    }
}

fn parse_filter_id(raw: Option<&str>, name: &str) -> AppResult<Option<i64>> {
    match raw {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid {name} filter"))),
    }
}

pub fn build_filter(query: &ListComplaintsQuery) -> AppResult<ComplaintFilter> {
    Ok(ComplaintFilter {
        user_id: parse_filter_id(query.user_id.as_deref(), "userId")?,
        customer_id: parse_filter_id(query.customer_id.as_deref(), "customerId")?,
        sort_by: SortColumn::parse(query.sort_by.as_deref()),
        sort_order: SortOrder::parse(query.sort_order.as_deref()),
    })
}

/// Only the category reference is caller-supplied; any other dangling
/// reference is a server fault.
fn map_reference_error(err: StoreError, action: &str) -> AppError {
    match err {
        StoreError::ForeignKeyViolation(constraint) if constraint.contains("category") => {
            AppError::validation("Category does not exist")
        }
        other => AppError::internal(action, other),
    }
}

pub async fn create_complaint(
    store: &dyn Store,
    req: CreateComplaintRequest,
    caller_id: i64,
) -> AppResult<i64> {
    if req.customername.is_empty() || req.description.is_empty() || req.category == 0 {
        warn!("complaint without customer, description or category");
        return Err(AppError::validation("Customer and description is required"));
    }

    if !name_fits(&req.customername) {
        return Err(customer_name_too_long());
    }

    let created = store
        .create_complaint(&NewComplaint {
            customer_name: req.customername,
            description: req.description,
            category_id: req.category,
            priority: req.priority.unwrap_or_default(),
            created_by_id: caller_id,
        })
        .await
        .map_err(|e| map_reference_error(e, "Failed to create complaint"))?;

    info!(
        complaint_id = created.id,
        customer_id = created.customer_id,
        user_id = caller_id,
        "complaint created"
    );
    Ok(created.id)
}

pub async fn edit_complaint(store: &dyn Store, id: i64, req: EditComplaintRequest) -> AppResult<()> {
    let priority = match req.priority {
        Some(p) if !req.description.is_empty() && req.category != 0 => p,
        _ => {
            return Err(AppError::validation(
                "Description, priority and category is required",
            ))
        }
    };

    let update = ComplaintUpdate {
        description: req.description,
        category_id: req.category,
        priority,
    };
    let found = store
        .update_complaint(id, &update)
        .await
        .map_err(|e| map_reference_error(e, "Failed to update complaint"))?;
    if !found {
        return Err(AppError::not_found("Complaint not found"));
    }

    info!(complaint_id = id, "complaint updated");
    Ok(())
}
