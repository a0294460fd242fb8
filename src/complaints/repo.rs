use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    comments::repo::CommentRepo,
    complaints::repo_types::{
        Complaint, ComplaintFilter, ComplaintRow, ComplaintUpdate, CreatedComplaint,
        NewComplaint,
    },
    customers::repo::find_or_create_customer,
    db::{PgStore, StoreResult},
};

#[async_trait]
pub trait ComplaintRepo: Send + Sync {
    /// Find-or-create the customer by name, then insert with status `New`.
    /// Both writes commit together; an unknown creator or category surfaces
    /// as `StoreError::ForeignKeyViolation` and leaves no new customer.
    async fn create_complaint(&self, new: &NewComplaint) -> StoreResult<CreatedComplaint>;

    /// Overwrite the editable fields and bump `modified_at`.
    /// `Ok(false)` when no complaint has that id.
    async fn update_complaint(&self, id: i64, update: &ComplaintUpdate) -> StoreResult<bool>;

    async fn get_complaint(&self, id: i64) -> StoreResult<Option<Complaint>>;

    async fn list_complaints(&self, filter: &ComplaintFilter) -> StoreResult<Vec<Complaint>>;

    async fn complaint_exists(&self, id: i64) -> StoreResult<bool>;
}

const SELECT_COMPLAINTS: &str = r#"
    SELECT c.id, c.description, c.priority, c.status, c.created_at, c.modified_at,
           c.customer_id, cu.name AS customer_name, cu.created_at AS customer_created_at,
           c.created_by_id, u.name AS creator_name, u.email AS creator_email,
           u.created_at AS creator_created_at,
           c.category_id, ca.name AS category_name, ca.created_at AS category_created_at
      FROM complaints c
      JOIN customers cu ON cu.id = c.customer_id
      JOIN users u ON u.id = c.created_by_id
      JOIN categories ca ON ca.id = c.category_id
"#;

impl PgStore {
    /// Attach comments to each joined row, preserving row order.
    async fn hydrate(&self, rows: Vec<ComplaintRow>) -> StoreResult<Vec<Complaint>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut by_complaint: HashMap<i64, Vec<_>> = HashMap::new();
        for comment in self.list_comments(&ids).await? {
            by_complaint
                .entry(comment.complaint_id)
                .or_default()
                .push(comment);
        }
        rows.into_iter()
            .map(|row| {
                let comments = by_complaint.remove(&row.id).unwrap_or_default();
                row.into_complaint(comments)
            })
            .collect()
    }
}

#[async_trait]
impl ComplaintRepo for PgStore {
    async fn create_complaint(&self, new: &NewComplaint) -> StoreResult<CreatedComplaint> {
        let mut tx = self.pool.begin().await?;
        let customer = find_or_create_customer(&mut *tx, &new.customer_name).await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO complaints
                (customer_id, description, created_by_id, priority, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(customer.id)
        .bind(&new.description)
        .bind(new.created_by_id)
        .bind(i16::from(new.priority))
        .bind(new.category_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CreatedComplaint {
            id,
            customer_id: customer.id,
        })
    }

    async fn update_complaint(&self, id: i64, update: &ComplaintUpdate) -> StoreResult<bool> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            UPDATE complaints
               SET description = $2,
                   category_id = $3,
                   priority = $4,
                   modified_at = now()
             WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&update.description)
        .bind(update.category_id)
        .bind(i16::from(update.priority))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn get_complaint(&self, id: i64) -> StoreResult<Option<Complaint>> {
        let sql = format!("{SELECT_COMPLAINTS} WHERE c.id = $1");
        let row = sqlx::query_as::<_, ComplaintRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_complaints(&self, filter: &ComplaintFilter) -> StoreResult<Vec<Complaint>> {
        // Column and direction come from closed enums, never from the request.
        let column = filter.sort_by.as_sql();
        let order = filter.sort_order.as_sql();
        let sql = format!(
            "{SELECT_COMPLAINTS}
             WHERE ($1::BIGINT IS NULL OR c.created_by_id = $1)
               AND ($2::BIGINT IS NULL OR c.customer_id = $2)
             ORDER BY c.{column} {order}, c.id {order}"
        );
        let rows = sqlx::query_as::<_, ComplaintRow>(&sql)
            .bind(filter.user_id)
            .bind(filter.customer_id)
            .fetch_all(&self.pool)
            .await?;
        self.hydrate(rows).await
    }

    async fn complaint_exists(&self, id: i64) -> StoreResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM complaints WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
