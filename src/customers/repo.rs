use async_trait::async_trait;
use sqlx::PgConnection;

use crate::{
    customers::repo_types::Customer,
    db::{PgStore, StoreResult},
};

#[async_trait]
pub trait CustomerRepo: Send + Sync {
    /// Plain insert; a taken name surfaces as `StoreError::UniqueViolation`.
    async fn create_customer(&self, name: &str) -> StoreResult<Customer>;

    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;
}

/// Find-or-create by exact name on `conn`. Run inside the caller's
/// transaction so a failed complaint insert also drops a new customer.
pub(crate) async fn find_or_create_customer(
    conn: &mut PgConnection,
    name: &str,
) -> StoreResult<Customer> {
    let existing = sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, created_at
        FROM customers
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(customer) = existing {
        return Ok(customer);
    }

    // The no-op update makes RETURNING yield the existing row when a racing
    // request inserted the name first.
    let customer = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name, created_at
        "#,
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(customer)
}

#[async_trait]
impl CustomerRepo for PgStore {
    async fn create_customer(&self, name: &str) -> StoreResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, created_at
            FROM customers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
