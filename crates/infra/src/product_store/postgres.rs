//! Postgres-backed product store.
//!
//! Each product is one row in `consumer_products`. The full aggregate (reviews
//! included) lives in the `document` JSONB column; `name` and
//! `available_location` are duplicated into plain columns for the filter query.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolClosed / PoolTimedOut / Io / Tls | `Unavailable` |
//! | ColumnDecode / Decode | `Serialization` |
//! | Database / other | `Backend` |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use farmstand_catalog::Product;
use farmstand_core::ProductId;

use super::r#trait::{ProductStore, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS consumer_products (
    product_id          UUID PRIMARY KEY,
    owner_id            UUID NOT NULL,
    name                TEXT NOT NULL,
    available_location  TEXT NOT NULL,
    document            JSONB NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL,
    updated_at          TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_FILTER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS consumer_products_name_location_idx
    ON consumer_products (name, available_location)
"#;

/// Postgres-backed product store.
///
/// `PostgresProductStore` is `Send + Sync` and cheap to clone; all access goes
/// through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the products table and its filter index if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_TABLE, CREATE_FILTER_INDEX] {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

fn decode_row(row: &PgRow) -> Result<Product, StoreError> {
    let Json(product): Json<Product> = row
        .try_get("document")
        .map_err(|e| StoreError::Serialization(format!("failed to decode product document: {e}")))?;
    Ok(product)
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT document
            FROM consumer_products
            ORDER BY created_at ASC, product_id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode_row).collect()
    }

    #[instrument(skip(self, name, location), fields(product_name = %name, location = %location), err)]
    async fn find_by_filter(&self, name: &str, location: &str) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT document
            FROM consumer_products
            WHERE name = $1 AND available_location = $2
            ORDER BY created_at ASC, product_id ASC
            "#,
        )
        .bind(name)
        .bind(location)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_filter", e))?;

        rows.iter().map(decode_row).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT document FROM consumer_products WHERE product_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO consumer_products
                (product_id, owner_id, name, available_location, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (product_id) DO UPDATE SET
                name = EXCLUDED.name,
                available_location = EXCLUDED.available_location,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.owner().as_uuid())
        .bind(product.name())
        .bind(product.available_location())
        .bind(Json(product))
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM consumer_products WHERE product_id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map SQLx errors to `StoreError` with operation context.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(format!("decode error in {operation}: {err}"))
        }
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            StoreError::Backend(format!(
                "database error in {operation} (code: {code}): {}",
                db_err.message()
            ))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}
