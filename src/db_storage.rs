use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Lead, NewLead};
use crate::store::{LeadStore, StoreError, StoreOperation, LIST_LIMIT};

/// PostgreSQL-backed lead storage.
///
/// The pool handles its own synchronization, so one `LeadStorage` is shared
/// by every request.
pub struct LeadStorage {
    pool: PgPool,
}

impl LeadStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for LeadStorage {
    async fn insert(&self, lead: NewLead) -> Result<Lead, StoreError> {
        let lead = Lead::assign(lead);

        let result = sqlx::query(
            "INSERT INTO leads (id, name, email, message, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(lead.id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.message)
        .bind(lead.created_at)
        .execute(&self.pool)
        .await
        .map_err(|source| StoreError::Database {
            operation: StoreOperation::Insert,
            source,
        })?;

        if result.rows_affected() != 1 {
            return Err(StoreError::NotAcknowledged {
                id: lead.id,
                rows: result.rows_affected(),
            });
        }

        tracing::debug!("Stored lead {}", lead.id);
        Ok(lead)
    }

    async fn list_all(&self) -> Result<Vec<Lead>, StoreError> {
        // No ORDER BY: rows come back in the table's natural order.
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT id, name, email, message, created_at FROM leads LIMIT $1",
        )
        .bind(LIST_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|source| StoreError::Database {
            operation: StoreOperation::List,
            source,
        })?;

        tracing::debug!("Fetched {} leads", leads.len());
        Ok(leads)
    }
}
