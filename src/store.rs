//! Lead persistence port.
//!
//! Handlers only see [`LeadStore`]; the PostgreSQL implementation lives in
//! [`crate::db_storage`] and [`MemoryLeadStore`] backs tests and
//! database-less runs.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Lead, NewLead};

/// Upper bound on the number of leads returned by [`LeadStore::list_all`].
pub const LIST_LIMIT: usize = 1000;

/// Store operation that failed, used for logging and response selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Insert,
    List,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Insert => f.write_str("insert"),
            StoreOperation::List => f.write_str("list"),
        }
    }
}

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: StoreOperation,
        #[source]
        source: sqlx::Error,
    },

    /// The backend did not confirm the write.
    #[error("Insert of lead {id} was not acknowledged ({rows} rows affected)")]
    NotAcknowledged { id: Uuid, rows: u64 },
}

impl StoreError {
    pub fn operation(&self) -> StoreOperation {
        match self {
            StoreError::Database { operation, .. } => *operation,
            StoreError::NotAcknowledged { .. } => StoreOperation::Insert,
        }
    }
}

/// Append-only persistence for leads.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Assign an id and timestamp to `lead`, persist it and return the stored record.
    async fn insert(&self, lead: NewLead) -> Result<Lead, StoreError>;

    /// Every stored lead in the backend's natural order, at most [`LIST_LIMIT`].
    async fn list_all(&self) -> Result<Vec<Lead>, StoreError>;
}

/// In-process store holding leads in insertion order.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
    insert_calls: AtomicUsize,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`LeadStore::insert`] has been called.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn insert(&self, lead: NewLead) -> Result<Lead, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let mut leads = self.leads.write().await;
        // Assign under the write lock so created_at follows insertion order.
        let lead = Lead::assign(lead);
        leads.push(lead.clone());

        Ok(lead)
    }

    async fn list_all(&self) -> Result<Vec<Lead>, StoreError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().take(LIST_LIMIT).cloned().collect())
    }
}
