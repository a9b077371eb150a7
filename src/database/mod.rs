//! Document store boundary.
//!
//! Collections hold schemaless JSON objects. Every stored document carries a
//! store-assigned `_id`; callers never choose it.

pub mod manager;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use manager::open_store;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored or to-be-stored JSON object.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Duplicate key '{key}' in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    #[error("Invalid collection or field name: {0}")]
    InvalidName(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Ascending }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Descending }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn count(&self, collection: &str) -> Result<u64, StoreError>;

    /// First document whose string `field` equals `value`.
    async fn find_one(&self, collection: &str, field: &str, value: &str) -> Result<Option<Document>, StoreError>;

    /// All documents of a collection. Ties keep insertion order in the sort direction.
    async fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Document>, StoreError>;

    /// Insert one document, replacing any `_id` with a fresh one. Returns the stored form.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Document, StoreError>;

    /// Insert all documents or none of them.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<u64, StoreError>;

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;
}

/// Strip any caller-supplied identifier and assign a new one.
pub(crate) fn assign_id(mut document: Document) -> Document {
    document.remove(ID_FIELD);
    document.insert(ID_FIELD.to_string(), Value::String(uuid::Uuid::new_v4().to_string()));
    document
}

/// Collection and field names end up in DDL, so only plain identifiers are accepted.
pub(crate) fn validate_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}
