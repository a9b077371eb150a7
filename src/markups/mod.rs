//! Markup rules: free-form pricing adjustments stored as-is.
//!
//! Shapes differ by rule kind (per airline, per priority, ...), so no schema is
//! enforced beyond "a JSON object".

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::database::{Document, DocumentStore, Sort, StoreError, ID_FIELD};

pub const MARKUPS_COLLECTION: &str = "markups";

#[derive(Clone)]
pub struct MarkupStore {
    store: Arc<dyn DocumentStore>,
}

impl MarkupStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<Document>, StoreError> {
        self.store
            .find_sorted(MARKUPS_COLLECTION, &Sort::desc("createdAt"))
            .await
    }

    pub async fn create(&self, mut fields: Document) -> Result<Document, StoreError> {
        fields.remove(ID_FIELD);

        let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);

        self.store.insert_one(MARKUPS_COLLECTION, fields).await
    }
}
