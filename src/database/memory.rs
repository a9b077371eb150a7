use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{assign_id, validate_name, Document, DocumentStore, Sort, SortDirection, StoreError};

/// Process-local store used for development without a database and in tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    collections: HashMap<String, Vec<Document>>,
    unique_fields: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInner {
    /// Checks `incoming` against stored documents and against each other.
    fn check_unique(&self, collection: &str, incoming: &[Document]) -> Result<(), StoreError> {
        let Some(fields) = self.unique_fields.get(collection) else {
            return Ok(());
        };
        let existing = self.collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        for field in fields {
            let mut seen: Vec<&Value> = existing.iter().filter_map(|doc| doc.get(field)).collect();
            for doc in incoming {
                if let Some(value) = doc.get(field) {
                    if seen.contains(&value) {
                        return Err(StoreError::DuplicateKey {
                            collection: collection.to_string(),
                            key: field.clone(),
                        });
                    }
                    seen.push(value);
                }
            }
        }
        Ok(())
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn find_one(&self, collection: &str, field: &str, value: &str) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }

    async fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        let Some(docs) = inner.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut indexed: Vec<(usize, &Document)> = docs.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            let ordering = compare_values(a.get(&sort.field), b.get(&sort.field)).then(ia.cmp(ib));
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(indexed.into_iter().map(|(_, doc)| doc.clone()).collect())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Document, StoreError> {
        let document = assign_id(document);
        let mut inner = self.inner.write().await;
        inner.check_unique(collection, std::slice::from_ref(&document))?;
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<u64, StoreError> {
        let documents: Vec<Document> = documents.into_iter().map(assign_id).collect();
        let mut inner = self.inner.write().await;
        inner.check_unique(collection, &documents)?;

        let inserted = documents.len() as u64;
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(inserted)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        validate_name(collection)?;
        validate_name(field)?;

        let mut inner = self.inner.write().await;
        let fields = inner.unique_fields.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }
}
