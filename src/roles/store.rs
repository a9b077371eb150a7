use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info};

use super::{default_roles, Role};
use crate::database::{Document, DocumentStore, Sort, StoreError};

pub const ROLES_COLLECTION: &str = "roles";

/// Access to the persisted `roles` collection.
#[derive(Clone)]
pub struct RoleStore {
    store: Arc<dyn DocumentStore>,
}

impl RoleStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Unique slug index, so concurrent seeding cannot duplicate roles.
    pub async fn ensure_index(&self) -> Result<(), StoreError> {
        self.store.ensure_unique_index(ROLES_COLLECTION, "slug").await
    }

    /// Seed the default roles when the collection is empty. No writes otherwise.
    pub async fn ensure_roles(&self) -> Result<(), StoreError> {
        if self.store.count(ROLES_COLLECTION).await? > 0 {
            return Ok(());
        }

        let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        let mut seed = Vec::with_capacity(default_roles().len());
        for default in default_roles() {
            let mut document = role_document(&default.to_role())?;
            document.insert("createdAt".to_string(), now.clone());
            document.insert("updatedAt".to_string(), now.clone());
            seed.push(document);
        }

        match self.store.insert_many(ROLES_COLLECTION, seed).await {
            Ok(inserted) => {
                info!("Seeded {} default roles", inserted);
                Ok(())
            }
            Err(StoreError::DuplicateKey { key, .. }) => {
                // Another request seeded first.
                debug!("Default roles already seeded ({})", key);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find(&self, slug: &str) -> Result<Option<Role>, StoreError> {
        match self.store.find_one(ROLES_COLLECTION, "slug", slug).await? {
            Some(document) => Ok(Some(Role::from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<Role>, StoreError> {
        self.store
            .find_sorted(ROLES_COLLECTION, &Sort::asc("createdAt"))
            .await?
            .into_iter()
            .map(|document| Role::from_document(document).map_err(StoreError::from))
            .collect()
    }
}

fn role_document(role: &Role) -> Result<Document, StoreError> {
    match serde_json::to_value(role)? {
        Value::Object(document) => Ok(document),
        _ => Ok(Document::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde_json::json;

    fn role_store() -> (Arc<MemoryStore>, RoleStore) {
        let memory = Arc::new(MemoryStore::new());
        (memory.clone(), RoleStore::new(memory))
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (memory, roles) = role_store();
        roles.ensure_roles().await.unwrap();
        roles.ensure_roles().await.unwrap();

        assert_eq!(
            memory.count(ROLES_COLLECTION).await.unwrap(),
            default_roles().len() as u64
        );
    }

    #[tokio::test]
    async fn seeding_skips_non_empty_collection() {
        let (memory, roles) = role_store();
        memory
            .insert_one(ROLES_COLLECTION, json!({ "slug": "custom", "name": "Custom" }).as_object().cloned().unwrap())
            .await
            .unwrap();

        roles.ensure_roles().await.unwrap();

        assert_eq!(memory.count(ROLES_COLLECTION).await.unwrap(), 1);
        assert!(roles.find("admin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeded_documents_carry_timestamps() {
        let (memory, roles) = role_store();
        roles.ensure_roles().await.unwrap();

        let doc = memory.find_one(ROLES_COLLECTION, "slug", "admin").await.unwrap().unwrap();
        assert!(doc.get("createdAt").and_then(Value::as_str).is_some());
        assert_eq!(doc.get("createdAt"), doc.get("updatedAt"));
    }

    #[tokio::test]
    async fn concurrent_seeding_with_index_never_duplicates() {
        let (memory, roles) = role_store();
        roles.ensure_index().await.unwrap();

        let (a, b) = tokio::join!(roles.ensure_roles(), roles.ensure_roles());
        a.unwrap();
        b.unwrap();

        assert_eq!(
            memory.count(ROLES_COLLECTION).await.unwrap(),
            default_roles().len() as u64
        );
    }

    #[tokio::test]
    async fn find_tolerates_roles_without_names() {
        let (memory, roles) = role_store();
        memory
            .insert_one(ROLES_COLLECTION, json!({ "slug": "ops", "nameBn": null }).as_object().cloned().unwrap())
            .await
            .unwrap();

        let role = roles.find("ops").await.unwrap().unwrap();
        assert_eq!(role.name, "ops");
        assert!(role.permissions.is_empty());
    }

    #[tokio::test]
    async fn list_returns_seeded_roles() {
        let (_, roles) = role_store();
        roles.ensure_roles().await.unwrap();

        let listed = roles.list().await.unwrap();
        assert_eq!(listed.len(), default_roles().len());
        assert!(listed.iter().any(|r| r.slug == "reservation"));
    }
}
