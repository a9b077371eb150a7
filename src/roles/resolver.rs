use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::{find_default_role, Role, RoleStore, DEFAULT_ROLE_SLUG};
use crate::database::StoreError;
use crate::middleware::SessionUser;

/// Where a resolved role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    Store,
    Default,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub slug: String,
    pub name: String,
    #[serde(rename = "nameBn")]
    pub localized_name: String,
    pub source: RoleSource,
}

/// Effective role for a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRole {
    pub role: RoleSummary,
    pub permissions: Vec<String>,
    pub module_access: Vec<String>,
}

impl ResolvedRole {
    fn from_role(role: Role, source: RoleSource) -> Self {
        Self {
            role: RoleSummary {
                slug: role.slug,
                name: role.name,
                localized_name: role.localized_name,
                source,
            },
            permissions: role.permissions,
            module_access: role.module_access,
        }
    }
}

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to fetch role")]
    FetchFailed(#[source] StoreError),
}

impl IntoResponse for RoleError {
    fn into_response(self) -> Response {
        let status = match &self {
            RoleError::Unauthorized => StatusCode::UNAUTHORIZED,
            RoleError::FetchFailed(e) => {
                error!("Role lookup failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Empty lists let callers skip null checks on failure.
        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
                "permissions": [],
                "moduleAccess": []
            })),
        )
            .into_response()
    }
}

/// One step of the resolution chain.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn lookup(&self, slug: &str) -> Result<Option<ResolvedRole>, StoreError>;
}

pub struct StoredRoleLookup(pub RoleStore);

#[async_trait]
impl RoleLookup for StoredRoleLookup {
    async fn lookup(&self, slug: &str) -> Result<Option<ResolvedRole>, StoreError> {
        Ok(self
            .0
            .find(slug)
            .await?
            .map(|role| ResolvedRole::from_role(role, RoleSource::Store)))
    }
}

/// Static defaults. Results are never written back to the store.
pub struct DefaultRoleLookup;

#[async_trait]
impl RoleLookup for DefaultRoleLookup {
    async fn lookup(&self, slug: &str) -> Result<Option<ResolvedRole>, StoreError> {
        Ok(find_default_role(slug).map(|d| ResolvedRole::from_role(d.to_role(), RoleSource::Default)))
    }
}

/// Store, then static defaults, then a minimal dashboard-only role.
#[derive(Clone)]
pub struct RoleResolver {
    store: RoleStore,
    lookups: Arc<Vec<Box<dyn RoleLookup>>>,
}

impl RoleResolver {
    pub fn new(store: RoleStore) -> Self {
        let lookups: Vec<Box<dyn RoleLookup>> =
            vec![Box::new(StoredRoleLookup(store.clone())), Box::new(DefaultRoleLookup)];
        Self {
            store,
            lookups: Arc::new(lookups),
        }
    }

    pub fn store(&self) -> &RoleStore {
        &self.store
    }

    pub async fn resolve(&self, identity: Option<&SessionUser>) -> Result<ResolvedRole, RoleError> {
        let identity = identity.ok_or(RoleError::Unauthorized)?;
        let slug = identity.role.as_deref().unwrap_or(DEFAULT_ROLE_SLUG);

        self.store.ensure_roles().await.map_err(RoleError::FetchFailed)?;

        for lookup in self.lookups.iter() {
            if let Some(resolved) = lookup.lookup(slug).await.map_err(RoleError::FetchFailed)? {
                debug!("Resolved role '{}' for user {} from {:?}", slug, identity.user_id, resolved.role.source);
                return Ok(resolved);
            }
        }

        warn!("Unknown role '{}' for user {}, granting minimal access", slug, identity.user_id);
        Ok(ResolvedRole::from_role(Role::minimal(slug), RoleSource::Fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DocumentStore, MemoryStore};
    use crate::roles::ROLES_COLLECTION;
    use serde_json::json;

    fn session(role: Option<&str>) -> SessionUser {
        SessionUser {
            user_id: "user-1".to_string(),
            role: role.map(str::to_string),
            email: None,
        }
    }

    fn resolver() -> (Arc<MemoryStore>, RoleResolver) {
        let memory = Arc::new(MemoryStore::new());
        let resolver = RoleResolver::new(RoleStore::new(memory.clone()));
        (memory, resolver)
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let (_, resolver) = resolver();
        assert!(matches!(resolver.resolve(None).await, Err(RoleError::Unauthorized)));
    }

    #[tokio::test]
    async fn missing_role_claim_uses_reservation() {
        let (_, resolver) = resolver();
        let resolved = resolver.resolve(Some(&session(None))).await.unwrap();
        assert_eq!(resolved.role.slug, DEFAULT_ROLE_SLUG);
        assert_eq!(resolved.role.source, RoleSource::Store);
    }

    #[tokio::test]
    async fn stored_role_wins_over_defaults() {
        let (memory, resolver) = resolver();
        memory
            .insert_one(
                ROLES_COLLECTION,
                json!({
                    "slug": "admin",
                    "name": "Admin",
                    "permissions": ["markup.view"],
                    "moduleAccess": ["markups"]
                })
                .as_object()
                .cloned()
                .unwrap(),
            )
            .await
            .unwrap();

        let resolved = resolver.resolve(Some(&session(Some("admin")))).await.unwrap();
        assert_eq!(resolved.permissions, vec!["markup.view"]);
        assert_eq!(resolved.module_access, vec!["markups"]);
        assert_eq!(resolved.role.source, RoleSource::Store);
    }

    #[tokio::test]
    async fn stored_role_without_names_still_resolves() {
        let (memory, resolver) = resolver();
        memory
            .insert_one(
                ROLES_COLLECTION,
                json!({ "slug": "ops", "permissions": ["report.view"], "moduleAccess": ["reports"] })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();
        memory
            .insert_one(
                ROLES_COLLECTION,
                json!({ "slug": "audit", "name": null, "nameBn": null, "permissions": null })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();

        let ops = resolver.resolve(Some(&session(Some("ops")))).await.unwrap();
        assert_eq!(ops.role.source, RoleSource::Store);
        assert_eq!(ops.role.name, "ops");
        assert_eq!(ops.permissions, vec!["report.view"]);
        assert_eq!(ops.module_access, vec!["reports"]);

        let audit = resolver.resolve(Some(&session(Some("audit")))).await.unwrap();
        assert_eq!(audit.role.source, RoleSource::Store);
        assert_eq!(audit.role.localized_name, "audit");
        assert!(audit.permissions.is_empty());
    }

    #[tokio::test]
    async fn default_table_fills_gaps_without_persisting() {
        let (memory, resolver) = resolver();
        memory
            .insert_one(ROLES_COLLECTION, json!({ "slug": "custom", "name": "Custom" }).as_object().cloned().unwrap())
            .await
            .unwrap();

        let resolved = resolver.resolve(Some(&session(Some("agent")))).await.unwrap();
        let expected = find_default_role("agent").unwrap().to_role();

        assert_eq!(resolved.role.source, RoleSource::Default);
        assert_eq!(resolved.permissions, expected.permissions);
        assert_eq!(resolved.module_access, expected.module_access);
        assert!(memory.find_one(ROLES_COLLECTION, "slug", "agent").await.unwrap().is_none());
        assert_eq!(memory.count(ROLES_COLLECTION).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_role_gets_dashboard_only() {
        let (_, resolver) = resolver();
        let resolved = resolver.resolve(Some(&session(Some("night_auditor")))).await.unwrap();

        assert_eq!(resolved.role.slug, "night_auditor");
        assert_eq!(resolved.role.name, "night_auditor");
        assert_eq!(resolved.role.source, RoleSource::Fallback);
        assert!(resolved.permissions.is_empty());
        assert_eq!(resolved.module_access, vec!["dashboard"]);
    }
}
