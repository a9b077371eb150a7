use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::DocumentStore;
use crate::markups::MarkupStore;
use crate::roles::{RoleResolver, RoleStore};

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub roles: RoleResolver,
    pub markups: MarkupStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            roles: RoleResolver::new(RoleStore::new(store.clone())),
            markups: MarkupStore::new(store.clone()),
            store,
        }
    }

    /// Unique slug index plus the initial seed, run once before serving.
    pub async fn prepare(&self) -> Result<(), crate::database::StoreError> {
        let roles = self.roles.store();
        roles.ensure_index().await?;
        roles.ensure_roles().await
    }
}
