//! Roles: stored permission bundles, their static defaults and resolution
//! for the current session.

pub mod defaults;
pub mod resolver;
pub mod store;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::database::Document;

pub use defaults::{default_roles, find_default_role, DefaultRole};
pub use resolver::{ResolvedRole, RoleError, RoleResolver, RoleSource};
pub use store::{RoleStore, ROLES_COLLECTION};

/// Slug used when the session carries no role.
pub const DEFAULT_ROLE_SLUG: &str = "reservation";

/// Module access granted to an authenticated user whose role is unknown.
pub const FALLBACK_MODULE_ACCESS: &[&str] = &["dashboard"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "nameBn", alias = "localizedName", default, deserialize_with = "null_as_default")]
    pub localized_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub module_access: Vec<String>,
}

impl Role {
    /// Minimal role for a slug found nowhere: dashboard only, no permissions.
    pub fn minimal(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: slug.to_string(),
            localized_name: slug.to_string(),
            permissions: Vec::new(),
            module_access: FALLBACK_MODULE_ACCESS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Decode a stored role. Roles are edited outside this service, so display
    /// names may be missing; the slug stands in for them.
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        let mut role: Role = serde_json::from_value(Value::Object(document))?;
        if role.name.trim().is_empty() {
            role.name = role.slug.clone();
        }
        if role.localized_name.trim().is_empty() {
            role.localized_name = role.name.clone();
        }
        Ok(role)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
