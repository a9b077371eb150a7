// handlers/api/permissions.rs - GET /api/permissions handler

use std::collections::BTreeMap;

use axum::response::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::permissions::{self, Module, Permission};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionCatalog {
    success: bool,
    modules: &'static [Module],
    permissions: &'static [Permission],
    permissions_by_module: BTreeMap<&'static str, Vec<&'static Permission>>,
}

/// GET /api/permissions - Full module and permission catalog
pub async fn permissions_get() -> Result<Json<Value>, ApiError> {
    let catalog = PermissionCatalog {
        success: true,
        modules: permissions::modules(),
        permissions: permissions::permissions(),
        permissions_by_module: permissions::permissions_by_module(),
    };

    serde_json::to_value(catalog).map(Json).map_err(|e| {
        tracing::error!("Failed to serialize permission catalog: {}", e);
        ApiError::internal_server_error("Failed to load permission catalog")
    })
}
