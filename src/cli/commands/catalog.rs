use serde_json::json;

use crate::cli::utils::output_list;
use crate::cli::OutputFormat;
use crate::permissions::{modules, permissions_by_module};

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let grouped = permissions_by_module();
    let as_json = json!({
        "modules": modules(),
        "permissionsByModule": grouped,
    });

    output_list(output_format, modules(), as_json, |module| {
        let keys: Vec<&str> = grouped
            .get(module.key)
            .map(|perms| perms.iter().map(|p| p.key).collect())
            .unwrap_or_default();
        format!("{:<10} {:<20} {}", module.key, module.name, keys.join(", "))
    })
}
