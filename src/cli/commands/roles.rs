use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{open_store, DocumentStore};
use crate::roles::{RoleStore, ROLES_COLLECTION};

#[derive(Subcommand)]
pub enum RoleCommands {
    #[command(about = "Create the slug index and seed default roles into an empty collection")]
    Seed,

    #[command(about = "List stored roles")]
    List,
}

pub async fn handle(cmd: RoleCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&config().database).await?;
    let roles = RoleStore::new(store.clone());

    match cmd {
        RoleCommands::Seed => {
            roles.ensure_index().await?;
            roles.ensure_roles().await?;
            let count = store.count(ROLES_COLLECTION).await?;
            output_success(
                output_format,
                &format!("{} roles present", count),
                Some(json!({ "count": count })),
            )
        }
        RoleCommands::List => {
            let listed = roles.list().await?;
            let as_json = serde_json::to_value(&listed)?;
            output_list(output_format, &listed, as_json, |role| {
                format!(
                    "{:<14} {:<14} {:>2} permissions  modules: {}",
                    role.slug,
                    role.name,
                    role.permissions.len(),
                    role.module_access.join(",")
                )
            })
        }
    }
}
