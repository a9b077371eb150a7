use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_session_token, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a session token signed with the configured secret")]
    Issue {
        #[arg(long, help = "User identifier (token subject)")]
        user: String,
        #[arg(long, help = "Role slug; omitted means the default role")]
        role: Option<String>,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to configured session expiry)")]
        hours: Option<u64>,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user, role, email, hours } => {
            let security = &config().security;
            let hours = hours.unwrap_or(security.session_expiry_hours);
            let claims = Claims::new(user, role, email, hours);
            let token = generate_session_token(&claims, security)?;

            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    "Session token issued",
                    Some(json!({ "token": token, "expires_at": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
