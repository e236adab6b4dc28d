use clap::Subcommand;
use serde_json::json;

use crate::cli::config::session_controller;
use crate::cli::utils::{output_error, output_fields, output_success, read_password};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with email and password")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and clear the cached session")]
    Logout,

    #[command(about = "Show the cached session and subscription")]
    Status,

    #[command(about = "Check whether the current subscription enables a feature")]
    Feature {
        #[arg(help = "Feature name")]
        name: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let controller = session_controller()?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = read_password(password)?;
            let outcome = controller.login(&email, &password).await?;

            let display = if outcome.profile.name.is_empty() { &outcome.profile.email } else { &outcome.profile.name };
            output_success(
                &output_format,
                &format!("Logged in as {}", display),
                Some(json!({
                    "user": outcome.profile,
                    "subscription": outcome.entitlement,
                })),
            )
        }
        AuthCommands::Logout => {
            controller.init().await;
            controller.logout().await;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            controller.init().await;
            let Some(snapshot) = controller.store().snapshot().await else {
                return output_error(&output_format, "Not logged in", Some("NOT_LOGGED_IN"));
            };

            if let OutputFormat::Json = output_format {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            println!("Logged in as {} <{}>", snapshot.profile.name, snapshot.profile.email);
            match &snapshot.entitlement {
                Some(entitlement) => {
                    output_fields(&[
                        ("Package", entitlement.package_name.clone()),
                        ("Premium", entitlement.is_premium.to_string()),
                        ("Credits", entitlement.credits_remaining.to_string()),
                    ]);
                    for (feature, enabled) in &entitlement.features {
                        println!("  [{}] {}", if *enabled { "x" } else { " " }, feature);
                    }
                }
                None => println!("  No active subscription"),
            }
            Ok(())
        }
        AuthCommands::Feature { name } => {
            controller.init().await;
            let enabled = controller.has_feature(&name).await;
            let state = if enabled { "enabled" } else { "disabled" };
            output_success(
                &output_format,
                &format!("Feature '{}' is {}", name, state),
                Some(json!({ "feature": name, "enabled": enabled })),
            )
        }
    }
}
