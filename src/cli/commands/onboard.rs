use clap::Subcommand;
use serde_json::json;

use crate::cli::config::session_controller;
use crate::cli::utils::{output_fields, output_success, read_password};
use crate::cli::OutputFormat;
use crate::onboarding::{AgeInput, InstructionInput, LocationInput, RegisterRequest, INSTRUCTION_LEVELS, REGIONS};

#[derive(Subcommand)]
pub enum OnboardCommands {
    #[command(about = "List instruction levels, regions and provinces")]
    Options,

    #[command(about = "Create an account from onboarding answers")]
    Register {
        #[arg(long, help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Full name")]
        name: String,
        #[arg(long, help = "Age in years")]
        age: String,
        #[arg(long, help = "Instruction level, e.g. Escolar")]
        category: String,
        #[arg(long, help = "Instruction option, required for levels that have options")]
        option: Option<String>,
        #[arg(long, help = "Region")]
        region: String,
        #[arg(long, help = "Province within the region")]
        province: String,
    },
}

pub async fn handle(cmd: OnboardCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        OnboardCommands::Options => {
            if let OutputFormat::Json = output_format {
                let catalog = json!({ "instructionLevels": INSTRUCTION_LEVELS, "regions": REGIONS });
                println!("{}", serde_json::to_string_pretty(&catalog)?);
                return Ok(());
            }

            println!("Instruction levels:");
            for level in INSTRUCTION_LEVELS {
                println!("  {}", level.category);
                for option in level.options {
                    println!("    - {}", option);
                }
            }
            println!("Regions:");
            for region in REGIONS {
                println!("  {}: {}", region.name, region.provinces.join(", "));
            }
            Ok(())
        }
        OnboardCommands::Register { email, password, name, age, category, option, region, province } => {
            let request = RegisterRequest {
                email,
                password: read_password(password)?,
                name,
                age: Some(AgeInput::Text(age)),
                instruction: InstructionInput { category, option },
                location: LocationInput { region, province },
            };
            // Checked locally first so bad answers never reach the provider
            let answers = request.validate().map_err(|failure| {
                let mut fields: Vec<String> =
                    failure.field_errors.iter().map(|(field, error)| format!("{}: {}", field, error)).collect();
                fields.sort();
                anyhow::anyhow!("{} ({})", failure.message(), fields.join("; "))
            })?;

            let controller = session_controller()?;
            let user = controller.register_with_onboarding(&request).await?;
            let snapshot = controller.seed_session(&user, &answers).await;

            if let OutputFormat::Text = output_format {
                println!("✓ Registered {}", snapshot.profile.email);
                output_fields(&[
                    ("Id", user.id.to_string()),
                    ("Package", snapshot.entitlement.as_ref().map(|e| e.package_name.clone()).unwrap_or_default()),
                ]);
                return Ok(());
            }
            output_success(
                &output_format,
                "User registered successfully",
                Some(json!({ "user": { "id": user.id, "email": user.email }, "subscription": snapshot.entitlement })),
            )
        }
    }
}
