use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::middleware::{applies_to, decide, GateDecision, RouteGateCookies};

#[derive(Args)]
pub struct GateArgs {
    #[arg(help = "Page path, e.g. /dashboard")]
    pub path: String,
    #[arg(long, help = "Treat the onboarding cookie as set")]
    pub onboarded: bool,
    #[arg(long, help = "Treat the login cookie as set")]
    pub logged_in: bool,
}

pub fn handle(args: GateArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let cookies = RouteGateCookies::new(args.onboarded, args.logged_in);
    let gated = applies_to(&args.path);
    let decision = if gated { decide(&args.path, cookies) } else { GateDecision::Allow };

    match output_format {
        OutputFormat::Json => {
            let (action, target) = match decision {
                GateDecision::Allow => ("allow", None),
                GateDecision::Redirect(target) => ("redirect", Some(target)),
            };
            let report = json!({
                "path": args.path,
                "gated": gated,
                "onboardingCompleted": cookies.onboarding_completed,
                "isLoggedIn": cookies.is_logged_in,
                "action": action,
                "target": target,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match decision {
            GateDecision::Allow if !gated => println!("{} -> allow (not gated)", args.path),
            GateDecision::Allow => println!("{} -> allow", args.path),
            GateDecision::Redirect(target) => println!("{} -> redirect {}", args.path, target),
        },
    }
    Ok(())
}
