// Manual end-to-end check of the verification flow against real Movider
// credentials. Sends a code to the given number and verifies what you type.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use movider::{MoviderOptions, MoviderService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verification_core::domains::verification::{actions, VerificationContext};
use verification_core::kernel::VerifierDeps;
use verification_core::Config;

#[derive(Parser)]
#[command(name = "verify_cli", about = "Send and verify an OTP for one phone number")]
struct Args {
    /// Phone number in E.164 format, e.g. +15555550100
    phone_number: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,verification_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let service = Arc::new(MoviderService::new(MoviderOptions {
        api_key: config.movider_api_key.clone(),
        api_secret: config.movider_api_secret.clone(),
        sender: config.otp_sender.clone(),
        request_timeout: config.verification.provider_timeout,
    }));

    let ctx = VerificationContext::new(VerifierDeps::movider(service), config.verification);
    let identity = ctx
        .store()
        .register(Some(args.phone_number.clone()), chrono::Utc::now());

    actions::issue_challenge(identity.id, &ctx)
        .await
        .context("Failed to send OTP")?;
    println!("Code sent to {}.", args.phone_number);

    let stdin = io::stdin();
    loop {
        print!("Enter code (or blank to give up): ");
        io::stdout().flush().ok();

        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read code from stdin")?;
        let code = line.trim();
        if code.is_empty() {
            println!("Aborted.");
            return Ok(());
        }

        match actions::verify_code(identity.id, code, &ctx).await {
            Ok(verified) => {
                println!("Phone verified at {}.", verified.verified_at);
                return Ok(());
            }
            Err(e) => println!("{}", e),
        }
    }
}
