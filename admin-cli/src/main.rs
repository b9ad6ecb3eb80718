mod secret;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use waymark::admin::{hash_password, AdminGate};
use waymark::AppConfig;
use zeroize::Zeroizing;

/// bcrypt work factor used when none is given.
const DEFAULT_COST: u32 = 12;

#[derive(Parser)]
#[command(name = "waymark-admin")]
#[command(about = "Admin CLI for the Waymark admin gate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for a password and print its bcrypt hash
    HashPassword {
        /// bcrypt cost factor (4-31)
        #[arg(long, default_value_t = DEFAULT_COST)]
        cost: u32,
    },
    /// Print a random base64 token signing secret
    GenSecret {
        /// Number of random bytes
        #[arg(long, default_value_t = secret::DEFAULT_SECRET_BYTES)]
        bytes: usize,
    },
    /// Mint a session token from the current configuration
    IssueToken,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { cost } => hash_password_command(cost),
        Commands::GenSecret { bytes } => {
            let secret = secret::generate_secret(bytes)?;
            println!("{}", secret.as_str());
            eprintln!("Set it as WAYMARK_ADMIN__TOKEN_SECRET");
            Ok(())
        }
        Commands::IssueToken => issue_token_command(),
    }
}

fn hash_password_command(cost: u32) -> anyhow::Result<()> {
    let password = Zeroizing::new(
        rpassword::read_password_from_tty(Some("Admin password: "))
            .context("Failed to read password")?,
    );
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    let confirm = Zeroizing::new(
        rpassword::read_password_from_tty(Some("Confirm password: "))
            .context("Failed to read password")?,
    );
    if *password != *confirm {
        bail!("Passwords do not match");
    }

    let hash = hash_password(&password, cost)?;
    println!("{}", hash);
    eprintln!("Set it as WAYMARK_ADMIN__PASSWORD_HASH");
    Ok(())
}

fn issue_token_command() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to read .env file");
        }
    }

    let config = AppConfig::load()?;
    let gate = AdminGate::from_config(&config.admin);
    let session = gate.issue_session()?;

    println!("{}", session.token);
    eprintln!("Expires at {}", session.expires_at.to_rfc3339());
    Ok(())
}
