//! Tangelo CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tangelo-cli migrate
//!
//! # Create an admin account
//! tangelo-cli user create -n "Ada" -e ada@example.com -r admin
//!
//! # Promote an existing account to seller
//! tangelo-cli user promote -e seller@example.com -r seller
//!
//! # Seed demo catalog data
//! tangelo-cli seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tangelo-cli")]
#[command(author, version, about = "Tangelo Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database with demo catalog data
    Seed,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account with the given role
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (prompted insecurely via flag; rotate after first login)
        #[arg(short, long)]
        password: String,

        /// Role (`user`, `seller`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: String,
    },
    /// Change an existing account's role
    Promote {
        /// Email address of the account
        #[arg(short, long)]
        email: String,

        /// New role (`user`, `seller`, `admin`)
        #[arg(short, long)]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
                role,
            } => commands::users::create(&name, &email, &password, &role).await?,
            UserAction::Promote { email, role } => {
                commands::users::promote(&email, &role).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
