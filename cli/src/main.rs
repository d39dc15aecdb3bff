//! Command-line driver for the account/profile API client.
//!
//! Stands in for the web view layer: every library operation is reachable
//! as a subcommand, with the session persisted to a local file between
//! invocations.

use std::path::PathBuf;
use std::sync::Arc;

use account_client::net::types::{PreferencesUpdate, UpdateProfile, UpdateUser};
use account_client::routing::{RouteDecision, route_decision};
use account_client::{AuthClient, SessionStore, UserClient};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] account_client::ApiError),
    #[error("no user id available; pass --user-id or login first")]
    MissingUserId,
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "account-cli", about = "Account and profile API CLI")]
struct Cli {
    #[arg(long, env = "ACCOUNT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Where the session token is persisted between invocations.
    #[arg(long, env = "ACCOUNT_SESSION_FILE", default_value = "account-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account (auto-logs in on success).
    Register {
        username: String,
        email: String,
        password: String,
    },
    Login {
        username: String,
        password: String,
    },
    /// Drop the local session. No network call.
    Logout,
    /// Print whether a session is active, as a route guard would see it.
    Status,
    /// Fetch the account behind the current session.
    Whoami,
    UpdateUser {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete the current account and clear the session.
    DeleteUser,
    Profile(ProfileCommand),
    /// Change the password for a user.
    Password {
        new_password: String,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Update preferences for a user.
    Preferences {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        display_mode: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Get {
        #[arg(long)]
        user_id: Option<String>,
    },
    Update {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let session = Arc::new(SessionStore::load(&cli.session_file));
    let auth = AuthClient::new(&cli.base_url, session.clone());
    let users = UserClient::new(&cli.base_url, session.clone());

    match cli.command {
        Command::Register { username, email, password } => {
            let user = auth.register(&username, &email, &password).await?;
            print_json(&user)
        }
        Command::Login { username, password } => {
            let response = auth.login(&username, &password).await?;
            print_json(&response.user)
        }
        Command::Logout => {
            auth.logout();
            println!("logged out");
            Ok(())
        }
        Command::Status => {
            let decision = route_decision(true, false, &session);
            match decision {
                RouteDecision::Allow => println!("authenticated"),
                _ => println!("not authenticated"),
            }
            Ok(())
        }
        Command::Whoami => {
            let user = auth.current_user().await?;
            print_json(&user)
        }
        Command::UpdateUser { username, email } => {
            let update = UpdateUser { username, email };
            let user = auth.update_current_user(&update).await?;
            print_json(&user)
        }
        Command::DeleteUser => {
            auth.delete_current_user().await?;
            println!("account deleted");
            Ok(())
        }
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Get { user_id } => {
                let user_id = resolve_user_id(user_id, &session)?;
                let profile = users.profile(&user_id).await?;
                print_json(&profile)
            }
            ProfileSubcommand::Update { user_id, name, email, phone, address } => {
                let user_id = resolve_user_id(user_id, &session)?;
                let update = UpdateProfile { name, email, phone, address };
                let profile = users.update_profile(&user_id, &update).await?;
                print_json(&profile)
            }
        },
        Command::Password { new_password, user_id } => {
            let user_id = resolve_user_id(user_id, &session)?;
            let response = users.change_password(&user_id, &new_password).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Preferences { user_id, language, notifications, display_mode } => {
            let user_id = resolve_user_id(user_id, &session)?;
            let update = PreferencesUpdate { language, notifications, display_mode };
            let profile = users.update_preferences(&user_id, &update).await?;
            print_json(&profile)
        }
    }
}

/// Prefer an explicit `--user-id`; fall back to the id cached at login.
fn resolve_user_id(explicit: Option<String>, session: &SessionStore) -> Result<String, CliError> {
    explicit.or_else(|| session.user_id()).ok_or(CliError::MissingUserId)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
