use crate::Result;

use um_manager::UserManager;

use clap::Subcommand;
use serde_json::{Value, json};

#[derive(Subcommand)]
pub enum Commands {
    /// Create the user tables if missing and report the backend mode
    Init,

    /// Add a local user
    Add {
        email: String,
        #[arg(long, short)]
        password: String,
        /// Grant staff rights
        #[arg(long)]
        staff: bool,
        /// Create the account disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Remove a local user by email
    Remove { email: String },

    /// Check a password
    Validate {
        email: String,
        #[arg(long, short)]
        password: String,
    },

    /// Get a user by email
    Get { email: String },

    /// Get a local user by numeric id
    GetId { id: i64 },

    /// List users (everything unless both --start and --limit are given)
    List {
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        start: i64,
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        limit: i64,
    },

    /// Count users
    Count,

    /// Replace password and flags of a local user
    Update {
        id: i64,
        #[arg(long, short)]
        password: String,
        #[arg(long)]
        staff: bool,
        #[arg(long)]
        inactive: bool,
    },
}

/// Run one command and return its JSON result.
pub async fn execute(manager: &UserManager, command: Commands) -> Result<Value> {
    let value = match command {
        Commands::Init => json!({
            "mode": manager.mode().name(),
            "database": manager.database().dialect().to_string(),
        }),
        Commands::Add {
            email,
            password,
            staff,
            inactive,
        } => {
            manager.add_user(&email, &password, staff, !inactive).await?;
            json!({ "added": email })
        }
        Commands::Remove { email } => {
            manager.remove_user(&email).await?;
            json!({ "removed": email })
        }
        Commands::Validate { email, password } => {
            manager.validate_user(&email, &password).await?;
            json!({ "valid": true, "email": email })
        }
        Commands::Get { email } => serde_json::to_value(manager.get_user_by_email(&email).await?)?,
        Commands::GetId { id } => serde_json::to_value(manager.get_user_by_id(id).await?)?,
        Commands::List { start, limit } => {
            serde_json::to_value(manager.list_users(start, limit).await?)?
        }
        Commands::Count => json!({ "count": manager.count_users().await? }),
        Commands::Update {
            id,
            password,
            staff,
            inactive,
        } => {
            manager.update_user(id, &password, staff, !inactive).await?;
            json!({ "updated": id })
        }
    };

    Ok(value)
}
