//! um - user manager CLI
//!
//! Administers the local user table and inspects directory-backed users.
//! Configuration comes from `$UM_CONFIG_DIR/config.toml` (default `./.um/`)
//! and `UM_*` environment variables.
//!
//! # Examples
//!
//! ```bash
//! um add alice@example.com --password s3cret --staff
//! um validate alice@example.com --password s3cret
//! um list --start 0 --limit 20 --pretty
//! ```

use um_cli::{Cli, Commands, Result, execute, logger};
use um_config::Config;
use um_manager::UserManager;

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<Value> {
    let config = Config::load()?;
    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    config.log_summary();

    let manager = UserManager::open(&config).await?;
    execute(&manager, command).await
}
