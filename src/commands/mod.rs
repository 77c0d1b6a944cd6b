pub mod config;
pub mod dashboard;
pub mod login;
pub mod migrations;
pub mod register;
pub mod settings;

use crate::db::db::Database;
use crate::libs::config::{parse_override, Config};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create a new account")]
    Register,
    #[command(about = "Log in and open the task dashboard")]
    Login,
    #[command(about = "Show or initialize the configuration")]
    Config(config::ConfigArgs),
    #[command(about = "Inspect the database schema version")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Override a configuration value for this run, e.g. --set db.pool_size=4
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let config = Config::load(cli.overrides)?;

        match cli.command {
            Commands::Register => register::cmd(&config),
            Commands::Login => login::cmd(&config).await,
            Commands::Config(args) => config::cmd(args, &config),
            Commands::Migrations(args) => migrations::cmd(args, &config),
        }
    }
}

/// Opens the configured database, applying its schema mode.
pub(crate) fn open_database(config: &Config) -> Result<Arc<Database>> {
    Ok(Arc::new(Database::open(&config.db)?))
}
