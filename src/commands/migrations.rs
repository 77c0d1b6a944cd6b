use crate::{
    db::{
        db::Database,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{
        config::{Config, SchemaMode},
        messages::Message,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show current database version
    Status,
    /// Show migration history
    History,
}

pub fn cmd(args: MigrationsArgs, config: &Config) -> Result<()> {
    // Inspect the schema as it is, without applying anything
    let mut db_config = config.db.clone();
    db_config.schema = SchemaMode::None;
    let db = Database::open(&db_config)?;
    let conn = db.connection()?;

    match args.command {
        MigrationsCommand::Status => {
            let version = get_db_version(&conn)?;
            let needs_update = needs_migration(&conn)?;

            msg_print!(Message::DatabaseVersion(version));
            if needs_update {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&conn)?;

            msg_print!(Message::MigrationHistory, true);
            View::migrations(&history)?;
        }
    }

    Ok(())
}
