use crate::{
    libs::{config::Config, data_storage::DataStorage, messages::Message, view::View},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Show the resolved configuration
    Show,
    /// Walk through the settings and write the defaults file
    Init,
}

pub fn cmd(args: ConfigArgs, config: &Config) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            msg_print!(Message::ConfigStatusHeader, true);
            View::config(&config.status())?;
        }
        ConfigCommand::Init => {
            let updated = Config::init(config)?;
            let path = updated.save(&DataStorage::new())?;
            msg_success!(Message::ConfigSaved(path.display().to_string()));
        }
    }

    Ok(())
}
