use super::{dashboard, open_database};
use crate::{
    libs::{config::Config, error::StoreError, messages::Message, session::Session, worker::Worker},
    msg_error, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};

pub async fn cmd(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let worker = Worker::new(db.clone());
    let mut session = Session::new(db);
    let theme = ColorfulTheme::default();

    let email: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptEmail.to_string())
        .allow_empty(true)
        .interact_text()?;
    let password = Password::with_theme(&theme)
        .with_prompt(Message::PromptPassword.to_string())
        .allow_empty_password(true)
        .interact()?;

    match session.login(&email, &password) {
        Ok(Some(user)) => {
            msg_success!(Message::Welcome(user.display_name));
            dashboard::run(&mut session, &worker, config).await
        }
        Ok(None) => {
            msg_error!(Message::InvalidCredentials);
            Ok(())
        }
        Err(e @ StoreError::Validation(_)) => {
            msg_error!(e);
            Ok(())
        }
        Err(e) => {
            msg_error!(Message::LoginFailed(e.to_string()));
            Ok(())
        }
    }
}
