use super::open_database;
use crate::{
    libs::{config::Config, error::StoreError, forms::RegistrationForm, messages::Message, session::Session},
    msg_error, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};

pub fn cmd(config: &Config) -> Result<()> {
    let session = Session::new(open_database(config)?);
    let theme = ColorfulTheme::default();

    let email: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptEmail.to_string())
        .allow_empty(true)
        .interact_text()?;
    let display_name: String = Input::with_theme(&theme)
        .with_prompt(Message::PromptDisplayName.to_string())
        .allow_empty(true)
        .interact_text()?;
    let password = Password::with_theme(&theme)
        .with_prompt(Message::PromptPassword.to_string())
        .allow_empty_password(true)
        .interact()?;
    let confirm_password = Password::with_theme(&theme)
        .with_prompt(Message::PromptConfirmPassword.to_string())
        .allow_empty_password(true)
        .interact()?;

    let form = RegistrationForm::new(&email, &display_name, &password, &confirm_password);
    match session.register(&form) {
        Ok(_) => msg_success!(Message::AccountCreated),
        Err(e @ StoreError::Validation(_)) => msg_error!(e),
        Err(e) => msg_error!(Message::RegistrationFailed(e.to_string())),
    }

    Ok(())
}
