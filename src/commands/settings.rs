use crate::{
    libs::{messages::Message, session::Session, task::Priority, user::DEFAULT_PRIORITY_KEY, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

const ITEMS: [&str; 4] = ["Default task priority", "Stored preferences", "Delete account", "Back"];

/// Settings menu. Returns `true` once the account has been deleted, which
/// also ends the session.
pub fn run(session: &mut Session) -> Result<bool> {
    let theme = ColorfulTheme::default();

    loop {
        msg_print!(Message::SettingsHeader, true);
        msg_print!(Message::DefaultPriorityCurrent(session.default_priority()?.to_string()));

        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptSelectAction.to_string())
            .items(&ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => set_default_priority(session)?,
            Some(1) => list_preferences(session)?,
            Some(2) => {
                if delete_account(session)? {
                    return Ok(true);
                }
            }
            _ => return Ok(false),
        }
    }
}

fn set_default_priority(session: &Session) -> Result<()> {
    let current = session.default_priority()?;
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptDefaultPriority.to_string())
        .items(&Priority::ALL)
        .default(Priority::ALL.iter().position(|p| *p == current).unwrap_or(1))
        .interact()?;
    let priority = Priority::ALL[selection];

    session.set_default_priority(priority)?;
    msg_success!(Message::PreferenceSaved(DEFAULT_PRIORITY_KEY.to_string(), priority.to_string()));
    Ok(())
}

fn list_preferences(session: &Session) -> Result<()> {
    let preferences = session.preferences()?;
    if preferences.is_empty() {
        msg_info!(Message::NoPreferences);
        return Ok(());
    }

    msg_print!(Message::PreferencesHeader, true);
    View::preferences(&preferences)?;
    Ok(())
}

/// Asks twice before anything is deleted.
fn delete_account(session: &mut Session) -> Result<bool> {
    let email = session.user().map(|user| user.email.clone()).unwrap_or_default();
    let theme = ColorfulTheme::default();

    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(Message::ConfirmDeleteAccount(email).to_string())
        .default(false)
        .interact()?
        && Confirm::with_theme(&theme)
            .with_prompt(Message::ConfirmDeleteAccountFinal.to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(false);
    }

    let user = session.delete_account()?;
    msg_success!(Message::AccountDeleted(user.email));
    Ok(true)
}
