//! The task dashboard shown after login.
//!
//! Every pass of the loop redraws the counters and the task table, then asks
//! for one action. A failing action is reported and the loop carries on;
//! nothing is retried.

use super::settings;
use crate::{
    libs::{
        config::Config,
        forms::{deadline_input, parse_deadline, TaskForm},
        messages::Message,
        session::Session,
        task::{Priority, TaskFilter},
        view::View,
        worker::Worker,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Duration, Local};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::fmt;

/// Days ahead of today offered as the deadline of a new task.
const DEFAULT_DEADLINE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Edit,
    Toggle,
    Delete,
    Search,
    FilterPriority,
    FilterStatus,
    ClearCompleted,
    Refresh,
    Settings,
    Logout,
}

impl Action {
    const ALL: [Action; 11] = [
        Action::Add,
        Action::Edit,
        Action::Toggle,
        Action::Delete,
        Action::Search,
        Action::FilterPriority,
        Action::FilterStatus,
        Action::ClearCompleted,
        Action::Refresh,
        Action::Settings,
        Action::Logout,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Add => "Add task",
            Action::Edit => "Edit task",
            Action::Toggle => "Toggle completion",
            Action::Delete => "Delete task",
            Action::Search => "Search",
            Action::FilterPriority => "Filter by priority",
            Action::FilterStatus => "Filter by status",
            Action::ClearCompleted => "Clear completed",
            Action::Refresh => "Refresh",
            Action::Settings => "Settings",
            Action::Logout => "Logout",
        })
    }
}

pub async fn run(session: &mut Session, worker: &Worker, config: &Config) -> Result<()> {
    let theme = ColorfulTheme::default();

    loop {
        render(session, config)?;

        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptSelectAction.to_string())
            .items(&Action::ALL)
            .default(0)
            .interact_opt()?;
        let action = match selection {
            Some(index) => Action::ALL[index],
            None => Action::Logout,
        };

        let outcome = match action {
            Action::Add => add_task(session),
            Action::Edit => edit_task(session),
            Action::Toggle => toggle_task(session),
            Action::Delete => delete_task(session),
            Action::Search => search(session),
            Action::FilterPriority => filter_priority(session),
            Action::FilterStatus => filter_status(session),
            Action::ClearCompleted => clear_completed(session),
            Action::Refresh => refresh(session, worker).await,
            Action::Settings => match settings::run(session) {
                Ok(true) => return Ok(()),
                Ok(false) => Ok(()),
                Err(e) => Err(e),
            },
            Action::Logout => {
                if let Some(user) = session.logout() {
                    msg_success!(Message::LoggedOut(user.display_name));
                }
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            tracing::debug!(?action, "dashboard action failed: {:#}", e);
            msg_error!(Message::OperationFailed(e.to_string()));
        }
    }
}

fn render(session: &Session, config: &Config) -> Result<()> {
    msg_print!(Message::DashboardHeader(config.app.title.clone()), true);
    msg_print!(Message::StatsHeader);
    View::stats(&session.stats())?;

    msg_print!(Message::TasksHeader(session.tasks().len()), true);
    if session.tasks().is_empty() {
        msg_info!(Message::NoTasksFound);
    } else {
        View::tasks(session.tasks(), Local::now().date_naive())?;
    }
    Ok(())
}

/// Prompts for every task field, starting from `initial`.
fn prompt_task_form(initial: &TaskForm, editing: bool) -> Result<TaskForm> {
    let theme = ColorfulTheme::default();

    let mut title = Input::<String>::with_theme(&theme)
        .with_prompt(Message::PromptTaskTitle.to_string())
        .allow_empty(true);
    if !initial.title.is_empty() {
        title = title.default(initial.title.clone());
    }
    let title = title.interact_text()?;

    let mut description = Input::<String>::with_theme(&theme)
        .with_prompt(Message::PromptTaskDescription.to_string())
        .allow_empty(true);
    if !initial.description.is_empty() {
        description = description.default(initial.description.clone());
    }
    let description = description.interact_text()?;

    let priority_index = Priority::ALL.iter().position(|p| *p == initial.priority).unwrap_or(1);
    let priority = Select::with_theme(&theme)
        .with_prompt(Message::PromptTaskPriority.to_string())
        .items(&Priority::ALL)
        .default(priority_index)
        .interact()?;

    let mut deadline = Input::<String>::with_theme(&theme)
        .with_prompt(Message::PromptTaskDeadline.to_string())
        .allow_empty(true)
        .validate_with(|input: &String| parse_deadline(input).map(|_| ()));
    let prefill = deadline_input(initial.deadline);
    if !prefill.is_empty() {
        deadline = deadline.default(prefill);
    }
    let deadline = parse_deadline(&deadline.interact_text()?).map_err(anyhow::Error::msg)?;

    let completed = if editing {
        Confirm::with_theme(&theme)
            .with_prompt(Message::PromptTaskCompleted.to_string())
            .default(initial.completed)
            .interact()?
    } else {
        false
    };

    Ok(TaskForm {
        title,
        description,
        priority: Priority::ALL[priority],
        deadline,
        completed,
    })
}

/// Lets the user pick one of the listed tasks.
fn select_task(session: &Session) -> Result<Option<i64>> {
    if session.tasks().is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(None);
    }

    let labels: Vec<String> = session
        .tasks()
        .iter()
        .map(|task| {
            let mark = if task.completed { "✓" } else { " " };
            format!("[{}] {} ({})", mark, task.title, task.priority)
        })
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSelectTask.to_string())
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(selection.and_then(|index| session.tasks()[index].id))
}

fn add_task(session: &mut Session) -> Result<()> {
    let initial = TaskForm {
        priority: session.default_priority()?,
        deadline: Some(Local::now().date_naive() + Duration::days(DEFAULT_DEADLINE_DAYS)),
        ..Default::default()
    };
    let form = prompt_task_form(&initial, false)?;

    session.add_task(&form)?;
    msg_success!(Message::TaskCreated);
    Ok(())
}

fn edit_task(session: &mut Session) -> Result<()> {
    let Some(task_id) = select_task(session)? else {
        return Ok(());
    };
    let Some(mut task) = session.task(task_id).cloned() else {
        msg_error!(Message::TaskNotFoundWithId(task_id));
        return Ok(());
    };

    let form = prompt_task_form(&TaskForm::from_task(&task), true)?;
    form.validate()?;
    form.apply_to(&mut task);

    match session.update_task(&task)? {
        Some(_) => msg_success!(Message::TaskUpdated),
        None => msg_error!(Message::TaskNotFoundWithId(task_id)),
    }
    Ok(())
}

fn toggle_task(session: &mut Session) -> Result<()> {
    let Some(task_id) = select_task(session)? else {
        return Ok(());
    };

    match session.toggle_completion(task_id)? {
        Some(task) => msg_success!(Message::TaskCompletionToggled(task.title, task.completed)),
        None => msg_error!(Message::TaskNotFoundWithId(task_id)),
    }
    Ok(())
}

fn delete_task(session: &mut Session) -> Result<()> {
    let Some(task_id) = select_task(session)? else {
        return Ok(());
    };
    let title = session.task(task_id).map(|task| task.title.clone()).unwrap_or_default();

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDeleteTask(title).to_string())
        .default(false)
        .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    if session.delete_task(task_id)? {
        msg_success!(Message::TaskDeleted);
    } else {
        msg_error!(Message::TaskNotFoundWithId(task_id));
    }
    Ok(())
}

fn search(session: &mut Session) -> Result<()> {
    let term: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSearchTerm.to_string())
        .allow_empty(true)
        .interact_text()?;

    let matches = session.search(&term)?.len();
    if term.trim().is_empty() {
        msg_info!(Message::FiltersCleared);
    } else {
        msg_info!(Message::SearchResults(term.trim().to_string(), matches));
    }
    Ok(())
}

fn filter_priority(session: &mut Session) -> Result<()> {
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPriorityFilter.to_string())
        .items(&Priority::ALL)
        .default(0)
        .interact()?;
    let priority = Priority::ALL[selection];

    session.load(TaskFilter::Priority(priority))?;
    msg_info!(Message::FilterApplied(format!("{} priority", priority)));
    Ok(())
}

fn filter_status(session: &mut Session) -> Result<()> {
    let statuses = ["Pending", "Completed"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptStatusFilter.to_string())
        .items(&statuses)
        .default(0)
        .interact()?;

    session.load(TaskFilter::Completed(selection == 1))?;
    msg_info!(Message::FilterApplied(statuses[selection].to_lowercase()));
    Ok(())
}

fn clear_completed(session: &mut Session) -> Result<()> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmClearCompleted.to_string())
        .default(false)
        .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    match session.clear_completed()? {
        0 => msg_info!(Message::NoCompletedTasks),
        removed => msg_success!(Message::TasksCleared(removed)),
    }
    msg_info!(Message::FiltersCleared);
    Ok(())
}

/// Full reload on the worker, dropping any search or filter.
async fn refresh(session: &mut Session, worker: &Worker) -> Result<()> {
    session.reload_with(worker, TaskFilter::All).await?;
    msg_info!(Message::FiltersCleared);
    Ok(())
}
