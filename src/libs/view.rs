use super::stats::TaskStats;
use super::task::Task;
use super::user::UserPreference;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::{row, Table};

const DEADLINE_FORMAT: &str = "%b %d, %Y";

/// Deadline as shown in tables, e.g. `Mar 05, 2024`.
pub fn format_deadline(deadline: Option<NaiveDate>) -> String {
    deadline.map(|d| d.format(DEADLINE_FORMAT).to_string()).unwrap_or_default()
}

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task], today: NaiveDate) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "PRIORITY", "DEADLINE", "STATUS", "DESCRIPTION"]);
        for task in tasks {
            let status = if task.completed {
                "Completed"
            } else if task.is_overdue(today) {
                "Overdue"
            } else {
                "Pending"
            };
            table.add_row(row![
                task.id.unwrap_or(0),
                task.title,
                task.priority,
                format_deadline(task.deadline),
                status,
                task.description.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats(stats: &TaskStats) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TOTAL", "COMPLETED", "PENDING", "HIGH PRIORITY", "OVERDUE"]);
        table.add_row(row![stats.total, stats.completed, stats.pending, stats.high_priority_pending, stats.overdue]);
        table.printstd();

        Ok(())
    }

    pub fn preferences(preferences: &[UserPreference]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["KEY", "VALUE", "CREATED"]);
        for preference in preferences {
            table.add_row(row![
                preference.key,
                preference.value.as_deref().unwrap_or(""),
                preference.created_at.format("%Y-%m-%d %H:%M")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn config(status: &[(&str, String)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SETTING", "VALUE"]);
        for (name, value) in status {
            table.add_row(row![name, value]);
        }
        table.printstd();

        Ok(())
    }

    pub fn migrations(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED AT"]);
        for (version, name, applied_at) in history {
            table.add_row(row![format!("v{}", version), name, applied_at]);
        }
        table.printstd();

        Ok(())
    }
}
