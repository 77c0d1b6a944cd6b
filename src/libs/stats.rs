use super::task::{Priority, Task};
use chrono::NaiveDate;
use serde::Serialize;

/// Summary counters shown above the task table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority_pending: usize,
    pub overdue: usize,
}

impl TaskStats {
    /// Single pass over `tasks`. Nothing is cached.
    pub fn from_tasks(tasks: &[Task], today: NaiveDate) -> Self {
        tasks.iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            } else {
                stats.pending += 1;
                if task.priority == Priority::High {
                    stats.high_priority_pending += 1;
                }
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
            stats
        })
    }
}
