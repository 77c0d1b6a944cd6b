use super::task::Task;

/// Case-insensitive substring search over title and description.
///
/// Keeps the relative order of `tasks`. A blank term matches everything, but
/// callers holding a session should prefer `Session::search`, which reloads
/// from storage on a blank term instead of filtering what is in memory.
pub fn filter_tasks(tasks: &[Task], term: &str) -> Vec<Task> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.to_vec();
    }

    tasks
        .iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&needle)
                || task.description.as_deref().is_some_and(|description| description.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn is_blank(term: &str) -> bool {
    term.trim().is_empty()
}
