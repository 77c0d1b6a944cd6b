#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate};
    use taskdesk::db::{db::Database, repository::Repository};
    use taskdesk::libs::config::DbConfig;
    use taskdesk::libs::error::StoreError;
    use taskdesk::libs::task::{Priority, Task, TaskFilter};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TaskTestContext {
        _temp_dir: TempDir,
        db: Database,
        user_id: i64,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let url = format!("sqlite://{}", temp_dir.path().join("taskdesk.db").display());
            let db = Database::open(&DbConfig::for_url(&url)).unwrap();
            let user_id = db.register("alice@example.com", "secret1", "Alice").unwrap().id;
            TaskTestContext { _temp_dir: temp_dir, db, user_id }
        }
    }

    fn task(user_id: i64, title: &str, priority: Priority) -> Task {
        Task::new(user_id, title, None, priority, None)
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_saved_task_listed_once(ctx: &mut TaskTestContext) {
        let saved = ctx.db.save_task(&task(ctx.user_id, "Buy milk", Priority::Low)).unwrap();
        let id = saved.id.expect("id assigned on insert");

        let tasks = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap();
        assert_eq!(tasks.iter().filter(|t| t.id == Some(id)).count(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].priority, Priority::Low);

        // saving again with the id updates in place
        let mut edited = saved.clone();
        edited.title = "Buy oat milk".to_string();
        ctx.db.save_task(&edited).unwrap();

        let tasks = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy oat milk");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_fields_survive_storage(ctx: &mut TaskTestContext) {
        let deadline = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        let new = Task::new(ctx.user_id, "File taxes", Some("Form 1040"), Priority::High, Some(deadline));
        let saved = ctx.db.save_task(&new).unwrap();

        let loaded = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap().remove(0);
        assert_eq!(loaded, saved);
        assert_eq!(loaded.description.as_deref(), Some("Form 1040"));
        assert_eq!(loaded.deadline, Some(deadline));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_save_with_unknown_id_inserts_under_that_id(ctx: &mut TaskTestContext) {
        let mut orphan = task(ctx.user_id, "Restored", Priority::Medium);
        orphan.id = Some(999);

        let saved = ctx.db.save_task(&orphan).unwrap();
        assert_eq!(saved.id, Some(999));

        let tasks = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, Some(999));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_empty_title_rejected(ctx: &mut TaskTestContext) {
        let err = ctx.db.save_task(&task(ctx.user_id, "   ", Priority::Low)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.to_string(), "Task title is required");
        assert!(ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_refreshes_updated_at(ctx: &mut TaskTestContext) {
        let mut old = task(ctx.user_id, "Old task", Priority::Low);
        let long_ago = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        old.created_at = long_ago;
        old.updated_at = long_ago;
        let saved = ctx.db.save_task(&old).unwrap();

        let mut edited = saved.clone();
        edited.priority = Priority::High;
        let updated = ctx.db.update_task(&edited).unwrap();

        assert!(updated.updated_at > long_ago);
        assert_eq!(updated.created_at, long_ago);

        let loaded = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap().remove(0);
        assert_eq!(loaded.priority, Priority::High);
        assert_eq!(loaded.updated_at, updated.updated_at);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_delete_missing_task_is_noop(ctx: &mut TaskTestContext) {
        ctx.db.save_task(&task(ctx.user_id, "Keep me", Priority::Low)).unwrap();

        ctx.db.delete_task(12345).unwrap();

        assert_eq!(ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap().len(), 1);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_delete_task(ctx: &mut TaskTestContext) {
        let saved = ctx.db.save_task(&task(ctx.user_id, "Temporary", Priority::Low)).unwrap();

        ctx.db.delete_task(saved.id.unwrap()).unwrap();

        assert!(ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_newest_first_ordering(ctx: &mut TaskTestContext) {
        let base = Local::now().naive_local();
        for (offset, title) in [(0, "first"), (1, "second"), (2, "third")] {
            let mut t = task(ctx.user_id, title, Priority::Medium);
            t.created_at = base + chrono::Duration::minutes(offset);
            ctx.db.save_task(&t).unwrap();
        }

        let titles: Vec<String> = ctx
            .db
            .tasks_for_user(ctx.user_id, TaskFilter::All)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_same_instant_ordered_by_id(ctx: &mut TaskTestContext) {
        let instant = Local::now().naive_local();
        for title in ["a", "b"] {
            let mut t = task(ctx.user_id, title, Priority::Medium);
            t.created_at = instant;
            ctx.db.save_task(&t).unwrap();
        }

        let tasks = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap();
        assert_eq!(tasks[0].title, "b");
        assert_eq!(tasks[1].title, "a");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_filters(ctx: &mut TaskTestContext) {
        let base = Local::now().naive_local();
        let rows = [
            ("done high", Priority::High, true),
            ("open high", Priority::High, false),
            ("open low", Priority::Low, false),
            ("done medium", Priority::Medium, true),
        ];
        for (offset, (title, priority, completed)) in rows.into_iter().enumerate() {
            let mut t = task(ctx.user_id, title, priority);
            t.completed = completed;
            t.created_at = base + chrono::Duration::seconds(offset as i64);
            ctx.db.save_task(&t).unwrap();
        }

        let titles = |filter| -> Vec<String> {
            ctx.db
                .tasks_for_user(ctx.user_id, filter)
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect()
        };

        assert_eq!(titles(TaskFilter::Completed(true)), vec!["done medium", "done high"]);
        assert_eq!(titles(TaskFilter::Completed(false)), vec!["open low", "open high"]);
        assert_eq!(titles(TaskFilter::Priority(Priority::High)), vec!["open high", "done high"]);
        assert_eq!(titles(TaskFilter::Priority(Priority::Low)), vec!["open low"]);
        assert_eq!(titles(TaskFilter::All).len(), 4);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_tasks_are_per_user(ctx: &mut TaskTestContext) {
        let bob = ctx.db.register("bob@example.com", "secret2", "Bob").unwrap();
        ctx.db.save_task(&task(ctx.user_id, "Alice's", Priority::Low)).unwrap();
        ctx.db.save_task(&task(bob.id, "Bob's", Priority::Low)).unwrap();

        let tasks = ctx.db.tasks_for_user(bob.id, TaskFilter::All).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Bob's");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_clear_completed(ctx: &mut TaskTestContext) {
        let bob = ctx.db.register("bob@example.com", "secret2", "Bob").unwrap();
        for (owner, title, completed) in [
            (ctx.user_id, "done 1", true),
            (ctx.user_id, "done 2", true),
            (ctx.user_id, "open", false),
            (bob.id, "bob done", true),
        ] {
            let mut t = task(owner, title, Priority::Medium);
            t.completed = completed;
            ctx.db.save_task(&t).unwrap();
        }

        assert_eq!(ctx.db.clear_completed_tasks(ctx.user_id).unwrap(), 2);
        assert_eq!(ctx.db.clear_completed_tasks(ctx.user_id).unwrap(), 0);

        let left = ctx.db.tasks_for_user(ctx.user_id, TaskFilter::All).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "open");
        assert_eq!(ctx.db.tasks_for_user(bob.id, TaskFilter::All).unwrap().len(), 1);
    }
}
