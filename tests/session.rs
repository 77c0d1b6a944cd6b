#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use std::sync::Arc;
    use taskdesk::db::{db::Database, repository::Repository};
    use taskdesk::libs::config::DbConfig;
    use taskdesk::libs::error::StoreError;
    use taskdesk::libs::forms::{RegistrationForm, TaskForm};
    use taskdesk::libs::session::Session;
    use taskdesk::libs::task::{Priority, Task, TaskFilter};
    use taskdesk::libs::worker::Worker;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    fn open(temp_dir: &TempDir) -> Arc<Database> {
        let url = format!("sqlite://{}", temp_dir.path().join("taskdesk.db").display());
        Arc::new(Database::open(&DbConfig::for_url(&url)).unwrap())
    }

    struct SessionTestContext {
        _temp_dir: TempDir,
        db: Arc<Database>,
        session: Session,
    }

    impl TestContext for SessionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = open(&temp_dir);
            let mut session = Session::new(db.clone());
            session
                .register(&RegistrationForm::new("alice@example.com", "Alice", "secret1", "secret1"))
                .unwrap();
            session.login("alice@example.com", "secret1").unwrap().unwrap();
            SessionTestContext {
                _temp_dir: temp_dir,
                db,
                session,
            }
        }
    }

    fn form(title: &str, priority: Priority) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            priority,
            ..Default::default()
        }
    }

    #[test]
    fn test_alice_login_scenario() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(open(&temp_dir));
        session
            .register(&RegistrationForm::new("alice@example.com", "Alice", "secret1", "secret1"))
            .unwrap();

        assert!(session.login("alice@example.com", "nope").unwrap().is_none());
        assert!(!session.is_authenticated());

        let user = session.login("alice@example.com", "secret1").unwrap().unwrap();
        assert_eq!(user.display_name, "Alice");
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("alice@example.com"));
    }

    #[test]
    fn test_blank_credentials_rejected_before_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(open(&temp_dir));

        let err = session.login("  ", "secret1").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.to_string(), "Please enter both email and password");
    }

    #[test]
    fn test_operations_need_a_user() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(open(&temp_dir));

        assert!(matches!(session.load(TaskFilter::All), Err(StoreError::NotAuthenticated)));
        assert!(matches!(session.add_task(&form("x", Priority::Low)), Err(StoreError::NotAuthenticated)));
        assert!(matches!(session.default_priority(), Err(StoreError::NotAuthenticated)));
        let err = session.clear_completed().unwrap_err();
        assert_eq!(err.to_string(), "No user logged in");
    }

    #[test]
    fn test_registration_form_checked_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let session = Session::new(open(&temp_dir));

        let err = session
            .register(&RegistrationForm::new("alice@example.com", "Alice", "secret1", "secret2"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_add_task_goes_to_front(ctx: &mut SessionTestContext) {
        ctx.session.add_task(&form("first", Priority::Low)).unwrap();
        let second = ctx.session.add_task(&form("second", Priority::High)).unwrap();

        assert_eq!(ctx.session.tasks().len(), 2);
        assert_eq!(ctx.session.tasks()[0].id, second.id);

        let err = ctx.session.add_task(&form("   ", Priority::Low)).unwrap_err();
        assert_eq!(err.to_string(), "Task title is required");
        assert_eq!(ctx.session.tasks().len(), 2);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_add_task_trims_form_values(ctx: &mut SessionTestContext) {
        let task = ctx
            .session
            .add_task(&TaskForm {
                title: "  Buy milk  ".to_string(),
                description: "   ".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(task.title, "Buy milk");
        assert!(task.description.is_none());
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_overdue_stats_scenario(ctx: &mut SessionTestContext) {
        let yesterday = Local::now().date_naive() - Duration::days(1);
        ctx.session.add_task(&form("Buy milk", Priority::Low)).unwrap();
        ctx.session
            .add_task(&TaskForm {
                title: "File taxes".to_string(),
                priority: Priority::High,
                deadline: Some(yesterday),
                ..Default::default()
            })
            .unwrap();

        let stats = ctx.session.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.high_priority_pending, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completed, 0);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_blank_search_reloads_from_storage(ctx: &mut SessionTestContext) {
        ctx.session.add_task(&form("Buy milk", Priority::Low)).unwrap();
        ctx.session.add_task(&form("File taxes", Priority::High)).unwrap();
        ctx.session.add_task(&form("Walk dog", Priority::Medium)).unwrap();

        assert_eq!(ctx.session.load(TaskFilter::Priority(Priority::High)).unwrap().len(), 1);

        // written behind the session's back
        let user_id = ctx.session.user().unwrap().id;
        ctx.db
            .save_task(&Task::new(user_id, "Call mom", None, Priority::Low, None))
            .unwrap();

        let all = ctx.session.search("   ").unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_search_matches_title_or_description(ctx: &mut SessionTestContext) {
        ctx.session.add_task(&form("Buy MILK", Priority::Low)).unwrap();
        ctx.session
            .add_task(&TaskForm {
                title: "Groceries".to_string(),
                description: "eggs and milk".to_string(),
                ..Default::default()
            })
            .unwrap();
        ctx.session.add_task(&form("File taxes", Priority::High)).unwrap();

        let titles: Vec<&str> = ctx.session.search("milk").unwrap().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Groceries", "Buy MILK"]);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_toggle_and_clear_completed(ctx: &mut SessionTestContext) {
        let done = ctx.session.add_task(&form("Done soon", Priority::High)).unwrap();
        ctx.session.add_task(&form("Still open", Priority::Low)).unwrap();

        let toggled = ctx.session.toggle_completion(done.id.unwrap()).unwrap().unwrap();
        assert!(toggled.completed);
        assert!(toggled.updated_at >= done.updated_at);
        assert_eq!(ctx.session.stats().completed, 1);

        let stored = ctx.session.load(TaskFilter::Completed(true)).unwrap();
        assert_eq!(stored.len(), 1);

        ctx.session.load(TaskFilter::All).unwrap();
        assert_eq!(ctx.session.clear_completed().unwrap(), 1);
        assert_eq!(ctx.session.tasks().len(), 1);
        assert_eq!(ctx.session.tasks()[0].title, "Still open");

        assert!(ctx.session.toggle_completion(9999).unwrap().is_none());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_update_and_delete_resync_list(ctx: &mut SessionTestContext) {
        let task = ctx.session.add_task(&form("Draft", Priority::Low)).unwrap();

        let mut edited = task.clone();
        form("Final", Priority::High).apply_to(&mut edited);
        assert!(ctx.session.update_task(&edited).unwrap().is_some());
        assert_eq!(ctx.session.tasks()[0].title, "Final");
        assert_eq!(ctx.session.tasks()[0].priority, Priority::High);

        assert!(ctx.session.delete_task(task.id.unwrap()).unwrap());
        assert!(ctx.session.tasks().is_empty());
        assert!(ctx.session.load(TaskFilter::All).unwrap().is_empty());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_clear_completed_reaches_filtered_out_tasks(ctx: &mut SessionTestContext) {
        let hidden = ctx.session.add_task(&form("Filed report", Priority::Low)).unwrap();
        ctx.session.toggle_completion(hidden.id.unwrap()).unwrap().unwrap();
        ctx.session.add_task(&form("Call bank", Priority::High)).unwrap();

        let listed = ctx.session.load(TaskFilter::Priority(Priority::High)).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].completed);

        assert_eq!(ctx.session.clear_completed().unwrap(), 1);

        let titles: Vec<&str> = ctx.session.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Call bank"]);
        assert!(ctx.session.load(TaskFilter::Completed(true)).unwrap().is_empty());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_edits_only_touch_listed_tasks(ctx: &mut SessionTestContext) {
        let bob = ctx.db.register("bob@example.com", "secret2", "Bob").unwrap();
        let foreign = ctx
            .db
            .save_task(&Task::new(bob.id, "Bob's errand", None, Priority::Medium, None))
            .unwrap();
        let unlisted = ctx
            .db
            .save_task(&Task::new(ctx.session.user().unwrap().id, "Saved elsewhere", None, Priority::Low, None))
            .unwrap();

        let mut hijacked = foreign.clone();
        hijacked.title = "Mine now".to_string();
        assert!(ctx.session.update_task(&hijacked).unwrap().is_none());
        assert!(!ctx.session.delete_task(foreign.id.unwrap()).unwrap());
        assert!(!ctx.session.delete_task(unlisted.id.unwrap()).unwrap());

        let bobs = ctx.db.tasks_for_user(bob.id, TaskFilter::All).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].title, "Bob's errand");

        // a listed task that was reassigned in memory is refused as well
        let own = ctx.session.add_task(&form("Mine", Priority::Low)).unwrap();
        let mut moved = own.clone();
        moved.user_id = bob.id;
        assert!(ctx.session.update_task(&moved).unwrap().is_none());
        assert!(ctx.session.delete_task(own.id.unwrap()).unwrap());

        ctx.session.load(TaskFilter::All).unwrap();
        assert_eq!(ctx.session.tasks().len(), 1);
        assert_eq!(ctx.session.tasks()[0].title, "Saved elsewhere");
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_default_priority_preference(ctx: &mut SessionTestContext) {
        assert_eq!(ctx.session.default_priority().unwrap(), Priority::Medium);

        ctx.session.set_default_priority(Priority::High).unwrap();
        assert_eq!(ctx.session.default_priority().unwrap(), Priority::High);

        ctx.session.set_default_priority(Priority::Low).unwrap();
        assert_eq!(ctx.session.default_priority().unwrap(), Priority::Low);
        assert_eq!(ctx.session.preferences().unwrap().len(), 1);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_unreadable_default_priority_falls_back(ctx: &mut SessionTestContext) {
        let user_id = ctx.session.user().unwrap().id;
        ctx.db.set_preference(user_id, "defaultTaskPriority", Some("Urgent")).unwrap();

        assert_eq!(ctx.session.default_priority().unwrap(), Priority::Medium);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_stale_refresh_discarded(ctx: &mut SessionTestContext) {
        ctx.session.add_task(&form("current", Priority::Low)).unwrap();

        let older = ctx.session.begin_refresh();
        let newer = ctx.session.begin_refresh();

        assert!(ctx.session.apply_refresh(newer, Vec::new()));
        assert!(!ctx.session.apply_refresh(older, vec![Task::new(1, "stale", None, Priority::Low, None)]));
        assert!(ctx.session.tasks().is_empty());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_logout_and_delete_account(ctx: &mut SessionTestContext) {
        ctx.session.add_task(&form("Mine", Priority::Low)).unwrap();
        let user_id = ctx.session.user().unwrap().id;

        let deleted = ctx.session.delete_account().unwrap();
        assert_eq!(deleted.email, "alice@example.com");
        assert!(!ctx.session.is_authenticated());
        assert!(ctx.session.tasks().is_empty());

        assert!(ctx.db.user(user_id).unwrap().is_none());
        assert!(ctx.session.login("alice@example.com", "secret1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reload_on_worker() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = open(&temp_dir);
        let worker = Worker::new(db.clone());
        let mut session = Session::new(db.clone());
        session
            .register(&RegistrationForm::new("alice@example.com", "Alice", "secret1", "secret1"))
            .unwrap();
        session.login("alice@example.com", "secret1").unwrap().unwrap();
        session.add_task(&form("one", Priority::High)).unwrap();
        session.add_task(&form("two", Priority::Low)).unwrap();

        session.load(TaskFilter::Priority(Priority::High)).unwrap();
        assert_eq!(session.tasks().len(), 1);

        assert!(session.reload_with(&worker, TaskFilter::All).await.unwrap());
        assert_eq!(session.tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_worker_reports_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let worker = Worker::new(open(&temp_dir));

        let err = worker
            .run(|repo| repo.register("", "", "").and_then(|_| repo.register("", "", "")))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_user());
    }
}
