#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;
    use taskdesk::db::db::{compact_sql, format_sql, parse_url, Database, SqlLog};
    use taskdesk::db::pool::Target;
    use taskdesk::db::repository::Repository;
    use taskdesk::libs::config::DbConfig;
    use taskdesk::libs::error::StoreError;
    use taskdesk::libs::task::{Priority, Task, TaskFilter};

    #[test]
    fn test_parse_url() {
        assert_eq!(parse_url("sqlite::memory:").unwrap(), Target::Memory);
        assert_eq!(parse_url(":memory:").unwrap(), Target::Memory);
        assert_eq!(
            parse_url("sqlite:///var/lib/taskdesk.db").unwrap(),
            Target::File(PathBuf::from("/var/lib/taskdesk.db"))
        );
        assert_eq!(parse_url("sqlite:tasks.db").unwrap(), Target::File(PathBuf::from("tasks.db")));
        assert_eq!(parse_url("tasks.db").unwrap(), Target::File(PathBuf::from("tasks.db")));
        assert!(matches!(parse_url("sqlite://"), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_unsupported_driver() {
        let mut config = DbConfig::in_memory();
        config.driver = "postgresql".to_string();

        let err = Database::open(&config).err().expect("driver must be rejected");
        assert!(matches!(err, StoreError::Config(_)));
        assert!(err.to_string().contains("postgresql"));

        config.driver = "SQLite".to_string();
        assert!(Database::open(&config).is_ok());
    }

    #[test]
    fn test_credentials_are_ignored() {
        let mut config = DbConfig::in_memory();
        config.username = "admin".to_string();
        config.password = "secret".to_string();

        let db = Database::open(&config).unwrap();
        assert_eq!(db.location(), ":memory:");
    }

    #[test]
    fn test_sql_log_modes() {
        let mut config = DbConfig::in_memory();
        assert_eq!(SqlLog::from_config(&config), SqlLog::Formatted);
        config.format_sql = false;
        assert_eq!(SqlLog::from_config(&config), SqlLog::Plain);
        config.show_sql = false;
        assert_eq!(SqlLog::from_config(&config), SqlLog::Off);
    }

    #[test]
    fn test_format_sql() {
        let sql = "SELECT id, title FROM tasks   WHERE user_id = ?1 AND completed = ?2 ORDER BY created_at DESC";
        assert_eq!(
            format_sql(sql),
            "SELECT id, title\nFROM tasks\nWHERE user_id = ?1\n    AND completed = ?2\nORDER BY created_at DESC"
        );
        assert_eq!(
            compact_sql("UPDATE tasks\n    SET title = ?2\n    WHERE id = ?1"),
            "UPDATE tasks SET title = ?2 WHERE id = ?1"
        );
    }

    #[test]
    fn test_memory_database_shared_by_every_call() {
        let db = Database::open_in_memory().unwrap();
        let user = db.register("alice@example.com", "secret1", "Alice").unwrap();
        db.save_task(&Task::new(user.id, "Buy milk", None, Priority::Low, None)).unwrap();

        assert_eq!(db.tasks_for_user(user.id, TaskFilter::All).unwrap().len(), 1);
    }

    #[test]
    fn test_pool_serves_more_callers_than_connections() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("taskdesk.db").display());
        let mut config = DbConfig::for_url(&url);
        config.pool_size = 2;
        config.show_sql = false;
        let db = Arc::new(Database::open(&config).unwrap());
        let user = db.register("alice@example.com", "secret1", "Alice").unwrap();

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..5 {
                        let title = format!("task {}-{}", i, j);
                        db.save_task(&Task::new(user.id, &title, None, Priority::Medium, None)).unwrap();
                        db.tasks_for_user(user.id, TaskFilter::All).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(db.tasks_for_user(user.id, TaskFilter::All).unwrap().len(), 30);
    }

    #[test]
    fn test_pooled_connections_are_configured() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("taskdesk.db").display());
        let db = Database::open(&DbConfig::for_url(&url)).unwrap();

        let conn = db.connection().unwrap();
        let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0)).unwrap();
        let foreign_keys: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(journal_mode, "wal");
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_memory_pool_holds_one_connection() {
        let mut config = DbConfig::in_memory();
        config.pool_size = 8;
        let db = Database::open(&config).unwrap();

        let conn = db.connection().unwrap();
        let foreign_keys: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(foreign_keys, 1);
        drop(conn);

        assert_eq!(db.pool_size(), 1);
    }
}
