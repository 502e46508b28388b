use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    taskboard_db::health_check(&pool).await.unwrap();

    for table in ["users", "projects", "tasks"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Column defaults match the documented task defaults.
#[sqlx::test(migrations = "./migrations")]
async fn test_task_column_defaults(pool: PgPool) {
    let (user_id,): (i64,) =
        sqlx::query_as("INSERT INTO users (email, password_hash) VALUES ('d@x.io', 'h') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    let (project_id,): (i64,) =
        sqlx::query_as("INSERT INTO projects (owner_id, name) VALUES ($1, 'P') RETURNING id")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let (priority, completed, tomorrow): (i32, bool, bool) = sqlx::query_as(
        "INSERT INTO tasks (project_id, content) VALUES ($1, 'c')
         RETURNING priority, completed, deadline = CURRENT_DATE + 1",
    )
    .bind(project_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(priority, taskboard_core::tasks::DEFAULT_PRIORITY);
    assert!(!completed);
    assert!(tomorrow, "deadline must default to tomorrow");
}

/// Email uniqueness is enforced by a `uq_`-prefixed constraint.
#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_violates_named_constraint(pool: PgPool) {
    let insert = "INSERT INTO users (email, password_hash) VALUES ('dup@x.io', 'h')";
    sqlx::query(insert).execute(&pool).await.unwrap();

    let err = sqlx::query(insert).execute(&pool).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}
