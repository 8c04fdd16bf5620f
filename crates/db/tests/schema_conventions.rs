use sqlx::PgPool;

/// All `id` and `film_id` columns must be bigint.
#[sqlx::test(migrations = false)]
async fn test_all_keys_are_bigint(pool: PgPool) {
    filmdb_db::create_schema(&pool).await.unwrap();

    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT table_name, column_name, data_type
         FROM information_schema.columns
         WHERE column_name IN ('id', 'film_id')
           AND table_schema = 'public'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 5);
    for (table, column, data_type) in &rows {
        assert_eq!(data_type, "bigint", "{table}.{column} should be bigint");
    }
}

/// Every table must have created_at and updated_at as timestamptz.
#[sqlx::test(migrations = false)]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    filmdb_db::create_schema(&pool).await.unwrap();

    for table in ["film", "studio", "producer"] {
        let columns: Vec<(String,)> = sqlx::query_as(
            "SELECT column_name
             FROM information_schema.columns
             WHERE table_schema = 'public'
               AND table_name = $1
               AND column_name IN ('created_at', 'updated_at')
               AND data_type = 'timestamp with time zone'",
        )
        .bind(table)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(columns.len(), 2, "{table} is missing timestamptz audit columns");
    }
}

/// Child tables reference `film` without cascading; the application deletes children.
#[sqlx::test(migrations = false)]
async fn test_child_foreign_keys_do_not_cascade(pool: PgPool) {
    filmdb_db::create_schema(&pool).await.unwrap();

    let rules: Vec<(String, String)> = sqlx::query_as(
        "SELECT constraint_name, delete_rule
         FROM information_schema.referential_constraints
         WHERE constraint_schema = 'public'
         ORDER BY constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rules,
        vec![
            ("fk_producer_film".to_string(), "NO ACTION".to_string()),
            ("fk_studio_film".to_string(), "NO ACTION".to_string()),
        ]
    );
}

/// Repopulating replaces all data with the six sample films.
#[sqlx::test(migrations = false)]
async fn test_populate_is_repeatable(pool: PgPool) {
    filmdb_db::populate(&pool).await.unwrap();
    sqlx::query("DELETE FROM producer").execute(&pool).await.unwrap();
    filmdb_db::populate(&pool).await.unwrap();

    let (films, producers): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM film), (SELECT COUNT(*) FROM producer)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((films, producers), (6, 9));
}
