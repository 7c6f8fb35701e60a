use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use vitrine_core::RoleId;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects to `DATABASE_URL` and runs migrations, or skips when it is unset.
pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tests: {error}");
    }

    Some(pool)
}

/// Unique name for rows created by one test.
pub(crate) fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub(crate) async fn insert_role(pool: &PgPool, name: &str) -> RoleId {
    let role_id = RoleId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO roles (id, name, is_system)
        VALUES ($1, $2, FALSE)
        "#,
    )
    .bind(role_id.as_uuid())
    .bind(name)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    role_id
}
