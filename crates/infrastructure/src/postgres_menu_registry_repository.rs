use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use vitrine_application::MenuRegistryRepository;
use vitrine_core::{AppError, AppResult};
use vitrine_domain::{MenuKey, MenuNode};


/// PostgreSQL-backed menu registry.
#[derive(Clone)]
pub struct PostgresMenuRegistryRepository {
    pool: PgPool,
}

impl PostgresMenuRegistryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuItemRow {
    menu_key: String,
    label: String,
    path: String,
    icon: Option<String>,
    parent_key: Option<String>,
    sort_order: i32,
    is_active: bool,
}

impl MenuItemRow {
    fn into_node(self) -> AppResult<MenuNode> {
        let key = MenuKey::new(self.menu_key.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "stored menu item '{}' has an invalid key: {error}",
                self.menu_key
            ))
        })?;
        let parent_key = self
            .parent_key
            .map(MenuKey::new)
            .transpose()
            .map_err(|error| {
                AppError::Internal(format!(
                    "stored menu item '{key}' has an invalid parent key: {error}"
                ))
            })?;

        MenuNode::new(
            key,
            self.label,
            self.path,
            self.icon,
            parent_key,
            self.sort_order,
            self.is_active,
        )
        .map_err(|error| AppError::Internal(format!("stored menu item is invalid: {error}")))
    }
}

fn map_menu_conflict(error: sqlx::Error, key: &MenuKey) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Validation(format!("menu item '{key}' already exists"));
    }

    AppError::Internal(format!("failed to persist menu item '{key}': {error}"))
}

#[async_trait]
impl MenuRegistryRepository for PostgresMenuRegistryRepository {
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT menu_key, label, path, icon, parent_key, sort_order, is_active
            FROM menu_items
            WHERE is_active
            ORDER BY sort_order, menu_key
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list menu items: {error}")))?;

        rows.into_iter().map(MenuItemRow::into_node).collect()
    }

    async fn list_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT menu_key, label, path, icon, parent_key, sort_order, is_active
            FROM menu_items
            ORDER BY sort_order, menu_key
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list menu items: {error}")))?;

        rows.into_iter().map(MenuItemRow::into_node).collect()
    }

    async fn find_menu_node(&self, key: &MenuKey) -> AppResult<Option<MenuNode>> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT menu_key, label, path, icon, parent_key, sort_order, is_active
            FROM menu_items
            WHERE menu_key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find menu item '{key}': {error}"))
        })?;

        row.map(MenuItemRow::into_node).transpose()
    }

    async fn create_menu_node(&self, node: MenuNode) -> AppResult<MenuNode> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (menu_key, label, path, icon, parent_key, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(node.key().as_str())
        .bind(node.label())
        .bind(node.path())
        .bind(node.icon())
        .bind(node.parent_key().map(MenuKey::as_str))
        .bind(node.sort_order())
        .bind(node.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| map_menu_conflict(error, node.key()))?;

        Ok(node)
    }

    async fn update_menu_node(&self, node: MenuNode) -> AppResult<MenuNode> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET label = $2,
                path = $3,
                icon = $4,
                parent_key = $5,
                sort_order = $6,
                is_active = $7,
                updated_at = now()
            WHERE menu_key = $1
            "#,
        )
        .bind(node.key().as_str())
        .bind(node.label())
        .bind(node.path())
        .bind(node.icon())
        .bind(node.parent_key().map(MenuKey::as_str))
        .bind(node.sort_order())
        .bind(node.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| map_menu_conflict(error, node.key()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "menu item '{}' was not found",
                node.key()
            )));
        }

        Ok(node)
    }
}
