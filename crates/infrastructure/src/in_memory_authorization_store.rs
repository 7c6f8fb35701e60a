use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use vitrine_application::{
    AccountRecord, AccountRepository, MenuRegistryRepository, PermissionStore, RoleDefinition,
    RoleRepository,
};
use vitrine_core::{AppError, AppResult, NonEmptyString, RoleId};
use vitrine_domain::{MenuKey, MenuNode, PermissionAssignment, Role, builtin_menu_nodes};

/// Role ids seeded for the well-known roles, shared with the SQL seed migration.
const SYSTEM_ROLES: [(u128, &str); 3] = [
    (1, Role::USER_NAME),
    (2, Role::CONTRIBUTOR_NAME),
    (3, Role::ADMIN_NAME),
];

/// In-memory implementation of every authorization persistence port.
///
/// Starts with the built-in menu registry and the three system roles.
#[derive(Debug)]
pub struct InMemoryAuthorizationStore {
    nodes: RwLock<Vec<MenuNode>>,
    roles: RwLock<Vec<RoleDefinition>>,
    assignments: RwLock<HashMap<RoleId, Vec<PermissionAssignment>>>,
    accounts: RwLock<Vec<AccountRecord>>,
    reachable: AtomicBool,
}

impl InMemoryAuthorizationStore {
    /// Creates a store seeded like a fresh installation.
    pub fn new() -> AppResult<Self> {
        let roles = SYSTEM_ROLES
            .iter()
            .map(|(id, name)| RoleDefinition {
                role_id: RoleId::from_uuid(Uuid::from_u128(*id)),
                name: (*name).to_owned(),
                is_system: true,
            })
            .collect();

        Ok(Self {
            nodes: RwLock::new(builtin_menu_nodes()?),
            roles: RwLock::new(roles),
            assignments: RwLock::new(HashMap::new()),
            accounts: RwLock::new(Vec::new()),
            reachable: AtomicBool::new(true),
        })
    }

    /// Adds an active account holding the named role.
    pub async fn add_account(
        &self,
        username: &str,
        password_hash: &str,
        role_name: &str,
    ) -> AppResult<AccountRecord> {
        let role = self
            .find_role_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_name}' does not exist")))?;

        let account = AccountRecord {
            account_id: Uuid::new_v4().to_string(),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            role_id: role.role_id,
            role_name: role.name,
            is_active: true,
        };
        self.accounts.write().await.push(account.clone());

        Ok(account)
    }

    /// Toggles the result of reachability pings.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

fn sorted(mut nodes: Vec<MenuNode>) -> Vec<MenuNode> {
    nodes.sort_by(|left, right| {
        left.sort_order()
            .cmp(&right.sort_order())
            .then_with(|| left.key().as_str().cmp(right.key().as_str()))
    });
    nodes
}

#[async_trait]
impl MenuRegistryRepository for InMemoryAuthorizationStore {
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        let nodes = self.nodes.read().await;
        Ok(sorted(
            nodes.iter().filter(|node| node.is_active()).cloned().collect(),
        ))
    }

    async fn list_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        Ok(sorted(self.nodes.read().await.clone()))
    }

    async fn find_menu_node(&self, key: &MenuKey) -> AppResult<Option<MenuNode>> {
        Ok(self
            .nodes
            .read()
            .await
            .iter()
            .find(|node| node.key() == key)
            .cloned())
    }

    async fn create_menu_node(&self, node: MenuNode) -> AppResult<MenuNode> {
        let mut nodes = self.nodes.write().await;
        if nodes.iter().any(|stored| stored.key() == node.key()) {
            return Err(AppError::Validation(format!(
                "menu item '{}' already exists",
                node.key()
            )));
        }

        nodes.push(node.clone());
        Ok(node)
    }

    async fn update_menu_node(&self, node: MenuNode) -> AppResult<MenuNode> {
        let mut nodes = self.nodes.write().await;
        let stored = nodes
            .iter_mut()
            .find(|stored| stored.key() == node.key())
            .ok_or_else(|| {
                AppError::NotFound(format!("menu item '{}' was not found", node.key()))
            })?;

        *stored = node.clone();
        Ok(node)
    }
}

#[async_trait]
impl PermissionStore for InMemoryAuthorizationStore {
    async fn list_assignments(&self, role_id: RoleId) -> AppResult<Vec<PermissionAssignment>> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable(
                "permission store unreachable".to_owned(),
            ));
        }

        Ok(self
            .assignments
            .read()
            .await
            .get(&role_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_assignments(
        &self,
        role_id: RoleId,
        rows: Vec<PermissionAssignment>,
    ) -> AppResult<()> {
        self.assignments.write().await.insert(role_id, rows);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Unavailable(
                "permission store unreachable".to_owned(),
            ))
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryAuthorizationStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let mut roles = self.roles.read().await.clone();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .find(|role| role.role_id == role_id)
            .cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let name = name.trim();
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .find(|role| role.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn create_role(&self, name: NonEmptyString) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.write().await;
        if roles
            .iter()
            .any(|role| role.name.to_lowercase() == name.as_str().to_lowercase())
        {
            return Err(AppError::Validation(format!(
                "name: role '{}' already exists",
                name.as_str()
            )));
        }

        let role = RoleDefinition {
            role_id: RoleId::new(),
            name: name.into(),
            is_system: false,
        };
        roles.push(role.clone());

        Ok(role)
    }

    async fn rename_role(
        &self,
        role_id: RoleId,
        name: NonEmptyString,
    ) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.write().await;
        let role = roles
            .iter_mut()
            .find(|role| role.role_id == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        role.name = name.into();
        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let before = roles.len();
        roles.retain(|role| role.role_id != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        self.assignments.write().await.remove(&role_id);
        Ok(())
    }

    async fn count_accounts_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = self
            .accounts
            .read()
            .await
            .iter()
            .filter(|account| account.role_id == role_id)
            .count();

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid account count: {error}")))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAuthorizationStore {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_domain::Capabilities;

    #[tokio::test]
    async fn seeds_system_roles_with_stable_ids() -> AppResult<()> {
        let store = InMemoryAuthorizationStore::new()?;
        let admin = store.find_role_by_name("admin").await?;

        assert_eq!(
            admin.map(|role| role.role_id),
            Some(RoleId::from_uuid(Uuid::from_u128(3)))
        );
        assert_eq!(store.list_roles().await?.len(), 3);
        assert_eq!(store.list_active_menu_nodes().await?.len(), 12);
        Ok(())
    }

    #[tokio::test]
    async fn role_names_are_unique_ignoring_case() -> AppResult<()> {
        let store = InMemoryAuthorizationStore::new()?;
        store.create_role(NonEmptyString::new("Editor")?).await?;

        let duplicate = store.create_role(NonEmptyString::new("EDITOR")?).await;
        assert!(matches!(duplicate, Err(AppError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_role_drops_its_rows() -> AppResult<()> {
        let store = InMemoryAuthorizationStore::new()?;
        let role = store.create_role(NonEmptyString::new("Editor")?).await?;
        store
            .replace_assignments(
                role.role_id,
                vec![PermissionAssignment::new(
                    MenuKey::new("dashboard")?,
                    Capabilities::view_only(),
                )],
            )
            .await?;

        store.delete_role(role.role_id).await?;

        assert!(store.list_assignments(role.role_id).await?.is_empty());
        assert!(store.find_role(role.role_id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_store_fails_pings_and_reads() -> AppResult<()> {
        let store = InMemoryAuthorizationStore::new()?;
        store.set_reachable(false);

        assert!(matches!(store.ping().await, Err(AppError::Unavailable(_))));
        assert!(store.list_assignments(RoleId::new()).await.is_err());

        store.set_reachable(true);
        store.ping().await?;
        Ok(())
    }
}
