use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use vitrine_core::{AppError, AppResult, NonEmptyString, RoleId, UserIdentity};
use vitrine_domain::{
    MenuKey, MenuNode, PermissionAssignment, ResolvedMenu, Role, builtin_menu_nodes,
};

use crate::{
    AccountRecord, AccountRepository, AuditEvent, AuditSink, MenuRegistry,
    MenuRegistryRepository, PasswordVerifier, PermissionResolver, PermissionStore,
    ResolvedMenuCache, RoleDefinition, RoleRepository, StoreHealth,
};

pub(crate) fn key(value: &str) -> MenuKey {
    match MenuKey::new(value) {
        Ok(key) => key,
        Err(error) => panic!("invalid test key: {error}"),
    }
}

/// One fake backing every persistence port.
pub(crate) struct FakeStore {
    pub nodes: Mutex<Vec<MenuNode>>,
    pub roles: Mutex<Vec<RoleDefinition>>,
    pub assignments: Mutex<HashMap<RoleId, Vec<PermissionAssignment>>>,
    pub accounts: Mutex<Vec<AccountRecord>>,
    pub events: Mutex<Vec<AuditEvent>>,
    pub read_delay: Mutex<Option<Duration>>,
    pub assignment_reads: AtomicUsize,
    pub fail_writes: AtomicBool,
    pub fail_ping: AtomicBool,
    pub hang_ping: AtomicBool,
}

impl FakeStore {
    pub(crate) fn seeded() -> Arc<Self> {
        let roles = [Role::USER_NAME, Role::CONTRIBUTOR_NAME, Role::ADMIN_NAME]
            .into_iter()
            .map(|name| RoleDefinition {
                role_id: RoleId::new(),
                name: name.to_owned(),
                is_system: true,
            })
            .collect();

        Arc::new(Self {
            nodes: Mutex::new(builtin_menu_nodes().unwrap_or_default()),
            roles: Mutex::new(roles),
            assignments: Mutex::new(HashMap::new()),
            accounts: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            read_delay: Mutex::new(None),
            assignment_reads: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            fail_ping: AtomicBool::new(false),
            hang_ping: AtomicBool::new(false),
        })
    }

    pub(crate) async fn role(&self, name: &str) -> RoleDefinition {
        let roles = self.roles.lock().await;
        match roles.iter().find(|role| role.name == name) {
            Some(role) => role.clone(),
            None => panic!("unknown test role {name}"),
        }
    }

    pub(crate) async fn identity(&self, name: &str) -> UserIdentity {
        let role = self.role(name).await;
        UserIdentity::new(
            format!("account-{}", name.to_lowercase()),
            name.to_lowercase(),
            role.role_id,
            role.name,
        )
    }

    pub(crate) async fn actions(&self) -> Vec<vitrine_domain::AuditAction> {
        self.events
            .lock()
            .await
            .iter()
            .map(|event| event.action)
            .collect()
    }

    async fn delay(&self) {
        let delay = *self.read_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MenuRegistryRepository for FakeStore {
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        self.delay().await;
        Ok(self
            .nodes
            .lock()
            .await
            .iter()
            .filter(|node| node.is_active())
            .cloned()
            .collect())
    }

    async fn list_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        Ok(self.nodes.lock().await.clone())
    }

    async fn find_menu_node(&self, key: &MenuKey) -> AppResult<Option<MenuNode>> {
        Ok(self
            .nodes
            .lock()
            .await
            .iter()
            .find(|node| node.key() == key)
            .cloned())
    }

    async fn create_menu_node(&self, node: MenuNode) -> AppResult<MenuNode> {
        let mut nodes = self.nodes.lock().await;
        if nodes.iter().any(|stored| stored.key() == node.key()) {
            return Err(AppError::Validation("duplicate key".to_owned()));
        }
        nodes.push(node.clone());
        Ok(node)
    }

    async fn update_menu_node(&self, node: MenuNode) -> AppResult<MenuNode> {
        let mut nodes = self.nodes.lock().await;
        let Some(stored) = nodes.iter_mut().find(|stored| stored.key() == node.key()) else {
            return Err(AppError::NotFound("menu node".to_owned()));
        };
        *stored = node.clone();
        Ok(node)
    }
}

#[async_trait]
impl PermissionStore for FakeStore {
    async fn list_assignments(&self, role_id: RoleId) -> AppResult<Vec<PermissionAssignment>> {
        self.delay().await;
        self.assignment_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .assignments
            .lock()
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
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("write failed".to_owned()));
        }
        self.assignments.lock().await.insert(role_id, rows);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.hang_ping.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection refused".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for FakeStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.role_id == role_id)
            .cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create_role(&self, name: NonEmptyString) -> AppResult<RoleDefinition> {
        let role = RoleDefinition {
            role_id: RoleId::new(),
            name: name.into(),
            is_system: false,
        };
        self.roles.lock().await.push(role.clone());
        Ok(role)
    }

    async fn rename_role(
        &self,
        role_id: RoleId,
        name: NonEmptyString,
    ) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.lock().await;
        let Some(role) = roles.iter_mut().find(|role| role.role_id == role_id) else {
            return Err(AppError::NotFound("role".to_owned()));
        };
        role.name = name.into();
        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.roles.lock().await.retain(|role| role.role_id != role_id);
        self.assignments.lock().await.remove(&role_id);
        Ok(())
    }

    async fn count_accounts_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|account| account.role_id == role_id)
            .count() as u64)
    }
}

#[async_trait]
impl AccountRepository for FakeStore {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }
}

#[async_trait]
impl AuditSink for FakeStore {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Accepts a password when the stored hash is `plain:<password>`.
pub(crate) struct PlainPasswordVerifier;

impl PasswordVerifier for PlainPasswordVerifier {
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}

/// Cache without expiry, enough to observe hits and invalidation.
#[derive(Default)]
pub(crate) struct FakeMenuCache {
    entries: Mutex<HashMap<RoleId, Arc<ResolvedMenu>>>,
}

#[async_trait]
impl ResolvedMenuCache for FakeMenuCache {
    async fn get_menu(&self, role_id: RoleId) -> AppResult<Option<Arc<ResolvedMenu>>> {
        Ok(self.entries.lock().await.get(&role_id).cloned())
    }

    async fn set_menu(
        &self,
        role_id: RoleId,
        menu: Arc<ResolvedMenu>,
        _ttl_seconds: u32,
    ) -> AppResult<()> {
        self.entries.lock().await.insert(role_id, menu);
        Ok(())
    }

    async fn invalidate_role(&self, role_id: RoleId) -> AppResult<()> {
        self.entries.lock().await.remove(&role_id);
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

pub(crate) fn resolver(store: &Arc<FakeStore>) -> PermissionResolver {
    resolver_with(store, StoreHealth::new(3), Duration::from_millis(500))
}

pub(crate) fn resolver_with(
    store: &Arc<FakeStore>,
    store_health: StoreHealth,
    store_timeout: Duration,
) -> PermissionResolver {
    PermissionResolver::new(
        MenuRegistry::new(store.clone()),
        store.clone(),
        store_health,
        store_timeout,
    )
}
