use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, warn};
use vitrine_core::{AppError, AppResult, RoleId, UserIdentity};
use vitrine_domain::{PermissionSource, ResolvedMenu, Role, builtin_menu_nodes};

use crate::{MenuRegistry, PermissionStore, ResolvedMenuCache, StoreHealth};

/// Default bound on store reads issued while gating a request.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Produces the capability-annotated menu forest for a role.
#[derive(Clone)]
pub struct PermissionResolver {
    menu_registry: MenuRegistry,
    permission_store: Arc<dyn PermissionStore>,
    store_health: StoreHealth,
    store_timeout: Duration,
    cache: Option<Arc<dyn ResolvedMenuCache>>,
    cache_ttl_seconds: u32,
    invalidations: Arc<AtomicU64>,
}

impl PermissionResolver {
    /// Creates a resolver without a cache.
    #[must_use]
    pub fn new(
        menu_registry: MenuRegistry,
        permission_store: Arc<dyn PermissionStore>,
        store_health: StoreHealth,
        store_timeout: Duration,
    ) -> Self {
        Self {
            menu_registry,
            permission_store,
            store_health,
            store_timeout,
            cache: None,
            cache_ttl_seconds: 0,
            invalidations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Enables the resolved-menu cache. A ttl of zero keeps it disabled.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResolvedMenuCache>, ttl_seconds: u32) -> Self {
        if ttl_seconds > 0 {
            self.cache = Some(cache);
            self.cache_ttl_seconds = ttl_seconds;
        }
        self
    }

    /// Resolves the menu for the role carried by a verified identity.
    pub async fn resolve_for(&self, identity: &UserIdentity) -> AppResult<Arc<ResolvedMenu>> {
        let role_id = identity.role_id();
        self.resolve(role_id, &Role::classify(role_id, identity.role_name()))
            .await
    }

    /// Resolves the menu for one role.
    ///
    /// A confirmed store outage serves the static table from the built-in
    /// registry. A store read that exceeds the timeout denies the request
    /// with [`AppError::Unavailable`].
    pub async fn resolve(&self, role_id: RoleId, role: &Role) -> AppResult<Arc<ResolvedMenu>> {
        if self.store_health.is_unreachable() {
            warn!(%role_id, "permission store unreachable, serving static capability table");
            return Ok(Arc::new(ResolvedMenu::resolve(
                role,
                builtin_menu_nodes()?,
                &PermissionSource::Static,
            )));
        }

        if let Some(menu) = self.cached(role_id).await {
            return Ok(menu);
        }

        let generation = self.invalidations.load(Ordering::Acquire);
        let load = async {
            tokio::try_join!(
                self.menu_registry.list_active(),
                self.permission_store.list_assignments(role_id),
            )
        };
        let (nodes, rows) = tokio::time::timeout(self.store_timeout, load)
            .await
            .map_err(|_| {
                warn!(
                    %role_id,
                    timeout_ms = self.store_timeout.as_millis(),
                    "permission lookup timed out"
                );
                AppError::Unavailable("permission lookup timed out".to_owned())
            })??;

        let source = PermissionSource::select(rows);
        let menu = Arc::new(ResolvedMenu::resolve(role, nodes, &source));
        if !menu.promoted.is_empty() {
            debug!(
                %role_id,
                promoted = ?menu.promoted,
                "menu nodes with unresolved parents placed at root"
            );
        }

        self.store_in_cache(role_id, menu.clone(), generation).await;
        Ok(menu)
    }

    /// Drops the cached menu of one role.
    pub async fn invalidate_role(&self, role_id: RoleId) {
        self.invalidations.fetch_add(1, Ordering::AcqRel);
        if let Some(cache) = &self.cache
            && let Err(error) = cache.invalidate_role(role_id).await
        {
            warn!(%role_id, %error, "failed to invalidate resolved menu cache");
        }
    }

    /// Drops every cached menu.
    pub async fn invalidate_all(&self) {
        self.invalidations.fetch_add(1, Ordering::AcqRel);
        if let Some(cache) = &self.cache
            && let Err(error) = cache.invalidate_all().await
        {
            warn!(%error, "failed to invalidate resolved menu cache");
        }
    }

    async fn cached(&self, role_id: RoleId) -> Option<Arc<ResolvedMenu>> {
        let cache = self.cache.as_ref()?;
        match cache.get_menu(role_id).await {
            Ok(menu) => menu,
            Err(error) => {
                warn!(%role_id, %error, "failed to read resolved menu cache");
                None
            }
        }
    }

    /// Caches a menu loaded while `generation` was current.
    ///
    /// Menus loaded before an invalidation are never left behind in the cache.
    async fn store_in_cache(&self, role_id: RoleId, menu: Arc<ResolvedMenu>, generation: u64) {
        let Some(cache) = &self.cache else {
            return;
        };
        if self.invalidations.load(Ordering::Acquire) != generation {
            debug!(%role_id, "skipping cache write for menu loaded before invalidation");
            return;
        }

        if let Err(error) = cache
            .set_menu(role_id, menu, self.cache_ttl_seconds)
            .await
        {
            warn!(%role_id, %error, "failed to write resolved menu cache");
        }

        if self.invalidations.load(Ordering::Acquire) != generation
            && let Err(error) = cache.invalidate_role(role_id).await
        {
            warn!(%role_id, %error, "failed to invalidate resolved menu cache");
        }
    }
}
