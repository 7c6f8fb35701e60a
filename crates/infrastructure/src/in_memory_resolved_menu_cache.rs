use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use vitrine_application::ResolvedMenuCache;
use vitrine_core::{AppResult, RoleId};
use vitrine_domain::ResolvedMenu;

#[derive(Debug, Clone)]
struct ResolvedMenuCacheEntry {
    menu: Arc<ResolvedMenu>,
    expires_at: Instant,
}

/// In-memory cache adapter for resolved menus, keyed by role.
#[derive(Default)]
pub struct InMemoryResolvedMenuCache {
    entries: RwLock<HashMap<RoleId, ResolvedMenuCacheEntry>>,
}

impl InMemoryResolvedMenuCache {
    /// Creates an empty in-memory menu cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResolvedMenuCache for InMemoryResolvedMenuCache {
    async fn get_menu(&self, role_id: RoleId) -> AppResult<Option<Arc<ResolvedMenu>>> {
        {
            let entries = self.entries.read().await;
            match entries.get(&role_id) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.menu.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(&role_id)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(&role_id);
        }

        Ok(None)
    }

    async fn set_menu(
        &self,
        role_id: RoleId,
        menu: Arc<ResolvedMenu>,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(role_id, ResolvedMenuCacheEntry { menu, expires_at });

        Ok(())
    }

    async fn invalidate_role(&self, role_id: RoleId) -> AppResult<()> {
        self.entries.write().await.remove(&role_id);
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_domain::{PermissionSource, Role, builtin_menu_nodes};

    fn menu() -> AppResult<Arc<ResolvedMenu>> {
        Ok(Arc::new(ResolvedMenu::resolve(
            &Role::Admin,
            builtin_menu_nodes()?,
            &PermissionSource::Static,
        )))
    }

    #[tokio::test]
    async fn returns_fresh_entries() -> AppResult<()> {
        let cache = InMemoryResolvedMenuCache::new();
        let role_id = RoleId::new();
        cache.set_menu(role_id, menu()?, 30).await?;

        assert!(cache.get_menu(role_id).await?.is_some());
        assert!(cache.get_menu(RoleId::new()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() -> AppResult<()> {
        let cache = InMemoryResolvedMenuCache::new();
        let role_id = RoleId::new();
        cache.set_menu(role_id, menu()?, 0).await?;

        assert!(cache.get_menu(role_id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn invalidation_drops_entries() -> AppResult<()> {
        let cache = InMemoryResolvedMenuCache::new();
        let first = RoleId::new();
        let second = RoleId::new();
        cache.set_menu(first, menu()?, 30).await?;
        cache.set_menu(second, menu()?, 30).await?;

        cache.invalidate_role(first).await?;
        assert!(cache.get_menu(first).await?.is_none());
        assert!(cache.get_menu(second).await?.is_some());

        cache.invalidate_all().await?;
        assert!(cache.get_menu(second).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn expired_entries_are_evicted() -> AppResult<()> {
        let cache = InMemoryResolvedMenuCache::new();
        let role_id = RoleId::new();
        cache.entries.write().await.insert(
            role_id,
            ResolvedMenuCacheEntry {
                menu: menu()?,
                expires_at: Instant::now(),
            },
        );

        assert!(cache.get_menu(role_id).await?.is_none());
        assert!(cache.entries.read().await.is_empty());
        Ok(())
    }
}
