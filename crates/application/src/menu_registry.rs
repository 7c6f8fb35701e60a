use std::collections::HashMap;
use std::sync::Arc;

use vitrine_core::AppResult;
use vitrine_domain::{MenuKey, MenuNode};

use crate::MenuRegistryRepository;

/// Menu node together with the label of its declared parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNodeListing {
    /// Registry node.
    pub node: MenuNode,
    /// Label of the parent, when the parent key resolves.
    pub parent_label: Option<String>,
}

/// Read side of the menu registry.
#[derive(Clone)]
pub struct MenuRegistry {
    repository: Arc<dyn MenuRegistryRepository>,
}

impl MenuRegistry {
    /// Creates a registry over a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn MenuRegistryRepository>) -> Self {
        Self { repository }
    }

    /// Lists active nodes ordered by sort order.
    pub async fn list_active(&self) -> AppResult<Vec<MenuNode>> {
        self.repository.list_active_menu_nodes().await
    }

    /// Lists every node with its parent label.
    pub async fn list_with_parents(&self) -> AppResult<Vec<MenuNodeListing>> {
        let nodes = self.repository.list_menu_nodes().await?;
        let labels: HashMap<MenuKey, String> = nodes
            .iter()
            .map(|node| (node.key().clone(), node.label().to_owned()))
            .collect();

        Ok(nodes
            .into_iter()
            .map(|node| MenuNodeListing {
                parent_label: node
                    .parent_key()
                    .and_then(|parent_key| labels.get(parent_key).cloned()),
                node,
            })
            .collect())
    }

    /// Finds one node by key.
    pub async fn find(&self, key: &MenuKey) -> AppResult<Option<MenuNode>> {
        self.repository.find_menu_node(key).await
    }

    /// Returns the first key in the parent chain of `node` that loops back to it.
    ///
    /// The chain is walked against the stored registry with `node` substituted
    /// for its stored version.
    pub async fn find_parent_cycle(&self, node: &MenuNode) -> AppResult<Option<MenuKey>> {
        let mut parents: HashMap<MenuKey, Option<MenuKey>> = self
            .repository
            .list_menu_nodes()
            .await?
            .into_iter()
            .map(|stored| (stored.key().clone(), stored.parent_key().cloned()))
            .collect();
        parents.insert(node.key().clone(), node.parent_key().cloned());

        let mut current = node.parent_key().cloned();
        let mut steps = 0usize;
        while let Some(key) = current {
            if &key == node.key() {
                return Ok(Some(key));
            }

            steps += 1;
            if steps > parents.len() {
                return Ok(Some(key));
            }

            current = parents.get(&key).cloned().flatten();
        }

        Ok(None)
    }

    /// Returns whether a parent key resolves to a stored node.
    pub async fn parent_exists(&self, parent_key: &MenuKey) -> AppResult<bool> {
        Ok(self.repository.find_menu_node(parent_key).await?.is_some())
    }
}

