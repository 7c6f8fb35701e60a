//! Forest assembly for parent-linked menu items.
//!
//! Items are linked through a key index built once, so assembly is linear in
//! the number of items apart from the initial sort. Items whose parent is
//! absent from the input become roots, and a parent chain that loops back on
//! itself is cut at the item that closes the loop.

use std::collections::HashMap;

use super::MenuKey;

/// Item that can be placed into a menu forest.
pub trait MenuTreeItem {
    /// Unique key of the item.
    fn key(&self) -> &MenuKey;

    /// Declared parent key.
    fn parent_key(&self) -> Option<&MenuKey>;

    /// Position among siblings.
    fn sort_order(&self) -> i32;
}

/// Owned tree node produced by [`assemble_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTreeNode<T> {
    /// Item stored at this position.
    pub item: T,
    /// Children ordered by sort order, then key.
    pub children: Vec<MenuTreeNode<T>>,
}

/// Result of assembling a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeAssembly<T> {
    /// Root nodes ordered by sort order, then key.
    pub roots: Vec<MenuTreeNode<T>>,
    /// Keys that declared a parent but were placed at the root.
    pub promoted: Vec<MenuKey>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    OnPath,
    Done,
}

/// Assembles items into a forest ordered by (sort order, key).
///
/// When keys repeat, the first item in sorted order owns the key for child
/// linking.
#[must_use]
pub fn assemble_tree<T: MenuTreeItem>(mut items: Vec<T>) -> TreeAssembly<T> {
    items.sort_by(|left, right| {
        left.sort_order()
            .cmp(&right.sort_order())
            .then_with(|| left.key().cmp(right.key()))
    });

    let mut parents: Vec<Option<usize>> = {
        let mut index: HashMap<&MenuKey, usize> = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            index.entry(item.key()).or_insert(position);
        }

        items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                item.parent_key()
                    .and_then(|parent_key| index.get(parent_key).copied())
                    .filter(|parent| *parent != position)
            })
            .collect()
    };

    break_cycles(&mut parents);

    let promoted = items
        .iter()
        .zip(&parents)
        .filter(|(item, parent)| item.parent_key().is_some() && parent.is_none())
        .map(|(item, _)| item.key().clone())
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (position, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(position),
            None => roots.push(position),
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let roots = roots
        .into_iter()
        .filter_map(|position| take_subtree(position, &mut slots, &children))
        .collect();

    TreeAssembly { roots, promoted }
}

/// Cuts every parent loop by detaching the item whose parent link closes it.
fn break_cycles(parents: &mut [Option<usize>]) {
    let mut visits = vec![Visit::Pending; parents.len()];
    let mut path = Vec::new();

    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(position) = current {
            match visits[position] {
                Visit::Pending => {
                    visits[position] = Visit::OnPath;
                    path.push(position);
                    current = parents[position];
                }
                Visit::OnPath => {
                    if let Some(&closing) = path.last() {
                        parents[closing] = None;
                    }
                    break;
                }
                Visit::Done => break,
            }
        }

        for position in path.drain(..) {
            visits[position] = Visit::Done;
        }
    }
}

fn take_subtree<T>(
    position: usize,
    slots: &mut [Option<T>],
    children: &[Vec<usize>],
) -> Option<MenuTreeNode<T>> {
    let item = slots[position].take()?;
    let children = children[position]
        .iter()
        .filter_map(|child| take_subtree(*child, slots, children))
        .collect();

    Some(MenuTreeNode { item, children })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{MenuTreeItem, MenuTreeNode, assemble_tree};
    use crate::MenuKey;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        key: MenuKey,
        parent: Option<MenuKey>,
        sort_order: i32,
    }

    impl MenuTreeItem for Item {
        fn key(&self) -> &MenuKey {
            &self.key
        }

        fn parent_key(&self) -> Option<&MenuKey> {
            self.parent.as_ref()
        }

        fn sort_order(&self) -> i32 {
            self.sort_order
        }
    }

    fn key(value: &str) -> MenuKey {
        match MenuKey::new(value) {
            Ok(key) => key,
            Err(error) => panic!("invalid test key: {error}"),
        }
    }

    fn item(value: &str, parent: Option<&str>, sort_order: i32) -> Item {
        Item {
            key: key(value),
            parent: parent.map(key),
            sort_order,
        }
    }

    fn shape(nodes: &[MenuTreeNode<Item>]) -> Vec<(String, Vec<String>)> {
        let mut flattened = Vec::new();
        for node in nodes {
            flattened.push((
                node.item.key.to_string(),
                node.children
                    .iter()
                    .map(|child| child.item.key.to_string())
                    .collect(),
            ));
            flattened.extend(shape(&node.children));
        }
        flattened
    }

    fn count(nodes: &[MenuTreeNode<Item>]) -> usize {
        nodes.iter().map(|node| 1 + count(&node.children)).sum()
    }

    #[test]
    fn links_children_under_their_parents_in_sort_order() {
        let assembly = assemble_tree(vec![
            item("monitoring_license", Some("solar_hub"), 2),
            item("solar_hub", None, 4),
            item("dashboard", None, 1),
            item("monitoring_crjr", Some("solar_hub"), 1),
        ]);

        assert_eq!(
            shape(&assembly.roots),
            vec![
                ("dashboard".to_owned(), vec![]),
                (
                    "solar_hub".to_owned(),
                    vec!["monitoring_crjr".to_owned(), "monitoring_license".to_owned()]
                ),
                ("monitoring_crjr".to_owned(), vec![]),
                ("monitoring_license".to_owned(), vec![]),
            ]
        );
        assert!(assembly.promoted.is_empty());
    }

    #[test]
    fn dangling_parent_becomes_root() {
        let assembly = assemble_tree(vec![
            item("dashboard", None, 1),
            item("orphan", Some("missing_parent"), 2),
        ]);

        let roots: Vec<_> = assembly
            .roots
            .iter()
            .map(|node| node.item.key.as_str())
            .collect();
        assert_eq!(roots, vec!["dashboard", "orphan"]);
        assert_eq!(assembly.promoted, vec![key("orphan")]);
    }

    #[test]
    fn sort_ties_are_broken_by_key() {
        let assembly = assemble_tree(vec![item("beta", None, 1), item("alpha", None, 1)]);
        let roots: Vec<_> = assembly
            .roots
            .iter()
            .map(|node| node.item.key.as_str())
            .collect();
        assert_eq!(roots, vec!["alpha", "beta"]);
    }

    #[test]
    fn parent_cycle_keeps_every_item() {
        let assembly = assemble_tree(vec![
            item("first", Some("second"), 1),
            item("second", Some("third"), 2),
            item("third", Some("first"), 3),
        ]);

        assert_eq!(count(&assembly.roots), 3);
        assert_eq!(assembly.roots.len(), 1);
        assert_eq!(assembly.promoted.len(), 1);
    }

    fn arbitrary_items() -> impl Strategy<Value = Vec<Item>> {
        (1usize..24).prop_flat_map(|size| {
            (
                proptest::collection::vec(proptest::option::of(0..size + 2), size),
                proptest::collection::vec(-3i32..4, size),
            )
                .prop_map(move |(parents, sort_orders)| {
                    parents
                        .into_iter()
                        .zip(sort_orders)
                        .enumerate()
                        .map(|(position, (parent, sort_order))| Item {
                            key: key(&format!("node_{position}")),
                            parent: parent.map(|parent| key(&format!("node_{parent}"))),
                            sort_order,
                        })
                        .collect::<Vec<_>>()
                })
        })
    }

    proptest! {
        #[test]
        fn assembly_is_invariant_under_input_permutation(
            (items, shuffled) in arbitrary_items().prop_flat_map(|items| {
                let shuffled = Just(items.clone()).prop_shuffle();
                (Just(items), shuffled)
            })
        ) {
            let expected = assemble_tree(items);
            let actual = assemble_tree(shuffled);
            prop_assert_eq!(expected, actual);
        }

        #[test]
        fn assembly_never_drops_items(items in arbitrary_items()) {
            let expected = items.len();
            let assembly = assemble_tree(items);
            prop_assert_eq!(count(&assembly.roots), expected);
        }
    }
}
