//! Shared slot for the most recently imported tree.

use std::sync::{Arc, RwLock};

use crate::models::ProductTree;

/// Process-wide holder for the current tree snapshot.
///
/// Imports replace the snapshot wholesale; there is no merge and no
/// persistence. Readers get a clone so the analyzer and serializer work
/// on an immutable snapshot even if an import lands mid-request.
#[derive(Clone, Default)]
pub struct TreeStore {
    inner: Arc<RwLock<Option<ProductTree>>>,
}

impl TreeStore {
    /// Create an empty store (no tree loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, if one has been imported.
    pub fn current(&self) -> Option<ProductTree> {
        self.inner.read().unwrap().clone()
    }

    /// Replace the snapshot. Most recent import wins.
    pub fn replace(&self, tree: ProductTree) {
        *self.inner.write().unwrap() = Some(tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    #[test]
    fn starts_empty() {
        assert!(TreeStore::new().current().is_none());
    }

    #[test]
    fn replace_overwrites_the_previous_snapshot() {
        let store = TreeStore::new();
        store.replace(ProductTree {
            nodes: vec![Node::default(), Node::default()],
            edges: vec![],
        });
        store.replace(ProductTree::default());
        assert_eq!(store.current().unwrap().nodes.len(), 0);
    }
}
