//! The tree index: ordered items plus an identifier lookup

use crate::error::{Error, Result};
use crate::item::TreeItem;
use crate::options::{DuplicatePolicy, StoreOptions, TraversalOrder, UpdateMode};
use std::collections::{HashMap, HashSet};

/// In-memory index over items linked to each other by parent identifiers
///
/// Items live in a single vector in insertion order. The lookup map holds
/// positions into that vector rather than copies, and is rebuilt whenever
/// positions shift, so every identifier maps to exactly one stored item.
///
/// Parent/child links are not materialized; children are found by scanning
/// for matching `parent` fields.
#[derive(Debug, Clone)]
pub struct TreeStore<T: TreeItem> {
    items: Vec<T>,
    positions: HashMap<T::Id, usize>,
    options: StoreOptions,
}

impl<T: TreeItem> Default for TreeStore<T> {
    fn default() -> Self {
        Self::empty(StoreOptions::default())
    }
}

impl<T: TreeItem> FromIterator<T> for TreeStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T: TreeItem> TreeStore<T> {
    /// Create an empty store with the given options
    pub fn empty(options: StoreOptions) -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
            options,
        }
    }

    /// Build a store from an initial collection, never failing
    ///
    /// Items without an id are skipped. When two items share an id the later
    /// one wins and takes the earlier one's slot. The store keeps
    /// [`StoreOptions::lenient`] for subsequent mutations.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let mut store = Self::empty(StoreOptions::lenient());
        let mut skipped = 0usize;

        for item in items {
            match item.id().cloned() {
                Some(id) => store.insert(id, item),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} items without an id", skipped);
        }
        tracing::debug!("Built tree store with {} items", store.items.len());
        store
    }

    /// Build a store, applying `options` to every initial item like `add_item`
    pub fn with_options(items: impl IntoIterator<Item = T>, options: StoreOptions) -> Result<Self> {
        let mut store = Self::empty(options);
        for item in items {
            store.add_item(item)?;
        }
        tracing::debug!(
            "Built tree store with {} items, options={:?}",
            store.items.len(),
            options
        );
        Ok(store)
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn set_options(&mut self, options: StoreOptions) {
        self.options = options;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// All items in insertion order
    pub fn get_all(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.positions.contains_key(id)
    }

    /// Get an item by id
    pub fn get_item(&self, id: &T::Id) -> Option<&T> {
        self.positions.get(id).map(|&pos| &self.items[pos])
    }

    /// Items without a parent, in insertion order
    pub fn roots(&self) -> Vec<&T> {
        self.items.iter().filter(|item| item.parent().is_none()).collect()
    }

    /// Direct children of `id`, in insertion order
    ///
    /// `id` does not have to exist; items naming it as parent are returned
    /// regardless.
    pub fn get_children(&self, id: &T::Id) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| item.parent() == Some(id))
            .collect()
    }

    /// Every transitive descendant of `id`, in [`TraversalOrder::Stack`] order
    pub fn get_all_children(&self, id: &T::Id) -> Vec<&T> {
        self.get_all_children_ordered(id, TraversalOrder::Stack)
    }

    /// Every transitive descendant of `id`, excluding `id` itself
    ///
    /// A node reached a second time through a parent cycle is not expanded
    /// again, so the walk always terminates.
    pub fn get_all_children_ordered(&self, id: &T::Id, order: TraversalOrder) -> Vec<&T> {
        let mut result = Vec::new();
        let mut visited: HashSet<&T::Id> = HashSet::new();
        visited.insert(id);

        let mut stack = self.children_for_stack(id, order);

        while let Some(current) = stack.pop() {
            let Some(current_id) = current.id() else {
                continue;
            };
            if !visited.insert(current_id) {
                tracing::warn!("Parent cycle at {} while walking descendants of {}", current_id, id);
                continue;
            }
            result.push(current);
            stack.extend(self.children_for_stack(current_id, order));
        }

        tracing::debug!(
            "Descendants of {}: {} items, order={:?}",
            id,
            result.len(),
            order
        );
        result
    }

    /// Ancestors of `id`, furthest first and immediate parent last
    ///
    /// Stops silently at a parent id that does not resolve to an item.
    pub fn get_all_parents(&self, id: &T::Id) -> Vec<&T> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&T::Id> = HashSet::new();
        visited.insert(id);

        let mut current = self.get_item(id);
        while let Some(parent_id) = current.and_then(|item| item.parent()) {
            if !visited.insert(parent_id) {
                tracing::warn!("Parent cycle at {} while walking ancestors of {}", parent_id, id);
                break;
            }
            current = self.get_item(parent_id);
            if let Some(parent) = current {
                chain.push(parent);
            }
        }

        chain.reverse();
        tracing::debug!("Ancestors of {}: {} items", id, chain.len());
        chain
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a new item
    ///
    /// Fails with `InvalidItem` when the id is absent, `DuplicateId` when the
    /// id exists and duplicates are rejected, and `CycleDetected` when cycles
    /// are rejected and the item would be its own ancestor.
    pub fn add_item(&mut self, item: T) -> Result<()> {
        let id = item.id().cloned().ok_or_else(Error::missing_id)?;

        if self.options.duplicates == DuplicatePolicy::Reject && self.contains(&id) {
            return Err(Error::DuplicateId(id.to_string()));
        }
        if self.options.reject_cycles && self.closes_cycle(&id, item.parent()) {
            return Err(Error::CycleDetected(id.to_string()));
        }

        tracing::debug!("Adding item {}", id);
        self.insert(id, item);
        Ok(())
    }

    /// Remove `id` and its whole subtree, returning the removed items
    ///
    /// Removing an unknown id that nothing names as parent is a no-op.
    pub fn remove_item(&mut self, id: &T::Id) -> Vec<T> {
        let mut doomed: HashSet<T::Id> = self
            .get_all_children(id)
            .into_iter()
            .filter_map(|item| item.id().cloned())
            .collect();
        if self.contains(id) {
            doomed.insert(id.clone());
        }

        if doomed.is_empty() {
            tracing::debug!("Nothing to remove for {}", id);
            return Vec::new();
        }

        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.id().is_some_and(|item_id| doomed.contains(item_id)));
        self.items = kept;
        self.reindex();

        tracing::debug!("Removed {} items under {}", removed.len(), id);
        removed
    }

    /// Update the stored item sharing `item`'s id
    ///
    /// With [`UpdateMode::ValidateOnly`] the item is validated and located
    /// but nothing is written.
    pub fn update_item(&mut self, item: T) -> Result<()> {
        let id = item.id().cloned().ok_or_else(Error::missing_id)?;
        let pos = *self
            .positions
            .get(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        match self.options.update {
            UpdateMode::ValidateOnly => {
                tracing::debug!("Validated update for {} (not applied)", id);
            }
            UpdateMode::Replace => {
                if self.options.reject_cycles && self.closes_cycle(&id, item.parent()) {
                    return Err(Error::CycleDetected(id.to_string()));
                }
                tracing::debug!("Updating item {}", id);
                self.items[pos] = item;
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn insert(&mut self, id: T::Id, item: T) {
        if let Some(&pos) = self.positions.get(&id) {
            self.items[pos] = item;
        } else {
            self.positions.insert(id, self.items.len());
            self.items.push(item);
        }
    }

    fn reindex(&mut self) {
        self.positions = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(pos, item)| item.id().map(|id| (id.clone(), pos)))
            .collect();
    }

    /// Children arranged so that popping yields them in `order`
    fn children_for_stack(&self, id: &T::Id, order: TraversalOrder) -> Vec<&T> {
        let mut children = self.get_children(id);
        if order == TraversalOrder::PreOrder {
            children.reverse();
        }
        children
    }

    /// Whether an item `id` placed under `parent` would be its own ancestor
    fn closes_cycle(&self, id: &T::Id, parent: Option<&T::Id>) -> bool {
        let mut seen: HashSet<&T::Id> = HashSet::new();
        let mut next = parent;

        while let Some(parent_id) = next {
            if parent_id == id {
                return true;
            }
            // an existing cycle that does not pass through `id`
            if !seen.insert(parent_id) {
                return false;
            }
            next = self.get_item(parent_id).and_then(|item| item.parent());
        }
        false
    }
}
