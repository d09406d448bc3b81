//! Per-session identity map.
//!
//! Holds one copy of every entity loaded or persisted through a session,
//! keyed by table and id. Bulk statements bypass it, which is why they hand
//! back a [`Stale`](crate::query::Stale) token.

use std::any::Any;

use hashbrown::HashMap;

use crate::entity::Entity;

#[derive(Default)]
pub struct IdentityMap {
    entries: HashMap<(&'static str, i64), Box<dyn Any + Send>>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached copy of the entity with `id`, if any.
    pub fn get<E: Entity>(&self, id: i64) -> Option<&E> {
        self.entries
            .get(&(E::TABLE, id))
            .and_then(|entry| entry.downcast_ref())
    }

    /// Caches `entity`, replacing any previous copy.
    ///
    /// Returns `false` when the entity has no id yet and was not cached.
    pub fn insert<E: Entity>(&mut self, entity: E) -> bool {
        match entity.id() {
            Some(id) => {
                self.entries.insert((E::TABLE, id), Box::new(entity));
                true
            }
            None => false,
        }
    }

    pub fn evict<E: Entity>(&mut self, id: i64) -> bool {
        self.entries.remove(&(E::TABLE, id)).is_some()
    }

    /// Drops every cached entity of `table`, returning how many there were.
    pub fn evict_table(&mut self, table: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(cached, _), _| *cached != table);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for IdentityMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
