//! Insertion-ordered collections keyed by [`EntityId`].
//!
//! Nested project data (rooms, requirements, line items) is owned by its
//! parent and addressed only by local identity. [`Collection`] keeps the
//! user-visible order while giving O(1) lookup by id, and serializes as a
//! plain JSON array so the persisted document shape stays a list.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::EntityId;

/// An entity that carries its own local identity.
pub trait Identified {
    fn id(&self) -> EntityId;
}

/// Ordered, id-indexed collection of nested entities.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: IndexMap<EntityId, T>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.items.shift_remove(&id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.items.keys().copied()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first().map(|(_, v)| v)
    }
}

impl<T: Identified> Collection<T> {
    /// Append an entity. An entity whose id is already present replaces the
    /// existing entry in place.
    pub fn push(&mut self, item: T) -> EntityId {
        let id = item.id();
        self.items.insert(id, item);
        id
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Order-sensitive equality: two collections are equal only when they hold
/// equal entities in the same order.
impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a == b)
    }
}

impl<T: Identified> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for item in iter {
            collection.push(item);
        }
        collection
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, EntityId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.values())
    }
}

impl<'de, T: Identified + Deserialize<'de>> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        let mut collection = Self::new();
        for item in items {
            let id = item.id();
            if collection.contains(id) {
                return Err(serde::de::Error::custom(format!("duplicate id {id}")));
            }
            collection.push(item);
        }
        Ok(collection)
    }
}
