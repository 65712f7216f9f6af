//! The name registry.
//!
//! The `Registry` owns every die and collection, keyed by a name that is
//! unique across the whole registry. Iteration follows creation order.
//! Collections refer to their members by name, so removing or renaming an
//! entity has to fix up those references here, in one place.

use std::collections::HashSet;

use dicebag_foundation::{Error, Result};
use indexmap::IndexMap;
use rand::Rng;
use tracing::debug;

use crate::roll::{RollBreakdown, RollOutcome};
use crate::rollable::{Collection, Die, Rollable};

/// Owner of every named entity.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    objects: IndexMap<String, Rollable>,
}

// `IndexMap`'s own equality ignores order, but creation order is part of
// what a registry is: it drives listings and snapshots.
impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool {
        self.objects.len() == other.objects.len() && self.objects.iter().eq(other.objects.iter())
    }
}

impl Eq for Registry {}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the registry holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over all entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rollable> + '_ {
        self.objects.values()
    }

    /// Iterates over all names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.objects.keys().map(String::as_str)
    }

    /// Iterates over the dice in creation order.
    pub fn dice(&self) -> impl Iterator<Item = &Die> + '_ {
        self.objects.values().filter_map(Rollable::as_die)
    }

    /// Iterates over the collections in creation order.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> + '_ {
        self.objects.values().filter_map(Rollable::as_collection)
    }

    /// Adds an entity.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is taken; the registry is unchanged.
    pub fn add(&mut self, object: impl Into<Rollable>) -> Result<()> {
        let object = object.into();
        if self.objects.contains_key(object.name()) {
            return Err(Error::duplicate_name(object.name()));
        }
        debug!(name = object.name(), kind = %object.kind(), "registered");
        self.objects.insert(object.name().to_string(), object);
        Ok(())
    }

    /// Removes an entity and strips every reference to it from every
    /// collection, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entity has this name.
    pub fn remove(&mut self, name: &str) -> Result<Rollable> {
        let removed = self
            .objects
            .shift_remove(name)
            .ok_or_else(|| Error::not_found(name))?;

        let mut purged = 0usize;
        for object in self.objects.values_mut() {
            if let Rollable::Collection(collection) = object {
                while collection.remove(name) {
                    purged += 1;
                }
            }
        }
        debug!(name, purged, "removed");
        Ok(removed)
    }

    /// Looks up an entity by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Rollable> {
        self.objects.get(name)
    }

    /// Returns true if an entity has this name.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Looks up an entity, failing if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entity has this name.
    pub fn get(&self, name: &str) -> Result<&Rollable> {
        self.lookup(name).ok_or_else(|| Error::not_found(name))
    }

    /// Looks up a die.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `InvalidArgument` if it is a collection.
    pub fn die(&self, name: &str) -> Result<&Die> {
        self.get(name)?
            .as_die()
            .ok_or_else(|| Error::invalid_argument(format!("{name} is not a die")))
    }

    /// Looks up a collection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `InvalidArgument` if it is a die.
    pub fn collection(&self, name: &str) -> Result<&Collection> {
        self.get(name)?
            .as_collection()
            .ok_or_else(|| Error::invalid_argument(format!("{name} is not a collection")))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Rollable> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| Error::not_found(name))
    }

    fn die_mut(&mut self, name: &str) -> Result<&mut Die> {
        match self.get_mut(name)? {
            Rollable::Die(die) => Ok(die),
            Rollable::Collection(_) => Err(Error::invalid_argument(format!("{name} is not a die"))),
        }
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        match self.get_mut(name)? {
            Rollable::Collection(collection) => Ok(collection),
            Rollable::Die(_) => Err(Error::invalid_argument(format!(
                "{name} is not a collection"
            ))),
        }
    }

    /// Renames an entity.
    ///
    /// The entity keeps its place in creation order and every collection
    /// reference to `old` is rewritten to `new`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `old` is absent, or `DuplicateName` if `new`
    /// already names a different entity.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let index = self
            .objects
            .get_index_of(old)
            .ok_or_else(|| Error::not_found(old))?;
        if old == new {
            return Ok(());
        }
        if self.objects.contains_key(new) {
            return Err(Error::duplicate_name(new));
        }

        let (_, mut object) = self
            .objects
            .shift_remove_index(index)
            .ok_or_else(|| Error::not_found(old))?;
        object.set_name(new.to_string());
        let (last, _) = self.objects.insert_full(new.to_string(), object);
        self.objects.move_index(last, index);

        let mut rewritten = 0usize;
        for object in self.objects.values_mut() {
            if let Rollable::Collection(collection) = object {
                rewritten += collection.rename_references(old, new);
            }
        }
        debug!(old, new, rewritten, "renamed");
        Ok(())
    }

    /// Sets an entity's modifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entity has this name.
    pub fn set_modifier(&mut self, name: &str, modifier: i64) -> Result<()> {
        self.get_mut(name)?.set_modifier(modifier);
        Ok(())
    }

    /// Appends a face to a die.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `InvalidArgument` if not a die.
    pub fn add_face(&mut self, die: &str, value: i64) -> Result<()> {
        self.die_mut(die)?.add_face(value);
        Ok(())
    }

    /// Removes the first face with this value from a die.
    ///
    /// # Errors
    ///
    /// Returns `LastFace` or `NotFound` per [`Die::remove_face`], plus the
    /// lookup errors of [`Registry::die`].
    pub fn remove_face(&mut self, die: &str, value: i64) -> Result<()> {
        self.die_mut(die)?.remove_face(value)
    }

    /// Adds `target` to `collection`. Duplicate references are allowed.
    ///
    /// # Errors
    ///
    /// Returns `NullReference` if `target` doesn't exist and
    /// `SelfContainment` if the add would create a containment cycle.
    /// The collection is unchanged on error.
    pub fn add_to_collection(&mut self, collection: &str, target: &str) -> Result<()> {
        self.collection(collection)?.check_insert(self, target)?;
        self.collection_mut(collection)?.push(target.to_string());
        debug!(collection, target, "attached");
        Ok(())
    }

    /// Appends `target` to `collection` without the containment check.
    /// Callers must run [`Registry::find_containment_cycle`] once wiring is
    /// done.
    pub(crate) fn attach_unchecked(&mut self, collection: &str, target: &str) -> Result<()> {
        self.collection_mut(collection)?.push(target.to_string());
        Ok(())
    }

    /// Finds one containment edge that closes a cycle, as
    /// `(collection, member)`.
    ///
    /// A single colored depth-first pass over every collection with an
    /// explicit stack, so it stays linear in the size of the graph and
    /// doesn't depend on nesting depth.
    pub(crate) fn find_containment_cycle(&self) -> Option<(&str, &str)> {
        let mut finished: HashSet<&str> = HashSet::new();
        let mut open: HashSet<&str> = HashSet::new();

        for root in self.collections() {
            if finished.contains(root.name()) {
                continue;
            }
            open.insert(root.name());
            let mut stack: Vec<(&Collection, usize)> = vec![(root, 0)];

            while let Some((collection, next)) = stack.last_mut() {
                let collection = *collection;
                let Some(member) = collection.contents().get(*next) else {
                    open.remove(collection.name());
                    finished.insert(collection.name());
                    stack.pop();
                    continue;
                };
                *next += 1;

                let Some(Rollable::Collection(inner)) = self.lookup(member) else {
                    continue;
                };
                if open.contains(inner.name()) {
                    return Some((collection.name(), inner.name()));
                }
                if !finished.contains(inner.name()) {
                    open.insert(inner.name());
                    stack.push((inner, 0));
                }
            }
        }
        None
    }

    /// Removes the first reference to `target` from `collection`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `target` is not a direct member.
    pub fn remove_from_collection(&mut self, collection: &str, target: &str) -> Result<()> {
        if self.collection_mut(collection)?.remove(target) {
            Ok(())
        } else {
            Err(Error::not_found(format!("{target} in {collection}")))
        }
    }

    /// Returns true if `collection` contains `target` at any depth.
    ///
    /// # Errors
    ///
    /// Returns the lookup errors of [`Registry::collection`].
    pub fn contains(&self, collection: &str, target: &str) -> Result<bool> {
        Ok(self.collection(collection)?.contains(self, target))
    }

    /// Rolls any entity.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, or any error from
    /// [`Collection::roll_detailed`].
    pub fn roll<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<RollOutcome> {
        match self.get(name)? {
            Rollable::Die(die) => Ok(RollOutcome::Die {
                name: die.name().to_string(),
                value: die.roll(rng),
            }),
            Rollable::Collection(collection) => Ok(RollOutcome::Collection(
                collection.roll_detailed(self, rng, true)?,
            )),
        }
    }

    /// Rolls a collection and returns its breakdown.
    ///
    /// # Errors
    ///
    /// Returns the lookup errors of [`Registry::collection`] and any error
    /// from [`Collection::roll_detailed`].
    pub fn roll_detailed<R: Rng + ?Sized>(
        &self,
        collection: &str,
        rng: &mut R,
    ) -> Result<RollBreakdown> {
        self.collection(collection)?.roll_detailed(self, rng, true)
    }
}
