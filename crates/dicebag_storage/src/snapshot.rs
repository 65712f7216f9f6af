//! Flat, serializable form of a registry.
//!
//! A [`Snapshot`] holds two independent lists: every die with its faces,
//! and every collection with the *names* of its direct members. Nothing is
//! inlined, so an arbitrary reference graph (shared members, duplicates,
//! deep nesting) flattens without loss.
//!
//! Rebuilding happens in two phases. All dice are registered, then every
//! collection is registered as an empty shell. Only after that are member
//! lists wired up, so a collection may name another collection that appears
//! anywhere in the list. Cycles are checked once, after all wiring.

use dicebag_foundation::{Error, Result};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::rollable::{Collection, Die};

/// A persisted die.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DieRecord {
    /// Unique name.
    pub name: String,
    /// Flat modifier.
    pub modifier: i64,
    /// Face values in order.
    pub faces: Vec<i64>,
}

/// A persisted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectionRecord {
    /// Unique name.
    pub name: String,
    /// Flat modifier.
    pub modifier: i64,
    /// Names of the direct members, in order.
    pub contents: Vec<String>,
}

/// The dual-list persisted form of a [`Registry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Snapshot {
    /// Every die, in registry order.
    pub dice: Vec<DieRecord>,
    /// Every collection, in registry order.
    pub collections: Vec<CollectionRecord>,
}

impl Snapshot {
    /// Returns the total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len() + self.collections.len()
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty() && self.collections.is_empty()
    }
}

impl From<&Registry> for Snapshot {
    fn from(registry: &Registry) -> Self {
        registry.snapshot()
    }
}

impl Registry {
    /// Flattens the registry into its persisted form.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let dice = self
            .dice()
            .map(|die| DieRecord {
                name: die.name().to_string(),
                modifier: die.modifier(),
                faces: die.faces().to_vec(),
            })
            .collect();
        let collections = self
            .collections()
            .map(|collection| CollectionRecord {
                name: collection.name().to_string(),
                modifier: collection.modifier(),
                contents: collection.contents().to_vec(),
            })
            .collect();
        Snapshot { dice, collections }
    }

    /// Rebuilds a registry from its persisted form.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a die record without faces
    /// - `DuplicateName` if two records share a name
    /// - `DanglingReference` if a member name matches no record
    /// - `SelfContainment` if the member lists describe a cycle
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut registry = Registry::new();

        for record in snapshot.dice {
            registry.add(Die::new(record.name, record.modifier, record.faces)?)?;
        }

        let mut wiring = Vec::with_capacity(snapshot.collections.len());
        for record in snapshot.collections {
            registry.add(Collection::new(record.name.clone(), record.modifier))?;
            wiring.push((record.name, record.contents));
        }

        for (collection, contents) in &wiring {
            for member in contents {
                if !registry.contains_name(member) {
                    return Err(Error::dangling_reference(collection, member));
                }
                registry.attach_unchecked(collection, member)?;
            }
        }
        if let Some((collection, member)) = registry.find_containment_cycle() {
            return Err(Error::self_containment(collection, member));
        }

        debug!(
            dice = registry.dice().count(),
            collections = wiring.len(),
            "rebuilt registry from snapshot"
        );
        Ok(registry)
    }
}
