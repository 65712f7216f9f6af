//! Roll aggregation.
//!
//! Rolling a collection produces one flat, depth-first, pre-order list of
//! labeled values. Each collection contributes:
//!
//! ```text
//! (name, modifier, part)          its own modifier
//! ...members...                   dice as (name, roll, part); nested collections inlined
//! (name + " Subtotal", sum, subtotal)   or " Total" for the outermost one
//! ```
//!
//! A subtotal is the collection's modifier plus every *part* entry below it.
//! Nested subtotal lines are never summed again, so nothing is counted twice.

use std::collections::HashSet;
use std::fmt;

use dicebag_foundation::{Error, Result};
use rand::Rng;

use crate::registry::Registry;
use crate::rollable::{Collection, Rollable};

/// One labeled line of a roll breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollEntry {
    /// Entity name, or `"<name> Subtotal"` / `"<name> Total"`.
    pub label: String,
    /// The rolled value, modifier, or aggregate.
    pub value: i64,
    /// True for subtotal and total lines.
    pub is_subtotal: bool,
}

impl RollEntry {
    /// Creates a contributing (non-subtotal) entry.
    #[must_use]
    pub fn part(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
            is_subtotal: false,
        }
    }

    /// Creates a subtotal entry.
    #[must_use]
    pub fn subtotal(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
            is_subtotal: true,
        }
    }
}

impl fmt::Display for RollEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// The full, flat result of rolling a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollBreakdown {
    entries: Vec<RollEntry>,
}

impl RollBreakdown {
    /// Returns the entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[RollEntry] {
        &self.entries
    }

    /// Returns the closing total (the last entry), or 0 for an empty breakdown.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.entries.last().map_or(0, |entry| entry.value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, RollEntry> {
        self.entries.iter()
    }

    /// Consumes the breakdown, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<RollEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a RollBreakdown {
    type Item = &'a RollEntry;
    type IntoIter = std::slice::Iter<'a, RollEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<RollEntry> for RollBreakdown {
    fn from_iter<I: IntoIterator<Item = RollEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The result of rolling any registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// A single die roll, modifier included.
    Die {
        /// The die's name.
        name: String,
        /// The rolled value.
        value: i64,
    },
    /// A collection breakdown.
    Collection(RollBreakdown),
}

impl RollOutcome {
    /// Returns the final number: the die value or the collection total.
    #[must_use]
    pub fn total(&self) -> i64 {
        match self {
            Self::Die { value, .. } => *value,
            Self::Collection(breakdown) => breakdown.total(),
        }
    }
}

impl Collection {
    /// Rolls every member and returns the flat labeled breakdown.
    ///
    /// `is_outermost` picks the closing label: `"<name> Total"` when true,
    /// `"<name> Subtotal"` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a member name no longer resolves, or
    /// `SelfContainment` if the hierarchy loops back on itself.
    pub fn roll_detailed<R: Rng + ?Sized>(
        &self,
        registry: &Registry,
        rng: &mut R,
        is_outermost: bool,
    ) -> Result<RollBreakdown> {
        let mut entries = vec![RollEntry::part(self.name(), self.modifier())];
        // Open collections, outermost first. `open` mirrors the names for
        // the cycle check: the same collection may appear in several
        // branches, it just can't appear inside itself.
        let mut frames = vec![Frame::new(self)];
        let mut open = HashSet::from([self.name()]);

        while let Some(frame) = frames.last_mut() {
            let collection = frame.collection;
            let Some(member) = collection.contents().get(frame.next) else {
                let subtotal = frame.subtotal;
                open.remove(collection.name());
                frames.pop();
                let suffix = if frames.is_empty() && is_outermost {
                    "Total"
                } else {
                    "Subtotal"
                };
                entries.push(RollEntry::subtotal(
                    format!("{} {suffix}", collection.name()),
                    subtotal,
                ));
                match frames.last_mut() {
                    Some(parent) => parent.subtotal = parent.subtotal.saturating_add(subtotal),
                    None => break,
                }
                continue;
            };
            frame.next += 1;

            match registry.get(member)? {
                Rollable::Die(die) => {
                    let value = die.roll(rng);
                    frame.subtotal = frame.subtotal.saturating_add(value);
                    entries.push(RollEntry::part(die.name(), value));
                }
                Rollable::Collection(inner) => {
                    if !open.insert(inner.name()) {
                        return Err(Error::self_containment(collection.name(), inner.name()));
                    }
                    entries.push(RollEntry::part(inner.name(), inner.modifier()));
                    frames.push(Frame::new(inner));
                }
            }
        }
        Ok(RollBreakdown { entries })
    }

    /// Rolls the collection and returns only its total.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::roll_detailed`].
    pub fn roll<R: Rng + ?Sized>(&self, registry: &Registry, rng: &mut R) -> Result<i64> {
        Ok(self.roll_detailed(registry, rng, true)?.total())
    }
}

/// A collection being rolled: where its member walk is and what it has
/// summed so far.
struct Frame<'a> {
    collection: &'a Collection,
    next: usize,
    subtotal: i64,
}

impl<'a> Frame<'a> {
    const fn new(collection: &'a Collection) -> Self {
        Self {
            collection,
            next: 0,
            subtotal: collection.modifier(),
        }
    }
}
