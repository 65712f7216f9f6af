//! The two rollable entity shapes and the sum type that unifies them.
//!
//! A [`Die`] owns its faces. A [`Collection`] owns nothing but the *names*
//! of its members; the [`Registry`] is the only owner of entities, so the
//! same die or collection can sit in many collections (or several times in
//! one) without any shared ownership.

use std::collections::HashSet;
use std::fmt;

use dicebag_foundation::{Error, Result};
use rand::Rng;

use crate::registry::Registry;

/// Largest face count accepted by [`Die::numbered`].
pub const MAX_NUMBERED_FACES: i64 = 1_000_000;

/// A die with arbitrary integer faces and a flat modifier.
///
/// Always has at least one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Die {
    name: String,
    modifier: i64,
    faces: Vec<i64>,
}

impl Die {
    /// Creates a die with the given face values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `faces` is empty.
    pub fn new(name: impl Into<String>, modifier: i64, faces: Vec<i64>) -> Result<Self> {
        let name = name.into();
        if faces.is_empty() {
            return Err(Error::invalid_argument(format!(
                "die {name} needs at least one face"
            )));
        }
        Ok(Self {
            name,
            modifier,
            faces,
        })
    }

    /// Creates a die with faces `1, 2, ..., count`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `count` is below 1 or above
    /// [`MAX_NUMBERED_FACES`].
    pub fn numbered(name: impl Into<String>, modifier: i64, count: i64) -> Result<Self> {
        if !(1..=MAX_NUMBERED_FACES).contains(&count) {
            return Err(Error::invalid_argument(format!(
                "face count must be between 1 and {MAX_NUMBERED_FACES}, got {count}"
            )));
        }
        Self::new(name, modifier, (1..=count).collect())
    }

    /// Returns the die's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the die's modifier.
    #[must_use]
    pub const fn modifier(&self) -> i64 {
        self.modifier
    }

    /// Returns the face values in order.
    #[must_use]
    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    /// Sets the modifier.
    pub fn set_modifier(&mut self, modifier: i64) {
        self.modifier = modifier;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Appends a face. Duplicate values are allowed.
    pub fn add_face(&mut self, value: i64) {
        self.faces.push(value);
    }

    /// Removes the first face equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns `LastFace` if only one face remains (checked first), or
    /// `NotFound` if no face has this value. The die is unchanged on error.
    pub fn remove_face(&mut self, value: i64) -> Result<()> {
        if self.faces.len() == 1 {
            return Err(Error::last_face(&self.name));
        }
        let Some(index) = self.faces.iter().position(|&face| face == value) else {
            return Err(Error::not_found(format!("face {value} on die {}", self.name)));
        };
        self.faces.remove(index);
        Ok(())
    }

    /// Rolls the die: one face chosen uniformly, plus the modifier.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let index = rng.gen_range(0..self.faces.len());
        self.faces[index].saturating_add(self.modifier)
    }
}

/// An ordered, possibly nested, group of rollables referenced by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    modifier: i64,
    contents: Vec<String>,
}

impl Collection {
    /// Creates an empty collection.
    ///
    /// Members can only be attached through [`Registry::add_to_collection`],
    /// which checks that every reference resolves.
    #[must_use]
    pub fn new(name: impl Into<String>, modifier: i64) -> Self {
        Self {
            name: name.into(),
            modifier,
            contents: Vec::new(),
        }
    }

    /// Returns the collection's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection's modifier.
    #[must_use]
    pub const fn modifier(&self) -> i64 {
        self.modifier
    }

    /// Returns the names of the direct members, in insertion order.
    #[must_use]
    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    /// Returns the number of direct member references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns true if the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Returns true if `name` is a direct member.
    #[must_use]
    pub fn holds(&self, name: &str) -> bool {
        self.contents.iter().any(|member| member == name)
    }

    /// Sets the modifier.
    pub fn set_modifier(&mut self, modifier: i64) {
        self.modifier = modifier;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn push(&mut self, name: String) {
        self.contents.push(name);
    }

    /// Removes the first member reference named `name`.
    ///
    /// Returns whether anything was removed. Only one occurrence goes per
    /// call; callers that need every occurrence gone loop until `false`.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.contents.iter().position(|member| member == name) {
            Some(index) => {
                self.contents.remove(index);
                true
            }
            None => false,
        }
    }

    /// Points every reference to `old` at `new` instead. Returns how many
    /// references changed.
    pub(crate) fn rename_references(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for member in &mut self.contents {
            if member == old {
                new.clone_into(member);
                changed += 1;
            }
        }
        changed
    }

    /// Returns true if `target` is a direct member, or is contained by any
    /// member collection at any depth.
    ///
    /// The walk keeps its own stack, so nesting depth is bounded by memory
    /// rather than the call stack, and a visited set so that a corrupted
    /// graph can't send it around a cycle forever.
    #[must_use]
    pub fn contains(&self, registry: &Registry, target: &str) -> bool {
        let mut visited = HashSet::new();
        visited.insert(self.name.as_str());
        let mut pending = vec![self];

        while let Some(current) = pending.pop() {
            if current.holds(target) {
                return true;
            }
            for member in &current.contents {
                if let Some(Rollable::Collection(inner)) = registry.lookup(member) {
                    if visited.insert(inner.name()) {
                        pending.push(inner);
                    }
                }
            }
        }
        false
    }

    /// Checks whether `target` may be added to this collection.
    ///
    /// # Errors
    ///
    /// - `NullReference` if `target` doesn't name a registry entry
    /// - `SelfContainment` if `target` is this collection, or a collection
    ///   that already contains it at any depth
    pub fn check_insert(&self, registry: &Registry, target: &str) -> Result<()> {
        let Some(entry) = registry.lookup(target) else {
            return Err(Error::null_reference(format!(
                "{target} does not exist, can't add it to {}",
                self.name
            )));
        };
        if target == self.name {
            return Err(Error::self_containment(&self.name, target));
        }
        if let Rollable::Collection(inner) = entry {
            if inner.contains(registry, &self.name) {
                return Err(Error::self_containment(&self.name, target));
            }
        }
        Ok(())
    }
}

/// Which shape a [`Rollable`] has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollableKind {
    /// A single die.
    Die,
    /// A collection of rollables.
    Collection,
}

impl fmt::Display for RollableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Die => write!(f, "die"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// Any named, modified entity that can be rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollable {
    /// A die.
    Die(Die),
    /// A collection.
    Collection(Collection),
}

impl Rollable {
    /// Returns the entity's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Die(die) => die.name(),
            Self::Collection(collection) => collection.name(),
        }
    }

    /// Returns the entity's modifier.
    #[must_use]
    pub const fn modifier(&self) -> i64 {
        match self {
            Self::Die(die) => die.modifier(),
            Self::Collection(collection) => collection.modifier(),
        }
    }

    /// Returns which shape this entity has.
    #[must_use]
    pub const fn kind(&self) -> RollableKind {
        match self {
            Self::Die(_) => RollableKind::Die,
            Self::Collection(_) => RollableKind::Collection,
        }
    }

    /// Sets the entity's modifier.
    pub fn set_modifier(&mut self, modifier: i64) {
        match self {
            Self::Die(die) => die.set_modifier(modifier),
            Self::Collection(collection) => collection.set_modifier(modifier),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Die(die) => die.set_name(name),
            Self::Collection(collection) => collection.set_name(name),
        }
    }

    /// Returns the die, if this is one.
    #[must_use]
    pub const fn as_die(&self) -> Option<&Die> {
        match self {
            Self::Die(die) => Some(die),
            Self::Collection(_) => None,
        }
    }

    /// Returns the collection, if this is one.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Die(_) => None,
            Self::Collection(collection) => Some(collection),
        }
    }
}

impl From<Die> for Rollable {
    fn from(die: Die) -> Self {
        Self::Die(die)
    }
}

impl From<Collection> for Rollable {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}
