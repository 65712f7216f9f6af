//! Dice, collections, the name registry, roll aggregation, and snapshots.
//!
//! This crate provides:
//! - [`Die`] and [`Collection`] - The two rollable entity shapes, unified by [`Rollable`]
//! - [`Registry`] - Sole owner of every entity, keyed by unique name in creation order
//! - [`RollBreakdown`] - Flat, labeled result of rolling a collection hierarchy
//! - [`Snapshot`] - Flat dual-list form used to persist and rebuild a registry

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod registry;
pub mod roll;
pub mod rollable;
pub mod snapshot;

pub use registry::Registry;
pub use roll::{RollBreakdown, RollEntry, RollOutcome};
pub use rollable::{Collection, Die, Rollable, RollableKind};
pub use snapshot::{CollectionRecord, DieRecord, Snapshot};
