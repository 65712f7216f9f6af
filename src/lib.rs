//! dicebag - build custom dice, nest them in collections, roll the lot
//!
//! This crate re-exports all layers of dicebag for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: dicebag_runtime    - REPL, command language, file store, serialization
//! Layer 1: dicebag_storage    - Registry, dice, collections, rolls, snapshots
//! Layer 0: dicebag_foundation - Error types, modifier formatting
//! ```

pub use dicebag_foundation as foundation;
pub use dicebag_runtime as runtime;
pub use dicebag_storage as storage;
