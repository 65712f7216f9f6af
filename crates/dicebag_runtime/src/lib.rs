//! REPL, command language, file store, and serialization for dicebag.
//!
//! This crate provides:
//! - [`Session`] - executes `|`-separated command lines against a registry
//! - [`Repl`] - interactive read-eval-print loop over a [`LineEditor`]
//! - [`FileStore`] - named save files in a directory
//! - MessagePack encoding of registries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod render;
pub mod repl;
pub mod serialize;
pub mod session;
pub mod store;

pub use command::{Command, Shape, Step};
pub use config::{Config, DEFAULT_EXTENSION, DEFAULT_STORE_DIR};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Repl;
pub use serialize::{from_bytes, load_from_file, save_to_file, snapshot_from_bytes, to_bytes};
pub use session::{Failure, LineReport, Response, Session};
pub use store::FileStore;
