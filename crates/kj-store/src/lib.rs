//! kj-store: the singer queue table.
//!
//! Defines the entry data model and the [`EntryStore`] trait the rotation
//! scheduler talks to: read a full snapshot, write a single field, append a
//! row, reorder rows. [`QueueStore`] implements it on top of
//! [redb](https://docs.rs/redb), either on disk or in memory.
//!
//! # Architecture
//!
//! Entries are JSON-serialized into redb's `&[u8]` value columns, keyed by
//! their stable [`EntryId`]. Physical row order is kept as a separate list in
//! the `meta` table so that sorting rewrites only the order, never the ids.
//!
//! The `QueueStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::{EntryStore, QueueStore};
pub use types::*;
