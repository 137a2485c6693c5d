//! kj-rotation: the round-robin singer rotation.
//!
//! Decides who sings next. Every operation is a pure function over a
//! snapshot of the queue table that returns the field writes to make:
//!
//! - [`enroll`] assigns a round and arrival time to a new sign-up
//! - [`select_next`] picks the waiting entry that should be called up next
//! - [`advance`], [`skip`] and [`start`] compute stage transitions
//!
//! [`Rotation`] wires those functions to an [`kj_store::EntryStore`]: it
//! reads a fresh snapshot per call, applies the resulting mutations, and
//! logs what happened.
//!
//! # Architecture
//!
//! ```text
//! Rotation<S: EntryStore>
//!   ├── read_all()      → snapshot
//!   ├── schedule::*     → Outcome { mutations, notice }
//!   └── apply(mutations)
//! ```

pub mod controller;
pub mod error;
pub mod schedule;
pub mod view;

pub use controller::Rotation;
pub use error::{RotationError, RotationResult};
pub use schedule::{Notice, Outcome, advance, enroll, select_next, skip, skip_note, start};
pub use view::QueueView;

#[cfg(test)]
mod tests_props;
