//! Rotation: runs the schedule against a live entry store.
//!
//! Each entry point reads a fresh snapshot, computes the transition with
//! the pure functions in [`crate::schedule`], and applies the resulting
//! mutation list in one `apply` call. Nothing is cached between calls, so
//! callers must serialize invocations (one operation at a time).

use tracing::{debug, info, warn};

use kj_core::epoch_millis;
use kj_store::{Entry, EntryStatus, EntryStore, Mutation, Timestamp, rotation_order};

use crate::error::{RotationError, RotationResult};
use crate::schedule::{self, Notice, Outcome};
use crate::view::QueueView;

type Clock = Box<dyn Fn() -> Timestamp + Send + Sync>;

/// The rotation scheduler bound to a store.
pub struct Rotation<S> {
    store: S,
    clock: Clock,
}

impl<S: EntryStore> Rotation<S> {
    /// Create a rotation over `store` using the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, epoch_millis)
    }

    /// Create a rotation with a custom millisecond clock.
    pub fn with_clock(store: S, clock: impl Fn() -> Timestamp + Send + Sync + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sign up a singer and append their row.
    pub fn on_new_registration(&self, name: &str) -> RotationResult<Entry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RotationError::EmptyName);
        }

        let snapshot = self.store.read_all()?;
        let new = schedule::enroll(&snapshot, name, (self.clock)());
        let entry = self.store.append_row(new)?;

        info!(row = %entry.id, name = %entry.name, round = entry.round, "singer registered");
        Ok(entry)
    }

    /// Mark the current singer done and move the queue along.
    pub fn on_advance(&self) -> RotationResult<Outcome> {
        let snapshot = self.store.read_all()?;
        let outcome = schedule::advance(&snapshot)?;
        self.store.apply(&outcome.mutations)?;

        match outcome.notice {
            Some(Notice::QueueExhausted) => info!("queue exhausted, no singers left"),
            None => info!(writes = outcome.mutations.len(), "queue advanced"),
        }
        Ok(outcome)
    }

    /// Defer the current singer behind the up-next singer.
    pub fn on_skip(&self) -> RotationResult<Outcome> {
        let snapshot = self.store.read_all()?;
        let outcome = schedule::skip(&snapshot, (self.clock)())?;
        self.store.apply(&outcome.mutations)?;

        info!(writes = outcome.mutations.len(), "current singer skipped");
        Ok(outcome)
    }

    /// Sort the table into rotation order and put the first two rows on deck.
    ///
    /// Refuses to run while someone is on stage or called up unless `force`
    /// is set. A forced restart seats the first two rows and sends anyone
    /// else still on stage or called up back to `Waiting`, in the same write.
    pub fn on_start_show(&self, force: bool) -> RotationResult<Outcome> {
        let before = self.store.read_all()?;
        if before.len() < 2 {
            return Err(RotationError::InsufficientSingers(before.len()));
        }
        if QueueView::from_snapshot(&before).in_progress() {
            if !force {
                return Err(RotationError::ShowInProgress);
            }
            warn!("restarting a show that is already in progress");
        }

        self.store.sort_rows(&rotation_order)?;
        let snapshot = self.store.read_all()?;
        let mut outcome = schedule::start(&snapshot)?;
        let cleared = clear_stale_stage(snapshot.get(2..).unwrap_or_default());
        if !cleared.is_empty() {
            debug!(rows = cleared.len(), "returning stale stage rows to waiting");
            outcome.mutations.extend(cleared);
        }
        self.store.apply(&outcome.mutations)?;

        info!(singers = snapshot.len(), "show started");
        Ok(outcome)
    }

    /// Current state of the queue.
    pub fn queue(&self) -> RotationResult<QueueView> {
        let snapshot = self.store.read_all()?;
        Ok(QueueView::from_snapshot(&snapshot))
    }

    /// The waiting entry that would be called up next.
    pub fn peek_next(&self) -> RotationResult<Option<Entry>> {
        let snapshot = self.store.read_all()?;
        let next = schedule::select_next(&snapshot).cloned();
        debug!(next = ?next.as_ref().map(|e| e.id), "peeked next singer");
        Ok(next)
    }
}

/// Status writes sending every `NowSinging` or `UpNext` row back to `Waiting`.
fn clear_stale_stage(rows: &[Entry]) -> Vec<Mutation> {
    rows.iter()
        .filter(|e| matches!(e.status, EntryStatus::NowSinging | EntryStatus::UpNext))
        .map(|e| Mutation::status(e.id, EntryStatus::Waiting))
        .collect()
}
