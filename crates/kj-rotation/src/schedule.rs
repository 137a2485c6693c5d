//! Pure rotation rules.
//!
//! Nothing here reads or writes storage. Each operation takes a snapshot of
//! the whole queue table, in physical row order, and returns the field
//! writes the caller must apply, in order.

use std::fmt;

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use tracing::debug;

use kj_store::{Entry, EntryStatus, Mutation, NewEntry, Timestamp, rotation_order};

use crate::error::{RotationError, RotationResult};

/// Separator between annotations in the notes cell.
const NOTE_SEPARATOR: &str = "; ";

/// Non-fatal condition reported alongside a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Nobody is left to call up after the current singer.
    QueueExhausted,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::QueueExhausted => f.write_str("end of the queue reached"),
        }
    }
}

/// Result of a stage transition: the writes to apply, plus an optional notice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub mutations: Vec<Mutation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl Outcome {
    fn new(mutations: Vec<Mutation>) -> Self {
        Self {
            mutations,
            notice: None,
        }
    }
}

// ── Enrollment ──────────────────────────────────────────────────────

/// Compute the row for a new sign-up.
///
/// The round is one more than the number of rows already carrying `name`.
/// The arrival time is `now`, bumped past the latest arrival in the
/// snapshot so that arrival times stay strictly increasing.
pub fn enroll(snapshot: &[Entry], name: &str, now: Timestamp) -> NewEntry {
    let prior = snapshot.iter().filter(|e| e.name == name).count() as u32;
    let latest = snapshot.iter().map(|e| e.arrival_time).max();
    let arrival_time = match latest {
        Some(latest) if latest >= now => latest + 1,
        _ => now,
    };

    debug!(%name, round = prior + 1, arrival_time, "enrolled");
    NewEntry {
        name: name.to_string(),
        round: prior + 1,
        arrival_time,
        status: EntryStatus::Waiting,
    }
}

// ── Selection ───────────────────────────────────────────────────────

/// The waiting entry with the lowest `(round, arrival_time)`.
pub fn select_next(snapshot: &[Entry]) -> Option<&Entry> {
    snapshot
        .iter()
        .filter(|e| e.status == EntryStatus::Waiting)
        .min_by(|a, b| rotation_order(a, b))
}

/// The single entry in `status`, or `None` if there are zero or several.
fn sole(snapshot: &[Entry], status: EntryStatus) -> Option<&Entry> {
    let mut matching = snapshot.iter().filter(|e| e.status == status);
    let first = matching.next()?;
    match matching.next() {
        Some(_) => None,
        None => Some(first),
    }
}

// ── Transitions ─────────────────────────────────────────────────────

/// Mark the current singer done and move everyone up one slot.
///
/// The up-next singer (if any) takes the stage and the next waiting entry
/// is called up. When neither exists the current singer is still marked
/// done and the outcome carries [`Notice::QueueExhausted`].
pub fn advance(snapshot: &[Entry]) -> RotationResult<Outcome> {
    let current = sole(snapshot, EntryStatus::NowSinging).ok_or(RotationError::NoActivePerformer)?;

    let mut mutations = vec![Mutation::status(current.id, EntryStatus::Done)];

    let up_next = snapshot.iter().find(|e| e.status == EntryStatus::UpNext);
    if let Some(up_next) = up_next {
        mutations.push(Mutation::status(up_next.id, EntryStatus::NowSinging));
    }

    let candidate = select_next(snapshot);
    if let Some(candidate) = candidate {
        mutations.push(Mutation::status(candidate.id, EntryStatus::UpNext));
    }

    let mut outcome = Outcome::new(mutations);
    if up_next.is_none() && candidate.is_none() {
        outcome.notice = Some(Notice::QueueExhausted);
    }

    debug!(
        done = %current.id,
        promoted = ?up_next.map(|e| e.id),
        called_up = ?candidate.map(|e| e.id),
        "advance computed"
    );
    Ok(outcome)
}

/// Swap the current singer with the up-next singer.
///
/// The deferred singer goes back to up next, not to the waiting list, and
/// gets a timestamped note. Rounds and arrival times are untouched.
pub fn skip(snapshot: &[Entry], at: Timestamp) -> RotationResult<Outcome> {
    let current = sole(snapshot, EntryStatus::NowSinging).ok_or(RotationError::InsufficientQueue)?;
    let up_next = sole(snapshot, EntryStatus::UpNext).ok_or(RotationError::InsufficientQueue)?;

    debug!(deferred = %current.id, promoted = %up_next.id, "skip computed");
    Ok(Outcome::new(vec![
        Mutation::status(current.id, EntryStatus::UpNext),
        Mutation::status(up_next.id, EntryStatus::NowSinging),
        Mutation::notes(current.id, skip_note(&current.notes, at)),
    ]))
}

/// Put the first row on stage and the second up next.
///
/// Expects the snapshot to already be in rotation order (the caller sorts
/// the table first). Not idempotent: whoever occupies the first two rows
/// is forced into those slots, whatever their current status.
pub fn start(snapshot: &[Entry]) -> RotationResult<Outcome> {
    let [first, second, ..] = snapshot else {
        return Err(RotationError::InsufficientSingers(snapshot.len()));
    };

    debug!(now_singing = %first.id, up_next = %second.id, "start computed");
    Ok(Outcome::new(vec![
        Mutation::status(first.id, EntryStatus::NowSinging),
        Mutation::status(second.id, EntryStatus::UpNext),
    ]))
}

/// Append a skip annotation to existing notes.
pub fn skip_note(existing: &str, at: Timestamp) -> String {
    let stamp = DateTime::from_timestamp_millis(at as i64)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| at.to_string());
    let note = format!("skipped at {stamp}");
    if existing.is_empty() {
        note
    } else {
        format!("{existing}{NOTE_SEPARATOR}{note}")
    }
}
