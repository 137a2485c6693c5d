//! Domain types for the queue store.
//!
//! One [`Entry`] is one row of the queue table. Only `status` and `notes`
//! change after a row is created; [`FieldChange`] can express nothing else.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unix timestamp in milliseconds.
pub type Timestamp = u64;

/// Stable identifier of a row, assigned on append. Unaffected by sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Entry ─────────────────────────────────────────────────────────

/// A singer's place in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// When the singer signed up. Tie-break within a round.
    pub arrival_time: Timestamp,
    pub name: String,
    pub status: EntryStatus,
    /// The Nth sign-up under this name gets round N.
    pub round: u32,
    /// Append-only annotations (skip events).
    #[serde(default)]
    pub notes: String,
}

/// Lifecycle status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Waiting,
    UpNext,
    NowSinging,
    Done,
}

impl EntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Waiting => "Waiting",
            EntryStatus::UpNext => "Up Next",
            EntryStatus::NowSinging => "Now Singing",
            EntryStatus::Done => "Done",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields written into a freshly appended row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub round: u32,
    pub arrival_time: Timestamp,
    pub status: EntryStatus,
}

impl NewEntry {
    /// Materialize the row under the id the store assigned.
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            arrival_time: self.arrival_time,
            name: self.name,
            status: self.status,
            round: self.round,
            notes: String::new(),
        }
    }
}

// ── Mutations ─────────────────────────────────────────────────────

/// A column that can change after a row is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Status,
    Notes,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Status => "status",
            Field::Notes => "notes",
        };
        f.write_str(name)
    }
}

/// New value for one of the mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    Status(EntryStatus),
    /// Full replacement text for the notes cell.
    Notes(String),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            FieldChange::Status(_) => Field::Status,
            FieldChange::Notes(_) => Field::Notes,
        }
    }

    /// Apply this change to an in-memory row.
    pub fn apply_to(&self, entry: &mut Entry) {
        match self {
            FieldChange::Status(status) => entry.status = *status,
            FieldChange::Notes(notes) => entry.notes = notes.clone(),
        }
    }
}

/// A single targeted field write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub row: EntryId,
    #[serde(flatten)]
    pub change: FieldChange,
}

impl Mutation {
    pub fn status(row: EntryId, status: EntryStatus) -> Self {
        Self {
            row,
            change: FieldChange::Status(status),
        }
    }

    pub fn notes(row: EntryId, notes: impl Into<String>) -> Self {
        Self {
            row,
            change: FieldChange::Notes(notes.into()),
        }
    }

    pub fn field(&self) -> Field {
        self.change.field()
    }
}

/// Rotation order: round ascending, then arrival time ascending.
pub fn rotation_order(a: &Entry, b: &Entry) -> Ordering {
    a.round
        .cmp(&b.round)
        .then_with(|| a.arrival_time.cmp(&b.arrival_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, name: &str, round: u32, arrival_time: Timestamp) -> Entry {
        Entry {
            id: EntryId(id),
            arrival_time,
            name: name.to_string(),
            status: EntryStatus::Waiting,
            round,
            notes: String::new(),
        }
    }

    #[test]
    fn rotation_order_round_beats_arrival() {
        let early_r2 = entry(1, "alice", 2, 100);
        let late_r1 = entry(2, "bob", 1, 900);
        assert_eq!(rotation_order(&late_r1, &early_r2), Ordering::Less);
    }

    #[test]
    fn rotation_order_arrival_breaks_ties() {
        let a = entry(1, "alice", 1, 100);
        let b = entry(2, "bob", 1, 200);
        assert_eq!(rotation_order(&a, &b), Ordering::Less);
        assert_eq!(rotation_order(&b, &a), Ordering::Greater);
    }

    #[test]
    fn field_change_applies_only_its_field() {
        let mut e = entry(1, "alice", 1, 100);
        FieldChange::Status(EntryStatus::UpNext).apply_to(&mut e);
        FieldChange::Notes("skipped".to_string()).apply_to(&mut e);
        assert_eq!(e.status, EntryStatus::UpNext);
        assert_eq!(e.notes, "skipped");
        assert_eq!(e.round, 1);
        assert_eq!(e.arrival_time, 100);
    }

    #[test]
    fn mutation_serializes_with_field_tag() {
        let m = Mutation::status(EntryId(7), EntryStatus::NowSinging);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["row"], 7);
        assert_eq!(json["field"], "status");
        assert_eq!(json["value"], "now_singing");
        assert_eq!(m.field(), Field::Status);
        assert_eq!(Mutation::notes(EntryId(7), "x").field().to_string(), "notes");
    }
}
