//! Property-based tests for the rotation invariants.

use std::collections::HashMap;

use proptest::prelude::*;

use kj_store::{Entry, EntryId, EntryStatus, Mutation};

use crate::schedule::{advance, enroll, select_next, skip};

const NAMES: [&str; 4] = ["alice", "bob", "carol", "dave"];

/// Enroll a sequence of names (indices into `NAMES`) into a fresh snapshot.
fn enrolled(picks: &[usize]) -> Vec<Entry> {
    let mut snapshot: Vec<Entry> = Vec::new();
    for (i, pick) in picks.iter().enumerate() {
        let new = enroll(&snapshot, NAMES[*pick], 1_000);
        snapshot.push(new.into_entry(EntryId(i as u64 + 1)));
    }
    snapshot
}

/// A snapshot that satisfies the stage invariants: optional singer on
/// stage, optional singer up next, everyone else waiting or done.
fn valid_snapshot() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((0..NAMES.len(), any::<bool>()), 1..12)
        .prop_flat_map(|rows| {
            let len = rows.len();
            (Just(rows), prop::option::of(0..len), prop::option::of(0..len))
        })
        .prop_map(|(rows, singing, up_next)| {
            let picks: Vec<usize> = rows.iter().map(|(pick, _)| *pick).collect();
            let mut snapshot = enrolled(&picks);
            for (entry, (_, done)) in snapshot.iter_mut().zip(&rows) {
                if *done {
                    entry.status = EntryStatus::Done;
                }
            }
            if let Some(i) = singing {
                snapshot[i].status = EntryStatus::NowSinging;
            }
            if let Some(i) = up_next.filter(|i| Some(*i) != singing) {
                snapshot[i].status = EntryStatus::UpNext;
            }
            snapshot
        })
}

fn apply(snapshot: &mut [Entry], mutations: &[Mutation]) {
    for m in mutations {
        if let Some(row) = snapshot.iter_mut().find(|e| e.id == m.row) {
            m.change.apply_to(row);
        }
    }
}

fn count(snapshot: &[Entry], status: EntryStatus) -> usize {
    snapshot.iter().filter(|e| e.status == status).count()
}

proptest! {
    /// Property: the Nth sign-up under a name is round N.
    #[test]
    fn prop_round_counts_prior_signups(picks in prop::collection::vec(0..NAMES.len(), 0..20)) {
        let snapshot = enrolled(&picks);
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for entry in &snapshot {
            let n = seen.entry(entry.name.as_str()).or_insert(0);
            *n += 1;
            prop_assert_eq!(entry.round, *n);
        }
        for pair in snapshot.windows(2) {
            prop_assert!(pair[0].arrival_time < pair[1].arrival_time);
        }
    }

    /// Property: selection only ever returns a waiting entry, and the minimum one.
    #[test]
    fn prop_select_next_returns_min_waiting(snapshot in valid_snapshot()) {
        match select_next(&snapshot) {
            Some(next) => {
                prop_assert_eq!(next.status, EntryStatus::Waiting);
                for other in snapshot.iter().filter(|e| e.status == EntryStatus::Waiting) {
                    prop_assert!((next.round, next.arrival_time) <= (other.round, other.arrival_time));
                }
            }
            None => prop_assert_eq!(count(&snapshot, EntryStatus::Waiting), 0),
        }
    }

    /// Property: advance keeps at most one singer on stage and one up next.
    #[test]
    fn prop_advance_preserves_stage_invariants(mut snapshot in valid_snapshot()) {
        match advance(&snapshot) {
            Ok(outcome) => {
                apply(&mut snapshot, &outcome.mutations);
                prop_assert!(count(&snapshot, EntryStatus::NowSinging) <= 1);
                prop_assert!(count(&snapshot, EntryStatus::UpNext) <= 1);
            }
            Err(_) => {
                prop_assert_eq!(count(&snapshot, EntryStatus::NowSinging), 0);
            }
        }
    }

    /// Property: two skips in a row restore every status.
    #[test]
    fn prop_skip_twice_is_identity_on_status(mut snapshot in valid_snapshot()) {
        let before: Vec<EntryStatus> = snapshot.iter().map(|e| e.status).collect();
        if let Ok(first) = skip(&snapshot, 1_000) {
            apply(&mut snapshot, &first.mutations);
            let second = skip(&snapshot, 2_000);
            prop_assert!(second.is_ok());
            if let Ok(second) = second {
                apply(&mut snapshot, &second.mutations);
            }
            let after: Vec<EntryStatus> = snapshot.iter().map(|e| e.status).collect();
            prop_assert_eq!(before, after);
        }
    }
}
