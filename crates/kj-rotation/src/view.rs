//! Read-only view of the queue for displays and status endpoints.

use serde::Serialize;

use kj_store::{Entry, EntryStatus, rotation_order};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueView {
    pub now_singing: Option<Entry>,
    pub up_next: Option<Entry>,
    /// Waiting entries in the order they will be called up.
    pub waiting: Vec<Entry>,
    pub done: usize,
    pub total: usize,
}

impl QueueView {
    pub fn from_snapshot(snapshot: &[Entry]) -> Self {
        let find = |status: EntryStatus| snapshot.iter().find(|e| e.status == status).cloned();

        let mut waiting: Vec<Entry> = snapshot
            .iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .cloned()
            .collect();
        waiting.sort_by(rotation_order);

        Self {
            now_singing: find(EntryStatus::NowSinging),
            up_next: find(EntryStatus::UpNext),
            waiting,
            done: snapshot.iter().filter(|e| e.status == EntryStatus::Done).count(),
            total: snapshot.len(),
        }
    }

    /// Whether someone is on stage or called up.
    pub fn in_progress(&self) -> bool {
        self.now_singing.is_some() || self.up_next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kj_store::EntryId;

    fn entry(id: u64, round: u32, arrival_time: u64, status: EntryStatus) -> Entry {
        Entry {
            id: EntryId(id),
            arrival_time,
            name: format!("singer-{id}"),
            status,
            round,
            notes: String::new(),
        }
    }

    #[test]
    fn view_orders_waiting_by_rotation() {
        let snapshot = vec![
            entry(1, 2, 100, EntryStatus::Waiting),
            entry(2, 1, 300, EntryStatus::Waiting),
            entry(3, 1, 200, EntryStatus::NowSinging),
            entry(4, 1, 250, EntryStatus::Done),
        ];
        let view = QueueView::from_snapshot(&snapshot);

        assert_eq!(view.now_singing.as_ref().map(|e| e.id), Some(EntryId(3)));
        assert!(view.up_next.is_none());
        let order: Vec<EntryId> = view.waiting.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![EntryId(2), EntryId(1)]);
        assert_eq!(view.done, 1);
        assert_eq!(view.total, 4);
        assert!(view.in_progress());
    }

    #[test]
    fn empty_view_is_idle() {
        let view = QueueView::from_snapshot(&[]);
        assert!(!view.in_progress());
        assert_eq!(view.total, 0);
    }
}
