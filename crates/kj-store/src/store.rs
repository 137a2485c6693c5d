//! The `EntryStore` table contract and `QueueStore`, its redb implementation.
//!
//! The scheduler never touches storage directly: it receives a snapshot
//! from [`EntryStore::read_all`] and hands back a list of [`Mutation`]s for
//! [`EntryStore::apply`]. `QueueStore` supports both on-disk and in-memory
//! backends (the latter for testing).

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// The ordered queue table the scheduler reads from and writes to.
pub trait EntryStore {
    /// Every row, in physical order.
    fn read_all(&self) -> StoreResult<Vec<Entry>>;

    /// Overwrite a single mutable field of one row.
    fn write_field(&self, row: EntryId, change: &FieldChange) -> StoreResult<()>;

    /// Append a row at the end of the table and return it with its id.
    fn append_row(&self, new: NewEntry) -> StoreResult<Entry>;

    /// Reorder the physical rows. The sort is stable.
    fn sort_rows(&self, compare: &dyn Fn(&Entry, &Entry) -> Ordering) -> StoreResult<()>;

    /// Apply a mutation list in order.
    fn apply(&self, mutations: &[Mutation]) -> StoreResult<()> {
        for mutation in mutations {
            self.write_field(mutation.row, &mutation.change)?;
        }
        Ok(())
    }
}

/// Thread-safe queue store backed by redb.
#[derive(Clone)]
pub struct QueueStore {
    db: Arc<Database>,
}

impl QueueStore {
    /// Open (or create) a persistent queue store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "queue store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory queue store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory queue store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(ENTRIES).map_err(map_err!(Table))?;
        txn.open_table(META).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Get a single row by id.
    pub fn get_entry(&self, row: EntryId) -> StoreResult<Option<Entry>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(ENTRIES).map_err(map_err!(Table))?;
        match table.get(row.0).map_err(map_err!(Read))? {
            Some(guard) => {
                let entry: Entry =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Decode))?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Number of rows in the table.
    pub fn len(&self) -> StoreResult<usize> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let meta = txn.open_table(META).map_err(map_err!(Table))?;
        let order: Vec<u64> = load_meta(&meta, ROW_ORDER_KEY)?.unwrap_or_default();
        Ok(order.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Write every change inside one transaction; nothing lands if any row is missing.
    fn write_changes<'a>(
        &self,
        changes: impl IntoIterator<Item = (EntryId, &'a FieldChange)>,
    ) -> StoreResult<usize> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let mut written = 0;
        {
            let mut table = txn.open_table(ENTRIES).map_err(map_err!(Table))?;
            for (row, change) in changes {
                let mut entry: Entry = match table.get(row.0).map_err(map_err!(Read))? {
                    Some(guard) => {
                        serde_json::from_slice(guard.value()).map_err(map_err!(Decode))?
                    }
                    None => return Err(StoreError::RowNotFound(row)),
                };
                change.apply_to(&mut entry);
                let value = serde_json::to_vec(&entry).map_err(map_err!(Encode))?;
                table
                    .insert(row.0, value.as_slice())
                    .map_err(map_err!(Write))?;
                debug!(%row, field = %change.field(), "field written");
                written += 1;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(written)
    }
}

impl EntryStore for QueueStore {
    fn read_all(&self) -> StoreResult<Vec<Entry>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let meta = txn.open_table(META).map_err(map_err!(Table))?;
        let table = txn.open_table(ENTRIES).map_err(map_err!(Table))?;
        let order: Vec<u64> = load_meta(&meta, ROW_ORDER_KEY)?.unwrap_or_default();
        let mut results = Vec::with_capacity(order.len());
        for id in order {
            let guard = table
                .get(id)
                .map_err(map_err!(Read))?
                .ok_or_else(|| StoreError::DanglingRow(EntryId(id)))?;
            let entry: Entry =
                serde_json::from_slice(guard.value()).map_err(map_err!(Decode))?;
            results.push(entry);
        }
        Ok(results)
    }

    fn write_field(&self, row: EntryId, change: &FieldChange) -> StoreResult<()> {
        self.write_changes([(row, change)])?;
        Ok(())
    }

    fn append_row(&self, new: NewEntry) -> StoreResult<Entry> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let entry;
        {
            let mut meta = txn.open_table(META).map_err(map_err!(Table))?;
            let mut table = txn.open_table(ENTRIES).map_err(map_err!(Table))?;

            let next_id: u64 = load_meta(&meta, NEXT_ID_KEY)?.unwrap_or(1);
            let mut order: Vec<u64> = load_meta(&meta, ROW_ORDER_KEY)?.unwrap_or_default();

            entry = new.into_entry(EntryId(next_id));
            let value = serde_json::to_vec(&entry).map_err(map_err!(Encode))?;
            table
                .insert(next_id, value.as_slice())
                .map_err(map_err!(Write))?;

            order.push(next_id);
            store_meta(&mut meta, ROW_ORDER_KEY, &order)?;
            store_meta(&mut meta, NEXT_ID_KEY, &(next_id + 1))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(row = %entry.id, name = %entry.name, round = entry.round, "row appended");
        Ok(entry)
    }

    fn sort_rows(&self, compare: &dyn Fn(&Entry, &Entry) -> Ordering) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut meta = txn.open_table(META).map_err(map_err!(Table))?;
            let table = txn.open_table(ENTRIES).map_err(map_err!(Table))?;

            let order: Vec<u64> = load_meta(&meta, ROW_ORDER_KEY)?.unwrap_or_default();
            let mut rows = Vec::with_capacity(order.len());
            for id in order {
                let guard = table
                    .get(id)
                    .map_err(map_err!(Read))?
                    .ok_or_else(|| StoreError::DanglingRow(EntryId(id)))?;
                let entry: Entry =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Decode))?;
                rows.push(entry);
            }

            rows.sort_by(|a, b| compare(a, b));
            let sorted: Vec<u64> = rows.iter().map(|e| e.id.0).collect();
            store_meta(&mut meta, ROW_ORDER_KEY, &sorted)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!("rows sorted");
        Ok(())
    }

    fn apply(&self, mutations: &[Mutation]) -> StoreResult<()> {
        let written = self.write_changes(mutations.iter().map(|m| (m.row, &m.change)))?;
        debug!(written, "mutation list applied");
        Ok(())
    }
}

/// Read a JSON value out of the `meta` table.
fn load_meta<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> StoreResult<Option<T>> {
    match table.get(key).map_err(map_err!(Read))? {
        Some(guard) => {
            let value: T =
                serde_json::from_slice(guard.value()).map_err(map_err!(Decode))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Write a JSON value into the `meta` table.
fn store_meta<T: serde::Serialize>(
    table: &mut redb::Table<'_, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let bytes = serde_json::to_vec(value).map_err(map_err!(Encode))?;
    table
        .insert(key, bytes.as_slice())
        .map_err(map_err!(Write))?;
    Ok(())
}
