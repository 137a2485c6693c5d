//! redb table definitions for the queue store.

use redb::TableDefinition;

/// Entry rows keyed by their stable `EntryId`.
pub const ENTRIES: TableDefinition<u64, &[u8]> = TableDefinition::new("entries");

/// Bookkeeping values (row order, id counter) keyed by name.
pub const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

/// `META` key holding the physical row order as a JSON `Vec<u64>`.
pub const ROW_ORDER_KEY: &str = "row_order";

/// `META` key holding the next id to hand out as a JSON `u64`.
pub const NEXT_ID_KEY: &str = "next_id";
