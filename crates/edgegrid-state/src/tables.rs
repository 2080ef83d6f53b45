//! redb table definitions for the object store.

use redb::TableDefinition;

/// Every entity type shares one table; keys carry the type prefix, so a
/// type's namespace is a contiguous key range.
pub const OBJECTS: TableDefinition<&str, &[u8]> = TableDefinition::new("objects");
