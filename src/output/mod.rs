//! Heap dump output.
//!
//! This module handles writing grouped allocation data to disk:
//! - JSON heap dumps (pretty printed)
//! - Schema types shared with readers of those files

pub mod json;
pub mod schema;

// Re-export main functions
pub use json::{heap_dump_to_string, read_heap_dump, write_heap_dump};
pub use schema::{to_heap_dump, HeapDump, HeapDumpEntry, HotPath};
