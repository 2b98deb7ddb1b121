//! Heap dump JSON schema definitions.
//!
//! This module defines the structure of heap dump files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{build_collapsed_stacks, calculate_hot_paths, frame_label, HeapAggregator};
use crate::utils::config::SCHEMA_VERSION;
use log::debug;
use serde::{Deserialize, Serialize};

/// Top-level heap dump structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapDump {
    /// Schema version for compatibility checking
    pub version: String,

    /// Name of the profiled process
    pub process_name: String,

    /// Bytes allocated across all contexts
    pub total_size: u64,

    /// Allocations across all contexts
    pub total_count: u64,

    /// One entry per unique allocation context, largest first
    pub entries: Vec<HeapDumpEntry>,

    /// Top hot paths (ranked by bytes allocated)
    pub hot_paths: Vec<HotPath>,

    /// Timestamp when the dump was generated
    pub generated_at: String,
}

/// Metrics for one allocation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapDumpEntry {
    /// Frame labels, bottom first
    pub stack: Vec<String>,

    /// Type name, if known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_name: Option<String>,

    pub size: u64,
    pub count: u64,
}

/// A hot path in the heap (collapsed stack with bytes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotPath {
    /// Collapsed stack representation (e.g., "main;parse;[Node]")
    pub stack: String,

    /// Bytes allocated under this path
    pub size: u64,

    /// Allocations under this path
    pub count: u64,

    /// Percentage of total bytes
    pub percentage: f64,
}

/// Snapshot a grouping table into a heap dump
///
/// **Public** - bridges the in-memory table and the file format
///
/// # Arguments
/// * `table` - Grouped allocation metrics
/// * `process_name` - Recorded in the dump header
/// * `top_n` - Number of hot paths to include
pub fn to_heap_dump(table: &HeapAggregator, process_name: impl Into<String>, top_n: usize) -> HeapDump {
    let totals = table.totals();
    let total_size = totals.size as u64;

    let mut entries: Vec<HeapDumpEntry> = table
        .iter()
        .map(|(context, metrics)| HeapDumpEntry {
            stack: context.backtrace().frames().iter().map(frame_label).collect(),
            type_name: context
                .type_name()
                .map(|name| name.to_string_lossy().into_owned()),
            size: metrics.size as u64,
            count: metrics.count as u64,
        })
        .collect();
    entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.stack.cmp(&b.stack)));

    let stacks = build_collapsed_stacks(table);
    let hot_paths = calculate_hot_paths(&stacks, total_size, top_n);

    debug!("Heap dump has {} entries and {} hot paths", entries.len(), hot_paths.len());

    HeapDump {
        version: SCHEMA_VERSION.to_string(),
        process_name: process_name.into(),
        total_size,
        total_count: totals.count as u64,
        entries,
        hot_paths,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}
