//! Aggregation of allocation contexts into per-context totals.
//!
//! This module turns recorded allocations into:
//! - A grouping table keyed by [`AllocationContext`](crate::context::AllocationContext)
//! - Collapsed stack format (for flamegraph tools)
//! - Hot path analysis (top memory consumers)
//! - Size distribution statistics

pub mod metrics;
pub mod stack_builder;
pub mod table;

// Re-export main types and functions
pub use metrics::{calculate_hot_paths, calculate_size_distribution, create_hot_path, SizeDistribution};
pub use stack_builder::{
    build_collapsed_stacks, collapsed_stacks_from_dump, frame_label, merge_small_stacks, CollapsedStack,
};
pub use table::HeapAggregator;
