//! Heap Trace Context
//!
//! Allocation contexts for heap profiling: a bounded backtrace plus a type
//! label, with allocation-free equality and hashing so they can be built and
//! compared inside the memory allocator and used as grouping keys.
//!
//! ## Getting Started
//!
//! ```
//! use heap_trace_context::aggregator::HeapAggregator;
//! use heap_trace_context::tracker::PseudoStack;
//!
//! let mut stack = PseudoStack::new();
//! stack.set_thread_name(c"main");
//! stack.push_event(c"LoadConfig");
//!
//! let mut table = HeapAggregator::new();
//! table.record(stack.context_snapshot(Some(c"Config")), 256);
//! assert_eq!(table.totals().size, 256);
//! ```

pub mod aggregator;
pub mod context;
pub mod output;
pub mod tracker;
pub mod utils;

pub use context::{
    AllocationContext, AllocationMetrics, Backtrace, FrameKind, StackFrame, MAX_FRAME_COUNT,
};
