//! Build collapsed stack format from the grouping table.
//!
//! Collapsed stacks are the input format of flamegraph tools.
//! Format: "outermost;inner;innermost;[type] bytes"
//!
//! Example: "CrBrowserMain;MessageLoop::Run;Layout;[LayoutObject] 4096"
//! This means: 4096 bytes of LayoutObject were allocated under the Layout
//! trace event, inside MessageLoop::Run on the browser main thread.

use super::table::HeapAggregator;
use crate::context::{AllocationContext, StackFrame};
use crate::output::schema::HeapDump;
use crate::utils::config::{OTHER_STACK_LABEL, STACK_SEPARATOR, UNKNOWN_TYPE_LABEL};
use log::debug;
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by metrics and the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Frames and type as a separator-joined string
    pub stack: String,

    /// Bytes allocated under this stack
    pub size: u64,

    /// Number of allocations under this stack
    pub count: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: String, size: u64, count: u64) -> Self {
        Self { stack, size, count }
    }

    /// Render as one line of collapsed stack output
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.size)
    }
}

/// Replace the separator so one label cannot split into two segments.
fn escape_segment(text: &str) -> String {
    text.replace(STACK_SEPARATOR, ":")
}

/// Text label for one frame inside a collapsed stack.
pub fn frame_label(frame: &StackFrame) -> String {
    escape_segment(&frame.to_string())
}

/// Final `[type]` segment of a collapsed stack.
fn type_label(type_name: Option<&str>) -> String {
    match type_name {
        Some(name) => format!("[{}]", escape_segment(name)),
        None => UNKNOWN_TYPE_LABEL.to_string(),
    }
}

fn collapse_context(context: &AllocationContext) -> String {
    let type_name = context.type_name().map(|name| name.to_string_lossy());
    let mut parts: Vec<String> = context.backtrace().frames().iter().map(frame_label).collect();
    parts.push(type_label(type_name.as_deref()));
    parts.join(STACK_SEPARATOR)
}

/// Build collapsed stacks from the grouping table
///
/// **Public** - main entry point for stack building
///
/// # Arguments
/// * `table` - Grouped allocation metrics
///
/// # Returns
/// Vector of collapsed stacks, one per unique rendered stack, largest first
///
/// # Algorithm
/// 1. Render each context as frame labels, bottom first, then its type
/// 2. Aggregate by rendered string (contexts that differ only by literal
///    address render identically and are summed here)
/// 3. Sort by size descending, then by stack for stable output
pub fn build_collapsed_stacks(table: &HeapAggregator) -> Vec<CollapsedStack> {
    debug!("Building collapsed stacks from {} contexts", table.len());

    // Map to aggregate stacks: stack_string -> (total_size, total_count)
    let mut stack_map: HashMap<String, (u64, u64)> = HashMap::new();

    for (context, metrics) in table.iter() {
        let entry = stack_map.entry(collapse_context(context)).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(metrics.size as u64);
        entry.1 = entry.1.saturating_add(metrics.count as u64);
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, (size, count))| CollapsedStack::new(stack, size, count))
        .collect();

    stacks.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.stack.cmp(&b.stack)));

    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}

/// Rebuild collapsed stacks from the entries of a heap dump file
///
/// **Public** - used by the `collapse` command
pub fn collapsed_stacks_from_dump(dump: &HeapDump) -> Vec<CollapsedStack> {
    let mut stack_map: HashMap<String, (u64, u64)> = HashMap::new();

    for entry in &dump.entries {
        // Labels in a hand-edited dump may still carry the separator.
        let mut parts: Vec<String> = entry.stack.iter().map(|label| escape_segment(label)).collect();
        parts.push(type_label(entry.type_name.as_deref()));

        let aggregate = stack_map.entry(parts.join(STACK_SEPARATOR)).or_insert((0, 0));
        aggregate.0 = aggregate.0.saturating_add(entry.size);
        aggregate.1 = aggregate.1.saturating_add(entry.count);
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, (size, count))| CollapsedStack::new(stack, size, count))
        .collect();
    stacks.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.stack.cmp(&b.stack)));
    stacks
}

/// Fold stacks smaller than `min_size` bytes into a single "other" entry
///
/// **Public** - keeps flamegraphs readable for long-tail dumps
pub fn merge_small_stacks(stacks: Vec<CollapsedStack>, min_size: u64) -> Vec<CollapsedStack> {
    let (mut kept, small): (Vec<_>, Vec<_>) =
        stacks.into_iter().partition(|stack| stack.size >= min_size);

    if !small.is_empty() {
        debug!("Merging {} stacks below {} bytes", small.len(), min_size);
        let (size, count) = small
            .iter()
            .fold((0u64, 0u64), |(size, count), s| {
                (size.saturating_add(s.size), count.saturating_add(s.count))
            });
        kept.push(CollapsedStack::new(OTHER_STACK_LABEL.to_string(), size, count));
        kept.sort_by(|a, b| b.size.cmp(&a.size));
    }

    kept
}
