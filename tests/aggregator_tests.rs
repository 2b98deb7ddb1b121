use heap_trace_context::aggregator::{
    build_collapsed_stacks, calculate_hot_paths, calculate_size_distribution, merge_small_stacks,
    HeapAggregator,
};
use heap_trace_context::tracker::PseudoStack;
use heap_trace_context::{AllocationMetrics, MAX_FRAME_COUNT};
use pretty_assertions::assert_eq;
use std::ffi::CStr;

static BROWSER: &CStr = c"Browser";
static LAYOUT: &CStr = c"Layout";
static PAINT: &CStr = c"Paint";
static NODE: &CStr = c"Node";

fn browser_stack() -> PseudoStack {
    let mut stack = PseudoStack::new();
    stack.set_thread_name(c"CrBrowserMain");
    stack.push_event(BROWSER);
    stack
}

#[test]
fn test_tracker_to_collapsed_stacks() {
    let mut stack = browser_stack();
    let mut table = HeapAggregator::new();

    stack.push_event(LAYOUT);
    table.record(stack.context_snapshot(Some(NODE)), 4000);
    table.record(stack.context_snapshot(Some(NODE)), 1000);
    stack.pop_event(LAYOUT);

    stack.push_event(PAINT);
    table.record(stack.context_snapshot(None), 3000);
    stack.pop_event(PAINT);

    table.record(stack.context_snapshot(None), 2000);

    assert_eq!(table.len(), 3);
    assert_eq!(table.totals(), AllocationMetrics::new(10000, 4));

    let lines: Vec<String> = build_collapsed_stacks(&table)
        .iter()
        .map(|s| s.to_line())
        .collect();
    assert_eq!(
        lines,
        vec![
            "CrBrowserMain;Browser;Layout;[Node] 5000".to_string(),
            "CrBrowserMain;Browser;Paint;[unknown] 3000".to_string(),
            "CrBrowserMain;Browser;[unknown] 2000".to_string(),
        ]
    );
}

#[test]
fn test_hot_paths_from_table() {
    let mut stack = browser_stack();
    let mut table = HeapAggregator::new();
    stack.push_event(LAYOUT);
    table.record(stack.context_snapshot(Some(NODE)), 7500);
    stack.pop_event(LAYOUT);
    table.record(stack.context_snapshot(None), 2500);

    let stacks = build_collapsed_stacks(&table);
    let hot_paths = calculate_hot_paths(&stacks, table.totals().size as u64, 1);

    assert_eq!(hot_paths.len(), 1);
    assert_eq!(hot_paths[0].stack, "CrBrowserMain;Browser;Layout;[Node]");
    assert_eq!(hot_paths[0].percentage, 75.0);

    let dist = calculate_size_distribution(&stacks);
    assert_eq!(dist.total_size, 10000);
    assert_eq!(dist.stack_count, 2);
}

#[test]
fn test_deep_pseudo_stack_groups_by_bottom_frames() {
    let mut table = HeapAggregator::new();

    // Two stacks that only differ above the backtrace capacity.
    for leaf in [LAYOUT, PAINT] {
        let mut stack = PseudoStack::new();
        for _ in 0..MAX_FRAME_COUNT {
            stack.push_event(BROWSER);
        }
        stack.push_event(leaf);
        table.record(stack.context_snapshot(None), 10);
    }

    assert_eq!(table.len(), 1);
    let (backtrace, metrics) = table.by_backtrace()[0];
    assert_eq!(backtrace.frame_count(), MAX_FRAME_COUNT);
    assert_eq!(metrics, AllocationMetrics::new(20, 2));
}

#[test]
fn test_merge_small_stacks_from_table() {
    let mut stack = browser_stack();
    let mut table = HeapAggregator::new();
    table.record(stack.context_snapshot(Some(NODE)), 900);
    stack.push_event(PAINT);
    table.record(stack.context_snapshot(None), 40);
    stack.push_event(LAYOUT);
    table.record(stack.context_snapshot(None), 60);

    let merged = merge_small_stacks(build_collapsed_stacks(&table), 100);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[1].stack, "other");
    assert_eq!(merged[1].size, 100);
}
