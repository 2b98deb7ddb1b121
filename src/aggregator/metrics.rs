//! Heap metrics over collapsed stacks.
//!
//! Sizes can come from heap dump files, so every sum here saturates at
//! `u64::MAX` instead of overflowing.

use super::stack_builder::CollapsedStack;
use crate::output::schema::HotPath;
use log::debug;

/// Share of the heap, in percent, above which the largest decile of stacks
/// counts as dominating it.
const CONCENTRATION_THRESHOLD: f64 = 80.0;

fn saturating_total(sizes: impl IntoIterator<Item = u64>) -> u64 {
    sizes.into_iter().fold(0u64, u64::saturating_add)
}

fn percent_of(part: u64, whole: u64) -> f64 {
    match whole {
        0 => 0.0,
        whole => part as f64 / whole as f64 * 100.0,
    }
}

/// The `top_n` largest stacks as hot paths.
///
/// `stacks` must already be sorted largest first, as
/// [`build_collapsed_stacks`](super::build_collapsed_stacks) returns them.
pub fn calculate_hot_paths(stacks: &[CollapsedStack], total_size: u64, top_n: usize) -> Vec<HotPath> {
    debug!("Selecting {} hot paths out of {} stacks", top_n, stacks.len());
    stacks
        .iter()
        .take(top_n)
        .map(|stack| create_hot_path(stack, total_size))
        .collect()
}

pub fn create_hot_path(stack: &CollapsedStack, total_size: u64) -> HotPath {
    HotPath {
        stack: stack.stack.clone(),
        size: stack.size,
        count: stack.count,
        percentage: percent_of(stack.size, total_size),
    }
}

/// How bytes are spread across collapsed stacks
///
/// **Public** - printed by the `validate` command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeDistribution {
    pub total_size: u64,
    pub stack_count: usize,
    pub mean_size_per_stack: u64,
    pub median_size_per_stack: u64,

    /// Bytes held by the largest tenth of the stacks (rounded up)
    pub top_10_percent_size: u64,
    pub top_10_percent_percentage: f64,
}

impl SizeDistribution {
    /// Summarize `stacks` in any order.
    pub fn from_stacks(stacks: &[CollapsedStack]) -> Self {
        let mut sizes: Vec<u64> = stacks.iter().map(|s| s.size).collect();
        if sizes.is_empty() {
            return Self::default();
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));

        let total_size = saturating_total(sizes.iter().copied());
        let decile = sizes.len().div_ceil(10);
        let top_10_percent_size = saturating_total(sizes[..decile].iter().copied());

        Self {
            total_size,
            stack_count: sizes.len(),
            mean_size_per_stack: total_size / sizes.len() as u64,
            // Descending order, so this is the upper median for even counts.
            median_size_per_stack: sizes[(sizes.len() - 1) / 2],
            top_10_percent_size,
            top_10_percent_percentage: percent_of(top_10_percent_size, total_size),
        }
    }

    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > CONCENTRATION_THRESHOLD
    }

    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        format!(
            "Total: {} bytes | Stacks: {} | Mean: {} | Median: {} | Top 10%: {:.1}%",
            self.total_size,
            self.stack_count,
            self.mean_size_per_stack,
            self.median_size_per_stack,
            self.top_10_percent_percentage
        )
    }
}

/// Shorthand for [`SizeDistribution::from_stacks`].
pub fn calculate_size_distribution(stacks: &[CollapsedStack]) -> SizeDistribution {
    SizeDistribution::from_stacks(stacks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_hot_paths() {
        let stacks = vec![
            CollapsedStack::new("main;execute".to_string(), 5000, 5),
            CollapsedStack::new("main;storage".to_string(), 3000, 3),
            CollapsedStack::new("main;compute".to_string(), 2000, 2),
        ];

        let hot_paths = calculate_hot_paths(&stacks, 10000, 2);

        assert_eq!(hot_paths.len(), 2);
        assert_eq!(hot_paths[0].stack, "main;execute");
        assert_eq!(hot_paths[0].size, 5000);
        assert_eq!(hot_paths[0].percentage, 50.0);
    }

    #[test]
    fn test_calculate_size_distribution() {
        let stacks = vec![
            CollapsedStack::new("stack1".to_string(), 8500, 1),
            CollapsedStack::new("stack2".to_string(), 1000, 1),
            CollapsedStack::new("stack3".to_string(), 250, 1),
            CollapsedStack::new("stack4".to_string(), 250, 1),
        ];

        let dist = calculate_size_distribution(&stacks);

        assert_eq!(dist.total_size, 10000);
        assert_eq!(dist.stack_count, 4);
        assert_eq!(dist.mean_size_per_stack, 2500);
        assert_eq!(dist.median_size_per_stack, 1000);
        assert!(dist.is_highly_concentrated()); // Top stack has 85%
    }

    #[test]
    fn test_size_distribution_empty() {
        let dist = calculate_size_distribution(&[]);
        assert_eq!(dist.total_size, 0);
        assert_eq!(dist.stack_count, 0);
        assert!(!dist.is_highly_concentrated());
    }

    #[test]
    fn test_size_distribution_saturates() {
        let stacks = vec![
            CollapsedStack::new("main;[Huge]".to_string(), u64::MAX, 1),
            CollapsedStack::new("main;[Other]".to_string(), u64::MAX, 1),
        ];

        let dist = calculate_size_distribution(&stacks);

        assert_eq!(dist.total_size, u64::MAX);
        assert_eq!(dist.mean_size_per_stack, u64::MAX / 2);
        assert_eq!(dist.top_10_percent_size, u64::MAX);
        assert_eq!(dist.top_10_percent_percentage, 100.0);
    }

    #[test]
    fn test_size_distribution_ignores_input_order() {
        let stacks = vec![
            CollapsedStack::new("a".to_string(), 10, 1),
            CollapsedStack::new("b".to_string(), 90, 1),
        ];
        let dist = calculate_size_distribution(&stacks);
        assert_eq!(dist.top_10_percent_size, 90);
        assert_eq!(dist.median_size_per_stack, 90);
    }

    #[test]
    fn test_hot_path_zero_total() {
        let stack = CollapsedStack::new("test;path".to_string(), 2500, 1);
        let hot_path = create_hot_path(&stack, 0);
        assert_eq!(hot_path.percentage, 0.0);
    }
}
