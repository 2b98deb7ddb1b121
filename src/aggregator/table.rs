//! The grouping table: allocation metrics per unique allocation context.
//!
//! Unlike the context types, the table owns a hash map and may allocate.
//! It is filled from recorded contexts outside of the allocator hook.

use crate::context::{AllocationContext, AllocationMetrics, Backtrace, ContextHasher, ContextMap};
use log::debug;
use std::collections::HashMap;
use std::ffi::CStr;

/// Accumulates [`AllocationMetrics`] per [`AllocationContext`]
///
/// **Public** - main entry point for grouping
#[derive(Debug, Default, Clone)]
pub struct HeapAggregator {
    entries: ContextMap<AllocationMetrics>,
}

impl HeapAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one allocation of `size` bytes made under `context`.
    pub fn record(&mut self, context: AllocationContext, size: usize) {
        self.entries.entry(context).or_default().record(size);
    }

    /// Add pre-aggregated totals for `context`.
    pub fn record_metrics(&mut self, context: AllocationContext, metrics: AllocationMetrics) {
        *self.entries.entry(context).or_default() += metrics;
    }

    /// Fold another table into this one.
    pub fn merge(&mut self, other: &HeapAggregator) {
        debug!("Merging {} contexts into {} contexts", other.len(), self.len());
        for (context, metrics) in other.iter() {
            self.record_metrics(*context, *metrics);
        }
    }

    pub fn get(&self, context: &AllocationContext) -> Option<&AllocationMetrics> {
        self.entries.get(context)
    }

    /// Number of unique contexts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AllocationContext, &AllocationMetrics)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum over all contexts
    pub fn totals(&self) -> AllocationMetrics {
        self.entries
            .values()
            .fold(AllocationMetrics::default(), |mut total, metrics| {
                total += *metrics;
                total
            })
    }

    /// Regroup by backtrace only, largest first.
    pub fn by_backtrace(&self) -> Vec<(Backtrace, AllocationMetrics)> {
        let mut grouped: HashMap<Backtrace, AllocationMetrics, ContextHasher> = HashMap::default();
        for (context, metrics) in self.iter() {
            *grouped.entry(*context.backtrace()).or_default() += *metrics;
        }

        debug!("Grouped {} contexts into {} backtraces", self.len(), grouped.len());
        let mut grouped: Vec<_> = grouped.into_iter().collect();
        grouped.sort_by(|a, b| b.1.size.cmp(&a.1.size));
        grouped
    }

    /// Regroup by type name only, largest first.
    ///
    /// Type names are grouped by address, like the contexts themselves.
    pub fn by_type_name(&self) -> Vec<(Option<&'static CStr>, AllocationMetrics)> {
        let mut grouped: HashMap<usize, (Option<&'static CStr>, AllocationMetrics), ContextHasher> =
            HashMap::default();
        for (context, metrics) in self.iter() {
            let entry = grouped
                .entry(context.type_name_ptr() as usize)
                .or_insert((context.type_name(), AllocationMetrics::default()));
            entry.1 += *metrics;
        }

        debug!("Grouped {} contexts into {} type names", self.len(), grouped.len());
        let mut grouped: Vec<_> = grouped.into_values().collect();
        grouped.sort_by(|a, b| b.1.size.cmp(&a.1.size));
        grouped
    }
}
