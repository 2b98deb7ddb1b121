//! Per-allocation grouping key and the totals kept per key.

use super::backtrace::Backtrace;
use std::ffi::{c_char, CStr};
use std::hash::{Hash, Hasher};
use std::ops::AddAssign;
use std::ptr;

/// Context metadata kept for every allocation while heap profiling is enabled.
///
/// **Public** - the key of the grouping table
///
/// `type_name` is compared by address, not by contents. When the same type
/// name literal is duplicated across dynamic libraries, the copies group
/// separately. `None` means "unknown type".
#[derive(Clone, Copy, Default)]
pub struct AllocationContext {
    backtrace: Backtrace,
    type_name: Option<&'static CStr>,
}

impl AllocationContext {
    /// Create a context from a backtrace snapshot and the call site's type tag
    ///
    /// **Public** - constructor
    pub const fn new(backtrace: Backtrace, type_name: Option<&'static CStr>) -> Self {
        Self {
            backtrace,
            type_name,
        }
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn type_name(&self) -> Option<&'static CStr> {
        self.type_name
    }

    /// Address identity of the type name; null for an unknown type.
    pub fn type_name_ptr(&self) -> *const c_char {
        self.type_name.map_or(ptr::null(), CStr::as_ptr)
    }
}

impl PartialEq for AllocationContext {
    fn eq(&self, other: &Self) -> bool {
        self.type_name_ptr() == other.type_name_ptr() && self.backtrace == other.backtrace
    }
}

impl Eq for AllocationContext {}

impl Hash for AllocationContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.backtrace.hash(state);
        state.write_usize(self.type_name_ptr() as usize);
    }
}

impl std::fmt::Debug for AllocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocationContext")
            .field("backtrace", &self.backtrace)
            .field("type_name", &self.type_name)
            .field("type_name_ptr", &self.type_name_ptr())
            .finish()
    }
}

/// Size and count of the allocations grouped under one context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationMetrics {
    pub size: usize,
    pub count: usize,
}

impl AllocationMetrics {
    pub fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }

    /// Account for one allocation of `size` bytes.
    pub fn record(&mut self, size: usize) {
        self.size = self.size.saturating_add(size);
        self.count = self.count.saturating_add(1);
    }
}

impl AddAssign for AllocationMetrics {
    fn add_assign(&mut self, other: Self) {
        self.size = self.size.saturating_add(other.size);
        self.count = self.count.saturating_add(other.count);
    }
}
