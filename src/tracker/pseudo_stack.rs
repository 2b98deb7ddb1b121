//! Pseudo stack of trace event scopes for one thread.
//!
//! Instrumentation pushes a frame when a trace event scope opens and pops it
//! when the scope closes. Allocation hooks then take a [`Backtrace`] snapshot.
//! Everything lives in a fixed array so it can run inside an allocator hook.
//! The owner is responsible for keeping one stack per thread.

use crate::context::{AllocationContext, Backtrace, StackFrame, MAX_FRAME_COUNT};
use std::ffi::CStr;

/// Scopes deeper than this are counted but not stored.
pub const MAX_PSEUDO_STACK_DEPTH: usize = 128;

/// Fixed-capacity stack of trace event frames
///
/// **Public** - the capture side of the allocation context
#[derive(Clone)]
pub struct PseudoStack {
    thread_name: Option<&'static CStr>,
    frames: [StackFrame; MAX_PSEUDO_STACK_DEPTH],
    depth: usize,
    overflow: usize,
}

impl Default for PseudoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PseudoStack {
    pub const fn new() -> Self {
        Self {
            thread_name: None,
            frames: [StackFrame::EMPTY; MAX_PSEUDO_STACK_DEPTH],
            depth: 0,
            overflow: 0,
        }
    }

    /// Name the thread; it becomes the bottom frame of every snapshot.
    pub fn set_thread_name(&mut self, name: &'static CStr) {
        self.thread_name = Some(name);
    }

    pub fn thread_name(&self) -> Option<&'static CStr> {
        self.thread_name
    }

    /// Enter a trace event scope.
    pub fn push_event(&mut self, name: &'static CStr) {
        if self.depth == MAX_PSEUDO_STACK_DEPTH {
            self.overflow += 1;
            return;
        }
        self.frames[self.depth] = StackFrame::from_trace_event_name(name);
        self.depth += 1;
    }

    /// Leave the innermost trace event scope.
    ///
    /// Scopes must be strictly nested; a mismatched name is a caller bug and
    /// is only checked in debug builds.
    pub fn pop_event(&mut self, name: &'static CStr) {
        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        debug_assert!(self.depth > 0, "pop_event on an empty pseudo stack");
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        debug_assert_eq!(
            self.frames[self.depth],
            StackFrame::from_trace_event_name(name),
            "trace event scopes are not nested"
        );
    }

    /// Number of open scopes, including ones past the storage limit.
    pub fn depth(&self) -> usize {
        self.depth + self.overflow
    }

    /// Snapshot of the current stack.
    ///
    /// The thread name comes first, then scopes outermost first. Stacks
    /// deeper than [`MAX_FRAME_COUNT`] lose their innermost scopes.
    pub fn snapshot(&self) -> Backtrace {
        let thread_frame = self.thread_name.map(StackFrame::from_thread_name);
        let scopes = self.frames[..self.depth].iter().copied();
        let backtrace = Backtrace::from_frames(thread_frame.into_iter().chain(scopes));
        debug_assert!(backtrace.frame_count() <= MAX_FRAME_COUNT);
        backtrace
    }

    /// Context for an allocation made right now.
    pub fn context_snapshot(&self, type_name: Option<&'static CStr>) -> AllocationContext {
        AllocationContext::new(self.snapshot(), type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static EVENTS: [&CStr; 4] = [c"Browser", c"MessageLoop", c"Task", c"Layout"];

    #[test]
    fn test_snapshot_bottom_first() {
        let thread_name = c"CrBrowserMain";
        let mut stack = PseudoStack::new();
        stack.set_thread_name(thread_name);
        for name in EVENTS {
            stack.push_event(name);
        }

        let backtrace = stack.snapshot();
        assert_eq!(backtrace.frame_count(), 5);
        assert_eq!(backtrace.frames()[0], StackFrame::from_thread_name(thread_name));
        assert_eq!(backtrace.frames()[1].name(), Some(c"Browser"));
        assert_eq!(backtrace.frames()[4].name(), Some(c"Layout"));
    }

    #[test]
    fn test_push_pop_restores_snapshot() {
        let mut stack = PseudoStack::new();
        stack.push_event(EVENTS[0]);
        let before = stack.snapshot();

        stack.push_event(EVENTS[1]);
        assert_ne!(stack.snapshot(), before);
        stack.pop_event(EVENTS[1]);
        assert_eq!(stack.snapshot(), before);
    }

    #[test]
    fn test_deep_stack_truncated_to_backtrace_capacity() {
        let mut stack = PseudoStack::new();
        for i in 0..100 {
            stack.push_event(EVENTS[i % EVENTS.len()]);
        }

        let backtrace = stack.snapshot();
        assert_eq!(backtrace.frame_count(), MAX_FRAME_COUNT);
        assert_eq!(backtrace.frames()[0].name(), Some(EVENTS[0]));
        assert_eq!(
            backtrace.frames()[MAX_FRAME_COUNT - 1].name(),
            Some(EVENTS[(MAX_FRAME_COUNT - 1) % EVENTS.len()])
        );
    }

    #[test]
    fn test_overflow_is_counted() {
        let mut stack = PseudoStack::new();
        for _ in 0..MAX_PSEUDO_STACK_DEPTH + 3 {
            stack.push_event(EVENTS[0]);
        }
        assert_eq!(stack.depth(), MAX_PSEUDO_STACK_DEPTH + 3);

        for _ in 0..3 {
            stack.pop_event(EVENTS[0]);
        }
        assert_eq!(stack.depth(), MAX_PSEUDO_STACK_DEPTH);
    }

    #[test]
    fn test_context_snapshot() {
        let mut stack = PseudoStack::new();
        stack.push_event(EVENTS[2]);
        let context = stack.context_snapshot(Some(c"Node"));
        assert_eq!(context.backtrace().frame_count(), 1);
        assert_eq!(context.type_name(), Some(c"Node"));
    }
}
