//! Stack frames: one level of a captured (pseudo or native) stack.
//!
//! A frame is an address-sized identifier tagged with what the address means.
//! Frames never own what they point at. Names are `'static` C string literals
//! and program counters are code addresses that are never dereferenced.

use std::ffi::{c_void, CStr};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

/// What the raw `value` of a [`StackFrame`] refers to.
///
/// Declaration order is the ordering used by [`StackFrame`]'s `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FrameKind {
    /// Pointer to a trace event name literal.
    TraceEventName,
    /// Pointer to a thread name literal.
    ThreadName,
    /// Code address as returned by a native unwinder.
    ProgramCounter,
}

/// A single (pseudo) stack frame.
///
/// **Public** - produced by the tracker, stored in [`Backtrace`](super::Backtrace)
///
/// Identity is `(kind, value)` by address: two frames built from different
/// string literals with the same contents are different frames.
#[derive(Clone, Copy)]
pub struct StackFrame {
    kind: FrameKind,
    value: *const c_void,
}

// SAFETY: `value` either points into immutable `'static` storage (the name
// constructors only accept `&'static CStr`) or is an opaque code address that
// is never dereferenced.
unsafe impl Send for StackFrame {}
unsafe impl Sync for StackFrame {}

impl StackFrame {
    /// Filler for unused backtrace slots.
    pub(crate) const EMPTY: StackFrame = StackFrame {
        kind: FrameKind::ProgramCounter,
        value: ptr::null(),
    };

    /// Frame for a trace event scope.
    pub const fn from_trace_event_name(name: &'static CStr) -> Self {
        Self {
            kind: FrameKind::TraceEventName,
            value: name.as_ptr().cast(),
        }
    }

    /// Frame naming the thread the stack belongs to.
    pub const fn from_thread_name(name: &'static CStr) -> Self {
        Self {
            kind: FrameKind::ThreadName,
            value: name.as_ptr().cast(),
        }
    }

    /// Frame for a native return address.
    ///
    /// No validation is done; a null `pc` gives a frame with a null value.
    pub const fn from_program_counter(pc: *const c_void) -> Self {
        Self {
            kind: FrameKind::ProgramCounter,
            value: pc,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Raw identifier. Only meaningful together with [`kind`](Self::kind).
    pub fn value(&self) -> *const c_void {
        self.value
    }

    fn addr(&self) -> usize {
        self.value as usize
    }

    /// The name literal this frame was built from, for the two name kinds.
    pub fn name(&self) -> Option<&'static CStr> {
        match self.kind {
            FrameKind::ProgramCounter => None,
            _ if self.value.is_null() => None,
            // SAFETY: name kinds are only built from `&'static CStr`.
            _ => Some(unsafe { CStr::from_ptr(self.value.cast()) }),
        }
    }
}

impl PartialEq for StackFrame {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.addr() == other.addr()
    }
}

impl Eq for StackFrame {}

impl PartialOrd for StackFrame {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StackFrame {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.addr().cmp(&other.addr()))
    }
}

impl Hash for StackFrame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.kind as u8);
        state.write_usize(self.addr());
    }
}

impl fmt::Display for StackFrame {
    /// Names print as text, program counters as hex. No symbolication.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.name()) {
            (FrameKind::ProgramCounter, _) => write!(f, "{:#x}", self.addr()),
            (_, Some(name)) => write!(f, "{}", name.to_string_lossy()),
            (_, None) => f.write_str("(null)"),
        }
    }
}

impl fmt::Debug for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackFrame")
            .field("kind", &self.kind)
            .field("value", &format_args!("{:p} ({})", self.value, self))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FOO_A: [u8; 4] = *b"foo\0";
    static FOO_B: [u8; 4] = *b"foo\0";

    fn cstr(bytes: &'static [u8]) -> &'static CStr {
        CStr::from_bytes_with_nul(bytes).unwrap()
    }

    #[test]
    fn test_same_literal_is_equal() {
        let name = cstr(&FOO_A);
        assert_eq!(
            StackFrame::from_trace_event_name(name),
            StackFrame::from_trace_event_name(name)
        );
    }

    #[test]
    fn test_equal_contents_different_address_not_equal() {
        let a = StackFrame::from_trace_event_name(cstr(&FOO_A));
        let b = StackFrame::from_trace_event_name(cstr(&FOO_B));
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_disambiguates_same_address() {
        let name = cstr(&FOO_A);
        let event = StackFrame::from_trace_event_name(name);
        let thread = StackFrame::from_thread_name(name);
        let pc = StackFrame::from_program_counter(name.as_ptr().cast());

        assert_ne!(event, thread);
        assert_ne!(thread, pc);
        assert!(event < thread);
        assert!(thread < pc);
    }

    #[test]
    fn test_ordering_by_value_within_kind() {
        let low = StackFrame::from_program_counter(0x1000 as *const c_void);
        let high = StackFrame::from_program_counter(0x2000 as *const c_void);
        assert!(low < high);
        assert!(!(high < low));
        let same = low;
        assert!(!(low < same));
    }

    #[test]
    fn test_name_and_display() {
        let frame = StackFrame::from_thread_name(c"CrBrowserMain");
        assert_eq!(frame.name(), Some(c"CrBrowserMain"));
        assert_eq!(frame.to_string(), "CrBrowserMain");

        let pc = StackFrame::from_program_counter(0xdead_beef as *const c_void);
        assert_eq!(pc.name(), None);
        assert_eq!(pc.to_string(), "0xdeadbeef");
    }

    #[test]
    fn test_null_program_counter_is_accepted() {
        let frame = StackFrame::from_program_counter(ptr::null());
        assert!(frame.value().is_null());
        assert_eq!(frame, StackFrame::EMPTY);
    }
}
