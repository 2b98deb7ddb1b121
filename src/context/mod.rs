//! Allocation context data model.
//!
//! These types are built and compared while the process is inside its own
//! memory allocator. None of them allocate, lock or log, and all of them
//! are fixed-size `Copy` values.
//!
//! - [`StackFrame`]: one tagged, non-owning frame identifier
//! - [`Backtrace`]: up to [`MAX_FRAME_COUNT`] frames, bottom first
//! - [`AllocationContext`]: backtrace plus type name, the grouping key

pub mod allocation;
pub mod backtrace;
pub mod frame;
pub mod hash;

pub use allocation::{AllocationContext, AllocationMetrics};
pub use backtrace::{Backtrace, MAX_FRAME_COUNT};
pub use frame::{FrameKind, StackFrame};
pub use hash::{fingerprint, ContextHasher, ContextMap};

static_assertions::const_assert_eq!(MAX_FRAME_COUNT, 48);
static_assertions::assert_impl_all!(StackFrame: Copy, Send, Sync);
static_assertions::assert_impl_all!(Backtrace: Copy, Send, Sync);
static_assertions::assert_impl_all!(AllocationContext: Copy, Send, Sync);
