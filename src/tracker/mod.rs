//! Capturing allocation contexts from a pseudo stack of trace events.

pub mod pseudo_stack;

pub use pseudo_stack::{PseudoStack, MAX_PSEUDO_STACK_DEPTH};
