//! Configuration and constants for heap dumps and the CLI.

/// Current heap dump schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of hot paths written to a heap dump by default
pub const DEFAULT_TOP_PATHS: usize = 20;

/// Stacks below this many bytes are folded into "other" when collapsing
pub const DEFAULT_MIN_STACK_SIZE: u64 = 0;

// Collapsed stack rendering
pub const STACK_SEPARATOR: &str = ";";
pub const UNKNOWN_TYPE_LABEL: &str = "[unknown]";
pub const OTHER_STACK_LABEL: &str = "other";
