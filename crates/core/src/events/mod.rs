//! Tree change events.
//!
//! The page layer reports text edits and node insertions through a sink; the
//! dispatcher drains them from a bounded queue and re-scans what changed.

mod sink;
mod tree_change;

pub use sink::*;
pub use tree_change::*;
