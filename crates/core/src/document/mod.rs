//! Segment tree - the page's text nodes and their element structure.

mod document_errors;
mod document_node;
mod navigation;
mod segment_tree;

pub use document_errors::DocumentError;
pub use document_node::DocumentNode;
pub use navigation::{TextMutation, TreeNavigation};
pub use segment_tree::{NodeId, SegmentTree};
