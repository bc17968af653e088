//! Tree change event types.

use serde::{Deserialize, Serialize};

use crate::document::NodeId;

/// A change observed on the segment tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeChange {
    /// The value of a text segment changed.
    TextChanged { node: NodeId },

    /// A node (and everything below it) was attached to the tree.
    SubtreeInserted { node: NodeId },
}

impl TreeChange {
    pub fn text_changed(node: NodeId) -> Self {
        TreeChange::TextChanged { node }
    }

    pub fn subtree_inserted(node: NodeId) -> Self {
        TreeChange::SubtreeInserted { node }
    }

    pub fn node(&self) -> NodeId {
        match self {
            TreeChange::TextChanged { node } | TreeChange::SubtreeInserted { node } => *node,
        }
    }
}
