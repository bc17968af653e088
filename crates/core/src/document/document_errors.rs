use thiserror::Error;

use super::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} already has a parent")]
    AlreadyAttached(NodeId),

    #[error("Node {child} cannot be attached below its own descendant {parent}")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
