//! JSON shape of a page document.
//!
//! ```json
//! {"tag": "body", "children": [{"tag": "span", "children": [{"text": "$5"}]}]}
//! ```

use serde::{Deserialize, Serialize};

use super::navigation::TreeNavigation;
use super::{DocumentError, NodeId, SegmentTree};
use crate::errors::Result;

/// One node of a serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentNode {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    pub fn text(value: &str) -> Self {
        DocumentNode::Text {
            text: value.to_string(),
        }
    }

    pub fn element(tag: &str, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Element {
            tag: tag.to_string(),
            children,
        }
    }
}

impl SegmentTree {
    /// Builds a tree from a document whose root is an element.
    pub fn from_document(document: &DocumentNode) -> std::result::Result<Self, DocumentError> {
        let (tag, children) = match document {
            DocumentNode::Element { tag, children } => (tag, children),
            DocumentNode::Text { .. } => {
                return Err(DocumentError::InvalidDocument(
                    "root must be an element".to_string(),
                ))
            }
        };

        let mut tree = SegmentTree::new(tag);
        let mut pending: Vec<(NodeId, &DocumentNode)> =
            children.iter().rev().map(|c| (tree.root(), c)).collect();
        // depth-first so ids follow document order
        while let Some((parent, node)) = pending.pop() {
            match node {
                DocumentNode::Text { text } => {
                    tree.add_text(parent, text)?;
                }
                DocumentNode::Element { tag, children } => {
                    let id = tree.add_element(parent, tag)?;
                    pending.extend(children.iter().rev().map(|c| (id, c)));
                }
            }
        }
        Ok(tree)
    }

    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: DocumentNode = serde_json::from_str(json)?;
        Ok(Self::from_document(&document)?)
    }

    /// Serializes the subtree at `node`.
    pub fn to_document_at(&self, node: NodeId) -> Option<DocumentNode> {
        if let Some(text) = self.text(node) {
            return Some(DocumentNode::text(text));
        }
        let tag = self.tag(node)?;
        let children = self
            .children(node)
            .iter()
            .filter_map(|child| self.to_document_at(*child))
            .collect();
        Some(DocumentNode::element(tag, children))
    }

    /// Serializes the whole tree.
    pub fn to_document(&self) -> DocumentNode {
        self.to_document_at(self.root())
            .unwrap_or_else(|| DocumentNode::element("body", Vec::new()))
    }
}
