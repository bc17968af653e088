//! Arena-backed segment tree.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::navigation::{TextMutation, TreeNavigation};
use super::DocumentError;
use crate::events::{TreeChange, TreeChangeSink};

/// Stable identity of a node; an index into the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Element { tag: String },
    Text { value: String },
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Elements and text segments of one page.
///
/// Nodes are never removed, so ids stay valid for the tree's lifetime. When a
/// sink is attached, every insertion and every effective text change is
/// reported to it.
pub struct SegmentTree {
    nodes: Vec<Node>,
    root: NodeId,
    sink: Option<Arc<dyn TreeChangeSink>>,
}

impl SegmentTree {
    /// Creates a tree holding a single root element.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Element {
                    tag: root_tag.to_lowercase(),
                },
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            sink: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Starts reporting changes to `sink`, replacing any previous one.
    pub fn observe(&mut self, sink: Arc<dyn TreeChangeSink>) {
        self.sink = Some(sink);
    }

    /// Stops reporting changes.
    pub fn unobserve(&mut self) {
        self.sink = None;
    }

    pub fn is_observed(&self) -> bool {
        self.sink.is_some()
    }

    fn emit(&self, change: TreeChange) {
        if let Some(sink) = &self.sink {
            sink.emit(change);
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.nodes.get(id.0).ok_or(DocumentError::UnknownNode(id))
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_lowercase(),
        })
    }

    /// Creates a detached text segment.
    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.push(NodeData::Text {
            value: value.to_string(),
        })
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Attaches a detached node (and its subtree) as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        if !matches!(self.node(parent)?.data, NodeData::Element { .. }) {
            return Err(DocumentError::NotAnElement(parent));
        }
        if self.node(child)?.parent.is_some() || child == self.root {
            return Err(DocumentError::AlreadyAttached(child));
        }
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(DocumentError::Cycle { parent, child });
            }
            ancestor = self.nodes[id.0].parent;
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.emit(TreeChange::subtree_inserted(child));
        Ok(())
    }

    /// Creates an element and appends it to `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DocumentError> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Creates a text segment and appends it to `parent`.
    pub fn add_text(&mut self, parent: NodeId, value: &str) -> Result<NodeId, DocumentError> {
        let id = self.create_text(value);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn sibling_at(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.nodes.get(node.0)?.parent?;
        let siblings = &self.nodes[parent.0].children;
        let position = siblings.iter().position(|id| *id == node)?;
        let target = position.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    /// `node` and everything below it, in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(node) {
            return out;
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        out
    }

    /// Text segments at or below `node`, in document order.
    pub fn text_segments(&self, node: NodeId) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|id| self.is_text(*id))
            .collect()
    }

    /// Concatenated text at or below `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.text_segments(node)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }
}

impl TreeNavigation for SegmentTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.children.first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling_at(node, 1)
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling_at(node, -1)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text { value } => Some(value.as_str()),
            NodeData::Element { .. } => None,
        }
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element { tag } => Some(tag.as_str()),
            NodeData::Text { .. } => None,
        }
    }
}

impl TextMutation for SegmentTree {
    fn set_text(&mut self, node: NodeId, value: &str) -> bool {
        let changed = match self.nodes.get_mut(node.0).map(|n| &mut n.data) {
            Some(NodeData::Text { value: current }) if current != value => {
                *current = value.to_string();
                true
            }
            _ => false,
        };
        if changed {
            self.emit(TreeChange::text_changed(node));
        }
        changed
    }
}
