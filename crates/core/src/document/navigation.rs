//! Read and write access used by the cross-segment resolver.

use super::NodeId;

/// Structural navigation over a tree of elements and text segments.
pub trait TreeNavigation {
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn first_child(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn previous_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Value of a text segment, `None` for elements.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Lowercase tag of an element, `None` for text segments.
    fn tag(&self, node: NodeId) -> Option<&str>;

    fn is_text(&self, node: NodeId) -> bool {
        self.text(node).is_some()
    }

    /// Next sibling, skipping whitespace-only text segments.
    fn next_sibling_skipping_blank(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(node);
        while let Some(id) = current {
            if !is_blank(self.text(id)) {
                return Some(id);
            }
            current = self.next_sibling(id);
        }
        None
    }

    /// Previous sibling, skipping whitespace-only text segments.
    fn previous_sibling_skipping_blank(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.previous_sibling(node);
        while let Some(id) = current {
            if !is_blank(self.text(id)) {
                return Some(id);
            }
            current = self.previous_sibling(id);
        }
        None
    }
}

/// In-place text rewriting.
pub trait TextMutation {
    /// Replaces the value of a text segment. Returns true if it changed.
    fn set_text(&mut self, node: NodeId, value: &str) -> bool;
}

fn is_blank(text: Option<&str>) -> bool {
    matches!(text, Some(value) if value.trim().is_empty())
}
