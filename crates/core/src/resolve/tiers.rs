//! Search tiers of the cross-segment resolver.

use crate::document::{NodeId, TreeNavigation};

/// Direction the search walks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Amount follows the marker; resolved text gets the suffix.
    Right,
    /// Amount precedes the marker; the marker itself becomes the suffix.
    Left,
}

impl Side {
    /// Neighbour of `node` in this direction, skipping blank text.
    pub fn step<T: TreeNavigation>(self, tree: &T, node: NodeId) -> Option<NodeId> {
        match self {
            Side::Right => tree.next_sibling_skipping_blank(node),
            Side::Left => tree.previous_sibling_skipping_blank(node),
        }
    }
}

/// Node whose sibling anchors the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Sibling of the marker's parent element.
    ParentSibling,
    /// Sibling of the marker itself.
    OwnSibling,
}

/// Which node relative to the anchor is the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Itself,
    /// The anchor's first child; may pair with the next anchor's first child.
    FirstChild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub side: Side,
    pub anchor: Anchor,
    pub target: Target,
}

impl Tier {
    const fn new(side: Side, anchor: Anchor, target: Target) -> Self {
        Self {
            side,
            anchor,
            target,
        }
    }

    /// The anchor node for `marker`, if the tree has one.
    pub fn anchor_of<T: TreeNavigation>(&self, tree: &T, marker: NodeId) -> Option<NodeId> {
        let base = match self.anchor {
            Anchor::ParentSibling => tree.parent(marker)?,
            Anchor::OwnSibling => marker,
        };
        self.side.step(tree, base)
    }

    /// The candidate below or at `anchor`.
    pub fn candidate_of<T: TreeNavigation>(&self, tree: &T, anchor: NodeId) -> Option<NodeId> {
        match self.target {
            Target::Itself => Some(anchor),
            Target::FirstChild => tree.first_child(anchor),
        }
    }

    pub fn can_pair(&self) -> bool {
        self.target == Target::FirstChild
    }
}

/// Tiers in search order.
pub const TIERS: [Tier; 6] = [
    Tier::new(Side::Right, Anchor::ParentSibling, Target::Itself),
    Tier::new(Side::Right, Anchor::ParentSibling, Target::FirstChild),
    Tier::new(Side::Right, Anchor::OwnSibling, Target::FirstChild),
    Tier::new(Side::Left, Anchor::ParentSibling, Target::Itself),
    Tier::new(Side::Left, Anchor::ParentSibling, Target::FirstChild),
    Tier::new(Side::Left, Anchor::OwnSibling, Target::FirstChild),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SegmentTree;

    #[test]
    fn test_right_tiers_come_first() {
        let sides: Vec<Side> = TIERS.iter().map(|t| t.side).collect();
        assert_eq!(
            sides,
            vec![Side::Right, Side::Right, Side::Right, Side::Left, Side::Left, Side::Left]
        );
    }

    #[test]
    fn test_anchor_skips_blank_siblings() {
        let mut tree = SegmentTree::new("body");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();
        tree.add_text(tree.root(), "   ").unwrap();
        let amount = tree.add_text(tree.root(), "5").unwrap();

        assert_eq!(TIERS[0].anchor_of(&tree, marker), Some(amount));
        assert_eq!(TIERS[0].candidate_of(&tree, amount), Some(amount));
        assert_eq!(TIERS[1].candidate_of(&tree, amount), None);
        assert_eq!(TIERS[2].anchor_of(&tree, marker), None);
        assert_eq!(TIERS[3].anchor_of(&tree, marker), None);
    }
}
