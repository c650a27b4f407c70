use crate::sample::{ClassLabel, Feature, Point};

/// A node in a decision tree.
///
/// Each split owns its two children. Trees are built once and then only
/// traversed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A terminal leaf node.
    Leaf {
        /// Predicted class.
        class: ClassLabel,
    },
    /// An interior split node.
    Split {
        /// Feature used for the split.
        feature: Feature,
        /// Threshold value: points with feature <= threshold go left.
        threshold: f64,
        /// Subtree for `feature <= threshold`.
        left: Box<Node>,
        /// Subtree for `feature > threshold`.
        right: Box<Node>,
    },
}

impl Node {
    /// Create a leaf predicting `class`.
    #[must_use]
    pub fn leaf(class: ClassLabel) -> Self {
        Node::Leaf { class }
    }

    /// Create a split node owning both children.
    #[must_use]
    pub fn split(feature: Feature, threshold: f64, left: Node, right: Node) -> Self {
        Node::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the number of leaves below (and including) this node.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    /// Return the number of split nodes below (and including) this node.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.n_splits() + right.n_splits(),
        }
    }

    /// Return the maximum depth. A single leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Return every leaf class in left-to-right order.
    #[must_use]
    pub fn leaf_classes(&self) -> Vec<ClassLabel> {
        let mut out = Vec::with_capacity(self.n_leaves());
        self.collect_leaf_classes(&mut out);
        out
    }

    fn collect_leaf_classes(&self, out: &mut Vec<ClassLabel>) {
        match self {
            Node::Leaf { class } => out.push(*class),
            Node::Split { left, right, .. } => {
                left.collect_leaf_classes(out);
                right.collect_leaf_classes(out);
            }
        }
    }

    /// Route `point` to a leaf and return its class.
    ///
    /// At each split, goes left when `point[feature] <= threshold`, right
    /// otherwise.
    #[must_use]
    pub fn predict(&self, point: &Point) -> ClassLabel {
        match self {
            Node::Leaf { class } => *class,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature.value(point) <= *threshold {
                    left.predict(point)
                } else {
                    right.predict(point)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use crate::sample::{ClassLabel, Feature, Point};

    fn make_tree() -> Node {
        // income <= 50 ? (score <= 600 ? Deny : Review) : Approve
        Node::split(
            Feature::Income,
            50.0,
            Node::split(
                Feature::Score,
                600.0,
                Node::leaf(ClassLabel::DENY),
                Node::leaf(ClassLabel::REVIEW),
            ),
            Node::leaf(ClassLabel::APPROVE),
        )
    }

    // --- Shape ---

    #[test]
    fn leaf_is_leaf() {
        assert!(Node::leaf(ClassLabel::APPROVE).is_leaf());
        assert!(!make_tree().is_leaf());
    }

    #[test]
    fn counts_leaves_and_splits() {
        let tree = make_tree();
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.n_splits(), 2);
    }

    #[test]
    fn depth_of_leaf_is_zero() {
        assert_eq!(Node::leaf(ClassLabel::DENY).depth(), 0);
        assert_eq!(make_tree().depth(), 2);
    }

    #[test]
    fn leaf_classes_left_to_right() {
        assert_eq!(
            make_tree().leaf_classes(),
            vec![ClassLabel::DENY, ClassLabel::REVIEW, ClassLabel::APPROVE]
        );
    }

    // --- Prediction ---

    #[test]
    fn threshold_is_inclusive_on_left() {
        let tree = make_tree();
        assert_eq!(tree.predict(&Point::new(50.0, 700.0)), ClassLabel::REVIEW);
        assert_eq!(tree.predict(&Point::new(50.0001, 700.0)), ClassLabel::APPROVE);
    }

    #[test]
    fn routes_through_nested_split() {
        let tree = make_tree();
        assert_eq!(tree.predict(&Point::new(20.0, 450.0)), ClassLabel::DENY);
        assert_eq!(tree.predict(&Point::new(20.0, 650.0)), ClassLabel::REVIEW);
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(make_tree()).unwrap();
        assert_eq!(json["kind"], "split");
        assert_eq!(json["feature"], "income");
        assert_eq!(json["right"]["kind"], "leaf");
        assert_eq!(json["right"]["class"], 0);
    }
}
