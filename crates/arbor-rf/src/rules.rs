//! IF/THEN rule extraction from a decision tree.

use crate::node::Node;
use crate::sample::Point;

/// Prefix that opens every extracted rule.
pub const RULE_PREFIX: &str = "IF ";

/// Round a threshold to the nearest integer (halves away from zero).
fn format_threshold(threshold: f64) -> String {
    format!("{}", threshold.round())
}

fn left_prefix(prefix: &str, node_label: &str, threshold: f64) -> String {
    format!("{prefix}{node_label} ≤ {} AND ", format_threshold(threshold))
}

fn right_prefix(prefix: &str, node_label: &str, threshold: f64) -> String {
    format!("{prefix}{node_label} > {} AND ", format_threshold(threshold))
}

/// Lazy depth-first walk yielding one rule per leaf, left before right.
///
/// Created by [`extract_rules`]. Each string is
/// `prefix + conditions + " THEN class = " + class`, where every condition
/// ends in `" AND "`; see [`tidy_rule`] for the cleaned form.
#[derive(Debug, Clone)]
pub struct Rules<'a> {
    stack: Vec<(&'a Node, String)>,
}

impl Iterator for Rules<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((node, prefix)) = self.stack.pop() {
            match node {
                Node::Leaf { class } => return Some(format!("{prefix} THEN class = {class}")),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Right is pushed first so the left subtree is emitted first.
                    self.stack
                        .push((right, right_prefix(&prefix, feature.label(), *threshold)));
                    self.stack
                        .push((left, left_prefix(&prefix, feature.label(), *threshold)));
                }
            }
        }
        None
    }
}

/// Walk `node` and yield one rule string per leaf, starting from `"IF "`.
///
/// The walk is lazy and re-derived from the tree on every call.
#[must_use]
pub fn extract_rules(node: &Node) -> Rules<'_> {
    extract_rules_with_prefix(node, RULE_PREFIX)
}

/// Like [`extract_rules`], with a caller-chosen opening prefix.
#[must_use]
pub fn extract_rules_with_prefix<'a>(node: &'a Node, prefix: &str) -> Rules<'a> {
    Rules {
        stack: vec![(node, prefix.to_string())],
    }
}

/// Remove the dangling connective left on the final condition of a rule.
///
/// `"IF Income ≤ 58 AND  THEN class = 0"` becomes
/// `"IF Income ≤ 58 THEN class = 0"`. A single-leaf tree's `"IF  THEN ..."`
/// becomes `"ALWAYS THEN ..."`.
#[must_use]
pub fn tidy_rule(rule: &str) -> String {
    let tidied = rule.replace(" AND  THEN ", " THEN ");
    let tidied = match tidied.strip_prefix("IF  THEN ") {
        Some(rest) => format!("ALWAYS THEN {rest}"),
        None => tidied,
    };
    match tidied.strip_suffix(" AND ") {
        Some(trimmed) => trimmed.to_string(),
        None => tidied,
    }
}

/// The tidied rule for the leaf that `point` reaches.
#[must_use]
pub fn matching_rule(node: &Node, point: &Point) -> String {
    let mut prefix = RULE_PREFIX.to_string();
    let mut current = node;
    loop {
        match current {
            Node::Leaf { class } => return tidy_rule(&format!("{prefix} THEN class = {class}")),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature.value(point) <= *threshold {
                    prefix = left_prefix(&prefix, feature.label(), *threshold);
                    current = left;
                } else {
                    prefix = right_prefix(&prefix, feature.label(), *threshold);
                    current = right;
                }
            }
        }
    }
}

impl Node {
    /// All rules for this tree, in left-first order. See [`extract_rules`].
    #[must_use]
    pub fn rules(&self) -> Rules<'_> {
        extract_rules(self)
    }

    /// The tidied rule that fires for `point`. See [`matching_rule`].
    #[must_use]
    pub fn matching_rule(&self, point: &Point) -> String {
        matching_rule(self, point)
    }
}
