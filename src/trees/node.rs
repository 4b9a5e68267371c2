use crate::data::value::{Label, Value};
use crate::error::TreeError;
use crate::trees::criterion::entropy;
use crate::trees::distribution::{LabelCounts, LabelDistribution};
use std::fmt::{self, Display, Formatter};

/// Split criterion of an internal node together with its two subtrees.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitNode<L: Label> {
    pub column: usize,
    pub value: Value,
    pub true_branch: Box<TreeNode<L>>,
    pub false_branch: Box<TreeNode<L>>,
}

impl<L: Label> SplitNode<L> {
    /// The subtree an attribute value is routed to.
    pub fn branch(&self, attribute: &Value) -> &TreeNode<L> {
        if attribute.matches(&self.value) {
            &self.true_branch
        } else {
            &self.false_branch
        }
    }
}

/// Decision tree node
///
/// Internal nodes always own exactly two children; leaves own the label counts of the rows
/// that reached them.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode<L: Label> {
    Internal(SplitNode<L>),
    Leaf(LabelCounts<L>),
}

impl<L: Label> TreeNode<L> {
    pub fn internal(column: usize, value: Value, true_branch: Self, false_branch: Self) -> Self {
        TreeNode::Internal(SplitNode {
            column,
            value,
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    pub fn counts(&self) -> Option<&LabelCounts<L>> {
        match self {
            TreeNode::Leaf(counts) => Some(counts),
            TreeNode::Internal(_) => None,
        }
    }

    /// Number of split levels below this node; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Internal(split) => {
                1 + split.true_branch.depth().max(split.false_branch.depth())
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Internal(split) => {
                split.true_branch.leaf_count() + split.false_branch.leaf_count()
            }
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Internal(split) => {
                1 + split.true_branch.node_count() + split.false_branch.node_count()
            }
        }
    }

    /// Classifies an observation, where `None` marks a missing attribute.
    ///
    /// A present attribute routes the observation down one branch. A missing attribute
    /// follows both branches and merges their distributions, each weighted by its share of
    /// the combined mass. Columns past the end of `observation` count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndeterminateClassification`] if both branches below a missing
    /// attribute carry no mass.
    pub fn classify(
        &self,
        observation: &[Option<Value>],
    ) -> Result<LabelDistribution<L>, TreeError> {
        let split = match self {
            TreeNode::Leaf(counts) => return Ok(LabelDistribution::from(counts)),
            TreeNode::Internal(split) => split,
        };

        match observation.get(split.column).and_then(Option::as_ref) {
            Some(attribute) => split.branch(attribute).classify(observation),
            None => {
                let true_dist = split.true_branch.classify(observation)?;
                let false_dist = split.false_branch.classify(observation)?;

                let true_total = true_dist.total();
                let total = true_total + false_dist.total();
                if total <= 0.0 {
                    return Err(TreeError::IndeterminateClassification {
                        column: split.column,
                    });
                }
                let true_weight = true_total / total;
                Ok(true_dist.weighted_sum(true_weight, &false_dist, 1.0 - true_weight))
            }
        }
    }

    /// Collapses sibling leaves whose split gains less than `min_gain` bits of entropy.
    ///
    /// Children are pruned before their parent, so a parent whose children were both turned
    /// into leaves during this call is considered as well. Each node is visited once.
    pub fn prune(&mut self, min_gain: f64) {
        let TreeNode::Internal(split) = self else {
            return;
        };
        split.true_branch.prune(min_gain);
        split.false_branch.prune(min_gain);

        let merged = match (split.true_branch.as_ref(), split.false_branch.as_ref()) {
            (TreeNode::Leaf(true_counts), TreeNode::Leaf(false_counts)) => {
                let merged = true_counts.merged(false_counts);
                let gain = entropy(&merged) - (entropy(true_counts) + entropy(false_counts));
                (gain < min_gain).then_some(merged)
            }
            _ => None,
        };

        if let Some(counts) = merged {
            *self = TreeNode::Leaf(counts);
        }
    }

    fn fmt_indented(&self, f: &mut Formatter<'_>, indent: &str) -> fmt::Result {
        match self {
            TreeNode::Leaf(counts) => writeln!(f, "{}", counts),
            TreeNode::Internal(split) => {
                writeln!(f, "{}:{}?", split.column, split.value)?;
                let child_indent = format!("{}  ", indent);
                write!(f, "{}T-> ", indent)?;
                split.true_branch.fmt_indented(f, &child_indent)?;
                write!(f, "{}F-> ", indent)?;
                split.false_branch.fmt_indented(f, &child_indent)
            }
        }
    }
}

impl<L: Label> Display for TreeNode<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf(counts: &[(&'static str, usize)]) -> TreeNode<&'static str> {
        TreeNode::Leaf(counts.iter().cloned().collect())
    }

    fn two_leaf_tree() -> TreeNode<&'static str> {
        TreeNode::internal(0, Value::from("a"), leaf(&[("X", 3)]), leaf(&[("Y", 1)]))
    }

    #[test]
    fn test_classify_present_attribute() {
        let tree = two_leaf_tree();

        let result = tree.classify(&[Some(Value::from("a"))]).unwrap();
        assert_relative_eq!(result.get(&"X"), 3.0);
        assert_eq!(result.len(), 1);

        let result = tree.classify(&[Some(Value::from("b"))]).unwrap();
        assert_relative_eq!(result.get(&"Y"), 1.0);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_classify_missing_attribute_weights_branches() {
        let tree = two_leaf_tree();

        let result = tree.classify(&[None]).unwrap();
        assert_relative_eq!(result.get(&"X"), 2.25);
        assert_relative_eq!(result.get(&"Y"), 0.25);
    }

    #[test]
    fn test_classify_short_observation_counts_as_missing() {
        let tree = two_leaf_tree();
        assert_eq!(tree.classify(&[]).unwrap(), tree.classify(&[None]).unwrap());
    }

    #[test]
    fn test_classify_missing_attribute_merges_shared_labels() {
        let tree = TreeNode::internal(
            1,
            Value::from(10),
            leaf(&[("X", 1), ("Y", 1)]),
            leaf(&[("Y", 2)]),
        );

        let result = tree.classify(&[Some(Value::from("a")), None]).unwrap();
        assert_relative_eq!(result.get(&"X"), 0.5);
        assert_relative_eq!(result.get(&"Y"), 0.5 + 2.0 * 0.5);
    }

    #[test]
    fn test_classify_missing_attribute_with_empty_branches() {
        let tree = TreeNode::internal(2, Value::from(1), leaf(&[]), leaf(&[]));

        assert_eq!(
            tree.classify(&[None, None, None]),
            Err(TreeError::IndeterminateClassification { column: 2 })
        );
    }

    #[test]
    fn test_prune_collapses_low_gain_pair() {
        let mut tree = TreeNode::internal(
            0,
            Value::from(5),
            leaf(&[("X", 2), ("Y", 1)]),
            leaf(&[("X", 1), ("Y", 1)]),
        );

        tree.prune(0.1);

        assert_eq!(tree, leaf(&[("X", 3), ("Y", 2)]));
    }

    #[test]
    fn test_prune_keeps_informative_split() {
        let mut tree = two_leaf_tree();
        let original = tree.clone();

        tree.prune(0.5);

        assert_eq!(tree, original);
    }

    #[test]
    fn test_prune_leaf_is_noop() {
        let mut tree = leaf(&[("X", 1)]);
        tree.prune(10.0);
        assert_eq!(tree, leaf(&[("X", 1)]));
    }

    #[test]
    fn test_prune_cascades_to_parent_within_one_sweep() {
        let mut tree = TreeNode::internal(
            0,
            Value::from("a"),
            TreeNode::internal(1, Value::from(3), leaf(&[("X", 2)]), leaf(&[("Y", 1)])),
            leaf(&[("Y", 4)]),
        );

        tree.prune(2.0);

        assert_eq!(tree, leaf(&[("X", 2), ("Y", 5)]));
    }

    #[test]
    fn test_prune_does_not_touch_parent_with_internal_child() {
        let inner = TreeNode::internal(1, Value::from(3), leaf(&[("X", 2)]), leaf(&[("Y", 2)]));
        let mut tree = TreeNode::internal(0, Value::from("a"), inner, leaf(&[("Y", 4)]));
        let original = tree.clone();

        // The inner pair gains exactly 1 bit, so it survives a threshold of 1.
        tree.prune(1.0);

        assert_eq!(tree, original);
    }

    #[test]
    fn test_shape_helpers() {
        let tree = TreeNode::internal(
            0,
            Value::from("a"),
            two_leaf_tree(),
            leaf(&[("Z", 1)]),
        );
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.node_count(), 5);
        assert!(!tree.is_leaf());
        assert!(tree.counts().is_none());
    }

    #[test]
    fn test_display() {
        let tree = TreeNode::internal(
            0,
            Value::from("google"),
            TreeNode::internal(3, Value::from(21), leaf(&[("Premium", 3)]), leaf(&[("Basic", 1)])),
            leaf(&[("None", 2)]),
        );

        let expected = "\
0:google?
T-> 3:21?
  T-> {\"Premium\": 3}
  F-> {\"Basic\": 1}
F-> {\"None\": 2}
";
        assert_eq!(tree.to_string(), expected);
    }
}
