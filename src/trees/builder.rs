//! Greedy top-down tree induction.
use crate::data::dataset::Dataset;
use crate::data::value::{Label, Value};
use crate::trees::criterion::Impurity;
use crate::trees::distribution::LabelCounts;
use crate::trees::node::TreeNode;
use crate::trees::params::TreeParams;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

struct SplitData {
    column: usize,
    value: Value,
    information_gain: f64,
}

/// Builds a tree from `dataset` with default stopping rules.
///
/// Equivalent to `TreeBuilder::new(scorer).build(dataset)`.
pub fn build<L, S>(dataset: &Dataset<L>, scorer: &S) -> TreeNode<L>
where
    L: Label,
    S: Impurity<L>,
{
    TreeBuilder::new(scorer).build(dataset)
}

/// Recursively splits row sets on the attribute value that reduces impurity the most.
///
/// Candidate split values are the distinct values observed in each column. A node becomes a
/// leaf when no candidate reduces impurity by a strictly positive amount; among equally good
/// candidates the first one found (by column, then by first appearance) wins.
pub struct TreeBuilder<'a, S> {
    scorer: &'a S,
    tree_params: TreeParams,
}

impl<'a, S> TreeBuilder<'a, S> {
    pub fn new(scorer: &'a S) -> Self {
        Self::with_params(scorer, TreeParams::new())
    }

    pub fn with_params(scorer: &'a S, tree_params: TreeParams) -> Self {
        Self {
            scorer,
            tree_params,
        }
    }

    pub fn build<L>(&self, dataset: &Dataset<L>) -> TreeNode<L>
    where
        L: Label,
        S: Impurity<L>,
    {
        self.build_tree(dataset, 0)
    }

    fn build_tree<L>(&self, dataset: &Dataset<L>, depth: u16) -> TreeNode<L>
    where
        L: Label,
        S: Impurity<L>,
    {
        if dataset.is_empty() {
            return TreeNode::Leaf(LabelCounts::new());
        }

        let counts = dataset.label_counts();
        if self.tree_params.allows_split(dataset.nrows(), depth) {
            let current_score = self.scorer.impurity(&counts);
            if let Some(best_split) = self.get_best_split(dataset, current_score) {
                let (true_set, false_set) =
                    dataset.partition(best_split.column, &best_split.value);
                let true_branch = self.build_tree(&true_set, depth + 1);
                let false_branch = self.build_tree(&false_set, depth + 1);
                return TreeNode::internal(
                    best_split.column,
                    best_split.value,
                    true_branch,
                    false_branch,
                );
            }
        }

        TreeNode::Leaf(counts)
    }

    fn get_best_split<L>(&self, dataset: &Dataset<L>, current_score: f64) -> Option<SplitData>
    where
        L: Label,
        S: Impurity<L>,
    {
        let splits = (0..dataset.ncols())
            .into_par_iter()
            .map(|column| self.get_split(dataset, column, current_score))
            .collect::<Vec<_>>();

        // Columns are reduced in order so that ties keep the earliest column.
        splits
            .into_iter()
            .flatten()
            .fold(None, |best: Option<SplitData>, split| match best {
                Some(best) if best.information_gain >= split.information_gain => Some(best),
                _ => Some(split),
            })
    }

    fn get_split<L>(
        &self,
        dataset: &Dataset<L>,
        column: usize,
        current_score: f64,
    ) -> Option<SplitData>
    where
        L: Label,
        S: Impurity<L>,
    {
        let mut best_split: Option<SplitData> = None;
        let mut best_information_gain = 0.0;

        for value in dataset.distinct_values(column) {
            let (true_counts, false_counts) = dataset.partition_counts(column, &value);
            let information_gain =
                self.calculate_information_gain(current_score, &true_counts, &false_counts);

            if information_gain > best_information_gain {
                best_information_gain = information_gain;
                best_split = Some(SplitData {
                    column,
                    value,
                    information_gain,
                });
            }
        }
        best_split
    }

    fn calculate_information_gain<L>(
        &self,
        current_score: f64,
        true_counts: &LabelCounts<L>,
        false_counts: &LabelCounts<L>,
    ) -> f64
    where
        L: Label,
        S: Impurity<L>,
    {
        let total = true_counts.total() + false_counts.total();
        if total == 0 {
            return 0.0;
        }
        let weight_true = true_counts.total() as f64 / total as f64;

        current_score
            - weight_true * self.scorer.impurity(true_counts)
            - (1.0 - weight_true) * self.scorer.impurity(false_counts)
    }
}
