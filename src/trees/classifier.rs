//! Decision Tree Classifier
use super::builder::TreeBuilder;
use super::criterion::{Criterion, Impurity};
use super::distribution::LabelDistribution;
use super::node::TreeNode;
use super::params::TreeClassifierParams;
use crate::data::dataset::Dataset;
use crate::data::value::{Label, Value};
use crate::error::TreeError;
use crate::metrics::confusion::ClassificationMetrics;
use nalgebra::{DMatrix, DVector};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Decision Tree Classifier
///
/// Attributes may be numeric or nominal; observations passed to [`classify`](Self::classify)
/// and [`predict`](Self::predict) mark missing attributes with `None`.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<L: Label> {
    root: Option<Box<TreeNode<L>>>,
    tree_params: TreeClassifierParams,
}

impl<L: Label> Default for DecisionTreeClassifier<L> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> ClassificationMetrics<L> for DecisionTreeClassifier<L> {}

impl<L: Label> DecisionTreeClassifier<L> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            tree_params: TreeClassifierParams::new(),
        }
    }

    /// Creates a new instance of the decision tree classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `criterion` - The impurity measure used to score splits, Gini by default.
    /// * `min_samples_split` - The minimum number of samples required to split an internal node.
    /// * `max_depth` - The maximum depth of the tree.
    ///
    /// # Returns
    ///
    /// A new instance of the decision tree classifier with the specified parameters.
    ///
    /// # Errors
    ///
    /// This method will return an error if the minimum number of samples to split is less than 2 or if the maximum depth is less than 1.
    pub fn with_params(
        criterion: Option<Criterion>,
        min_samples_split: Option<u16>,
        max_depth: Option<u16>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new();

        tree.set_criterion(criterion.unwrap_or_default());
        tree.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree.set_max_depth(max_depth)?;
        Ok(tree)
    }

    /// Sets the impurity measure used by [`fit`](Self::fit).
    ///
    /// # Arguments
    ///
    /// * `criterion` - Either Gini impurity or entropy.
    pub fn set_criterion(&mut self, criterion: Criterion) {
        self.tree_params.set_criterion(criterion)
    }

    /// Sets the minimum number of samples required to split an internal node.
    ///
    /// # Arguments
    ///
    /// * `min_samples_split` - The minimum number of samples required to split an internal node.
    ///
    /// # Errors
    ///
    /// This method will return an error if the minimum number of samples to split is less than 2.
    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    /// Sets the maximum depth of the tree.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - The maximum depth of the tree, `None` for no limit.
    ///
    /// # Errors
    ///
    /// This method will return an error if the maximum depth is less than 1.
    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    /// Returns the impurity measure used by [`fit`](Self::fit).
    pub fn criterion(&self) -> Criterion {
        self.tree_params.criterion()
    }

    /// Returns the minimum number of samples required to split an internal node.
    pub fn min_samples_split(&self) -> u16 {
        self.tree_params.min_samples_split()
    }

    /// Returns the maximum depth of the tree.
    pub fn max_depth(&self) -> Option<u16> {
        self.tree_params.max_depth()
    }

    /// The fitted tree, if any.
    pub fn root(&self) -> Option<&TreeNode<L>> {
        self.root.as_deref()
    }

    /// Builds the decision tree from a dataset using the configured criterion.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The dataset containing attributes and labels.
    ///
    /// # Returns
    ///
    /// A string indicating that the tree was built successfully.
    pub fn fit(&mut self, dataset: &Dataset<L>) -> Result<String, TreeError> {
        let criterion = self.criterion();
        self.fit_with(dataset, &criterion)
    }

    /// Builds the decision tree from a dataset using a caller-supplied impurity measure.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The dataset containing attributes and labels.
    /// * `scorer` - Any [`Impurity`], including closures over [`LabelCounts`](super::LabelCounts).
    ///
    /// # Returns
    ///
    /// A string indicating that the tree was built successfully.
    pub fn fit_with<S: Impurity<L>>(
        &mut self,
        dataset: &Dataset<L>,
        scorer: &S,
    ) -> Result<String, TreeError> {
        let builder = TreeBuilder::with_params(scorer, self.tree_params.base_params.clone());
        self.root = Some(Box::new(builder.build(dataset)));
        Ok("Finished building the tree.".into())
    }

    /// Returns the label distribution reached by a single observation.
    ///
    /// # Arguments
    ///
    /// * `observation` - One value per column, `None` where the attribute is missing.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or if a missing attribute
    /// leads into two branches without any mass.
    pub fn classify(
        &self,
        observation: &[Option<Value>],
    ) -> Result<LabelDistribution<L>, TreeError> {
        self.fitted_root()?.classify(observation)
    }

    /// Predicts the most likely label of every row of `features`.
    ///
    /// # Arguments
    ///
    /// * `features` - One observation per row, `None` where an attribute is missing.
    ///
    /// # Returns
    ///
    /// A vector containing the predicted label of each row.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or if any row cannot be
    /// classified.
    pub fn predict(&self, features: &DMatrix<Option<Value>>) -> Result<DVector<L>, TreeError> {
        let root = self.fitted_root()?;
        let predictions = (0..features.nrows())
            .into_par_iter()
            .map(|index| {
                let observation: Vec<Option<Value>> =
                    features.row(index).iter().cloned().collect();
                let distribution = root.classify(&observation)?;
                distribution.most_likely().cloned()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }

    /// Collapses leaf pairs whose split gains less than `min_gain` bits of entropy.
    ///
    /// # Arguments
    ///
    /// * `min_gain` - Smallest entropy gain a pair of sibling leaves must keep to survive.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet.
    pub fn prune(&mut self, min_gain: f64) -> Result<(), TreeError> {
        self.root
            .as_deref_mut()
            .ok_or(TreeError::NotFitted)?
            .prune(min_gain);
        Ok(())
    }

    fn fitted_root(&self) -> Result<&TreeNode<L>, TreeError> {
        self.root.as_deref().ok_or(TreeError::NotFitted)
    }
}

/// Turns fully observed rows into observations without missing attributes.
pub fn observations(x: &DMatrix<Value>) -> DMatrix<Option<Value>> {
    x.map(Some)
}
