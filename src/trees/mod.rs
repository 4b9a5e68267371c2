/// Greedy tree induction
pub mod builder;
/// Decision tree classifier
pub mod classifier;
/// Impurity measures
pub mod criterion;
/// Label counts and weighted distributions
pub mod distribution;
/// Tree nodes, classification and pruning
pub mod node;
/// Tree hyperparameters
pub mod params;

pub use builder::{build, TreeBuilder};
pub use classifier::DecisionTreeClassifier;
pub use criterion::{entropy, gini_impurity, variance, Criterion, Impurity};
pub use distribution::{LabelCounts, LabelDistribution};
pub use node::{SplitNode, TreeNode};
