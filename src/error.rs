use thiserror::Error;

/// Errors produced while building, configuring or querying a decision tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    /// A hyperparameter was set to a value outside its allowed range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A row of the training data has a different number of attributes than the first row.
    #[error("Row {row} has {found} attributes, expected {expected}.")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Two sequences that must be aligned element-wise have different lengths.
    #[error("Length mismatch: expected {expected}, found {found}.")]
    LengthMismatch { expected: usize, found: usize },

    /// The model was queried before `fit` was called.
    #[error("Tree wasn't built yet.")]
    NotFitted,

    /// Both branches below a missing attribute carry zero mass, so they cannot be weighted.
    #[error("Cannot weight branches of column {column}: both sides are empty.")]
    IndeterminateClassification { column: usize },

    /// An evaluation metric has no defined value for the given predictions.
    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    /// A single label was requested from a distribution without any mass.
    #[error("The label distribution is empty.")]
    EmptyDistribution,
}
