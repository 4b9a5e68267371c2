//! Impurity measures used to score candidate splits.
use crate::data::value::Label;
use crate::error::TreeError;
use crate::trees::distribution::LabelCounts;
use num_traits::ToPrimitive;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Scores how mixed the labels of a row set are.
///
/// Implementations must return `0.0` for a pure set and larger values for more mixed sets.
/// Any `Fn(&LabelCounts<L>) -> f64` closure is a valid scorer.
pub trait Impurity<L: Label>: Sync {
    fn impurity(&self, counts: &LabelCounts<L>) -> f64;
}

impl<L, F> Impurity<L> for F
where
    L: Label,
    F: Fn(&LabelCounts<L>) -> f64 + Sync,
{
    fn impurity(&self, counts: &LabelCounts<L>) -> f64 {
        self(counts)
    }
}

/// Built-in impurity measures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Criterion {
    #[default]
    Gini,
    Entropy,
}

impl<L: Label> Impurity<L> for Criterion {
    fn impurity(&self, counts: &LabelCounts<L>) -> f64 {
        match self {
            Criterion::Gini => gini_impurity(counts),
            Criterion::Entropy => entropy(counts),
        }
    }
}

impl FromStr for Criterion {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gini" => Ok(Criterion::Gini),
            "entropy" => Ok(Criterion::Entropy),
            _ => Err(TreeError::InvalidParameter(
                "The criterion must be either 'gini' or 'entropy'.".into(),
            )),
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Gini => write!(f, "gini"),
            Criterion::Entropy => write!(f, "entropy"),
        }
    }
}

fn probabilities<L: Label>(counts: &LabelCounts<L>) -> impl Iterator<Item = f64> + '_ {
    let total = counts.total() as f64;
    counts.iter().map(move |(_, count)| count as f64 / total)
}

/// Probability that two rows drawn at random carry different labels.
///
/// Equal to the sum of `p(a) * p(b)` over all ordered pairs of distinct labels.
/// An empty set scores `0.0`.
pub fn gini_impurity<L: Label>(counts: &LabelCounts<L>) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    1.0 - probabilities(counts).map(|p| p * p).sum::<f64>()
}

/// Shannon entropy of the label distribution, in bits. An empty set scores `0.0`.
pub fn entropy<L: Label>(counts: &LabelCounts<L>) -> f64 {
    probabilities(counts).map(|p| -p * p.log2()).sum::<f64>().max(0.0)
}

/// Variance of numeric labels, for trees predicting a numeric outcome.
///
/// Labels must be `Ord`, which in practice limits this to integer labels; wrap it in a closure
/// to use it as a scorer. Labels that cannot be converted to `f64` are ignored. An empty set
/// scores `0.0`.
pub fn variance<L: Label + ToPrimitive>(counts: &LabelCounts<L>) -> f64 {
    let values: Vec<(f64, f64)> = counts
        .iter()
        .filter_map(|(label, count)| label.to_f64().map(|value| (value, count as f64)))
        .collect();
    let total: f64 = values.iter().map(|&(_, count)| count).sum();
    if total == 0.0 {
        return 0.0;
    }

    let mean = values.iter().map(|&(value, count)| value * count).sum::<f64>() / total;
    values
        .iter()
        .map(|&(value, count)| count * (value - mean) * (value - mean))
        .sum::<f64>()
        / total
}
