//! Label distributions stored in leaves and returned by classification.
use crate::data::value::Label;
use crate::error::TreeError;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Number of occurrences of each label in a set of rows.
///
/// The counts always sum to the size of the row set they were taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelCounts<L: Label> {
    counts: BTreeMap<L, usize>,
}

impl<L: Label> Default for LabelCounts<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> LabelCounts<L> {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Counts every label yielded by `labels`.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a L>,
    {
        labels.into_iter().fold(Self::new(), |mut acc, label| {
            acc.add(label.clone(), 1);
            acc
        })
    }

    /// Adds `count` occurrences of `label`; a zero count leaves no entry behind.
    pub fn add(&mut self, label: L, count: usize) {
        if count > 0 {
            *self.counts.entry(label).or_insert(0) += count;
        }
    }

    /// Occurrences of `label`, `0` if it never appeared.
    pub fn get(&self, label: &L) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn is_pure(&self) -> bool {
        self.counts.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, usize)> {
        self.counts.iter().map(|(label, &count)| (label, count))
    }

    /// Sums both count tables label by label.
    pub fn merged(&self, other: &Self) -> Self {
        other.iter().fold(self.clone(), |mut acc, (label, count)| {
            acc.add(label.clone(), count);
            acc
        })
    }

    /// The most frequent label; ties go to the smallest label.
    pub fn majority(&self) -> Option<&L> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&L, usize)>, (label, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            })
            .map(|(label, _)| label)
    }
}

impl<L: Label> FromIterator<(L, usize)> for LabelCounts<L> {
    fn from_iter<I: IntoIterator<Item = (L, usize)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut acc, (label, count)| {
            acc.add(label, count);
            acc
        })
    }
}

impl<L: Label> Display for LabelCounts<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (label, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", label, count)?;
        }
        write!(f, "}}")
    }
}

/// Weighted label distribution produced by classifying an observation.
///
/// For observations that reach a single leaf this is that leaf's counts; when branches are
/// merged because of a missing attribute the weights become fractional.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelDistribution<L: Label> {
    weights: BTreeMap<L, f64>,
}

impl<L: Label> Default for LabelDistribution<L> {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }
}

impl<L: Label> LabelDistribution<L> {
    /// Weight of `label`, `0.0` if it was never reached.
    pub fn get(&self, label: &L) -> f64 {
        self.weights.get(label).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, f64)> {
        self.weights.iter().map(|(label, &weight)| (label, weight))
    }

    /// Combines two distributions as `self * self_weight + other * other_weight`.
    pub(crate) fn weighted_sum(&self, self_weight: f64, other: &Self, other_weight: f64) -> Self {
        let mut weights: BTreeMap<L, f64> = self
            .iter()
            .map(|(label, weight)| (label.clone(), weight * self_weight))
            .collect();
        for (label, weight) in other.iter() {
            *weights.entry(label.clone()).or_insert(0.0) += weight * other_weight;
        }
        Self { weights }
    }

    /// The label carrying the largest weight; ties go to the smallest label.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyDistribution`] if there are no labels at all.
    pub fn most_likely(&self) -> Result<&L, TreeError> {
        self.weights
            .iter()
            .fold(None, |best: Option<(&L, f64)>, (label, &weight)| match best {
                Some((_, best_weight)) if best_weight >= weight => best,
                _ => Some((label, weight)),
            })
            .map(|(label, _)| label)
            .ok_or(TreeError::EmptyDistribution)
    }
}

impl<L: Label> From<&LabelCounts<L>> for LabelDistribution<L> {
    fn from(counts: &LabelCounts<L>) -> Self {
        Self {
            weights: counts
                .iter()
                .map(|(label, count)| (label.clone(), count as f64))
                .collect(),
        }
    }
}
