use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};

use crate::data::value::Label;
use crate::error::TreeError;

/// Counts of true labels (rows) against predicted labels (columns).
///
/// Classes are every label seen in either vector, sorted by their `Ord` implementation.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix<L: Label> {
    classes: Vec<L>,
    counts: DMatrix<usize>,
}

impl<L: Label> ConfusionMatrix<L> {
    pub fn new(y_true: &DVector<L>, y_pred: &DVector<L>) -> Result<Self, TreeError> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::LengthMismatch {
                expected: y_true.len(),
                found: y_pred.len(),
            });
        }

        let classes: Vec<L> = y_true
            .iter()
            .chain(y_pred.iter())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = DMatrix::zeros(classes.len(), classes.len());
        for (actual, predicted) in y_true.iter().zip(y_pred.iter()) {
            let row = classes.binary_search(actual);
            let col = classes.binary_search(predicted);
            if let (Ok(row), Ok(col)) = (row, col) {
                counts[(row, col)] += 1;
            }
        }

        Ok(Self { classes, counts })
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn counts(&self) -> &DMatrix<usize> {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    pub fn correct(&self) -> usize {
        self.counts.diagonal().sum()
    }

    /// Share of the predictions of `class` that were right, `None` if it was never predicted.
    pub fn class_precision(&self, class: usize) -> Option<f64> {
        let predicted = self.counts.column(class).sum();
        (predicted > 0).then(|| self.counts[(class, class)] as f64 / predicted as f64)
    }

    /// Share of the rows of `class` that were found, `None` if it never occurs.
    pub fn class_recall(&self, class: usize) -> Option<f64> {
        let actual = self.counts.row(class).sum();
        (actual > 0).then(|| self.counts[(class, class)] as f64 / actual as f64)
    }

    fn macro_average(&self, per_class: impl Fn(usize) -> Option<f64>) -> f64 {
        if self.classes.is_empty() {
            return 0.0;
        }
        let sum: f64 = (0..self.classes.len()).filter_map(per_class).sum();
        sum / self.classes.len() as f64
    }
}

/// Classification quality measures, macro-averaged over all classes.
pub trait ClassificationMetrics<L: Label> {
    fn confusion_matrix(
        &self,
        y_true: &DVector<L>,
        y_pred: &DVector<L>,
    ) -> Result<ConfusionMatrix<L>, TreeError> {
        ConfusionMatrix::new(y_true, y_pred)
    }

    /// Fraction of predictions equal to the true label.
    fn accuracy(&self, y_true: &DVector<L>, y_pred: &DVector<L>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        if matrix.total() == 0 {
            return Err(TreeError::UndefinedMetric(
                "Accuracy of an empty prediction set is undefined.".into(),
            ));
        }
        Ok(matrix.correct() as f64 / matrix.total() as f64)
    }

    /// Mean precision over all classes; classes never predicted contribute 0.
    fn precision(&self, y_true: &DVector<L>, y_pred: &DVector<L>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(matrix.macro_average(|class| matrix.class_precision(class)))
    }

    /// Mean recall over all classes; classes that never occur contribute 0.
    fn recall(&self, y_true: &DVector<L>, y_pred: &DVector<L>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(matrix.macro_average(|class| matrix.class_recall(class)))
    }

    /// Harmonic mean of macro precision and macro recall.
    fn f1_score(&self, y_true: &DVector<L>, y_pred: &DVector<L>) -> Result<f64, TreeError> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        if precision + recall <= 0.0 {
            return Err(TreeError::UndefinedMetric(
                "Precision and recall are both 0, F1 score undefined.".into(),
            ));
        }
        Ok(2.0 * precision * recall / (precision + recall))
    }
}
