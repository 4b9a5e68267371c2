use crate::data::value::{Label, Value};
use crate::error::TreeError;
use crate::trees::distribution::LabelCounts;
use nalgebra::{DMatrix, DVector};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};

/// A labeled table of attribute values.
///
/// `x` holds one row per observation and one column per attribute; `y` holds the terminal
/// label of each row. Both always have the same number of rows, and every operation preserves
/// row order.
#[derive(Clone, PartialEq)]
pub struct Dataset<L: Label> {
    x: DMatrix<Value>,
    y: DVector<L>,
}

/// Hashable identity of a [`Value`] used to deduplicate candidate split values.
#[derive(PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Number(u64),
    Nominal(&'a str),
}

impl<'a> ValueKey<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Number(n) if n.is_nan() => None,
            // -0.0 and 0.0 compare equal, so they share a key.
            Value::Number(n) if *n == 0.0 => Some(ValueKey::Number(0)),
            Value::Number(n) => Some(ValueKey::Number(n.to_bits())),
            Value::Nominal(s) => Some(ValueKey::Nominal(s)),
        }
    }
}

impl<L: Label> Debug for Dataset<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    rows: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{}, ", self.x[(i, j)])?;
            }
            writeln!(f, "{:?}],", self.y[i])?;
        }

        write!(f, "    ]\n}}")
    }
}

impl<L: Label> Dataset<L> {
    /// Creates a dataset from an attribute matrix and a label vector.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::LengthMismatch`] if `y` does not hold exactly one label per row of `x`.
    pub fn new(x: DMatrix<Value>, y: DVector<L>) -> Result<Self, TreeError> {
        if x.nrows() != y.len() {
            return Err(TreeError::LengthMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Creates a dataset from `(attributes, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RaggedRow`] if a row's attribute count differs from the first row's.
    pub fn from_rows<I>(rows: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (Vec<Value>, L)>,
    {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        let mut ncols = None;

        for (row, (attributes, label)) in rows.into_iter().enumerate() {
            let expected = *ncols.get_or_insert(attributes.len());
            if attributes.len() != expected {
                return Err(TreeError::RaggedRow {
                    row,
                    expected,
                    found: attributes.len(),
                });
            }
            values.extend(attributes);
            labels.push(label);
        }

        let x = DMatrix::from_row_slice(labels.len(), ncols.unwrap_or(0), &values);
        Self::new(x, DVector::from_vec(labels))
    }

    /// The attribute matrix, one row per observation.
    pub fn x(&self) -> &DMatrix<Value> {
        &self.x
    }

    /// The label of each row.
    pub fn y(&self) -> &DVector<L> {
        &self.y
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn row(&self, index: usize) -> Vec<Value> {
        self.x.row(index).iter().cloned().collect()
    }

    pub fn label_counts(&self) -> LabelCounts<L> {
        LabelCounts::from_labels(self.y.iter())
    }

    /// Returns the distinct values of a column in the order they first appear.
    ///
    /// `NaN` is left out since it never matches any row.
    pub fn distinct_values(&self, column: usize) -> Vec<Value> {
        let mut seen = HashSet::new();
        self.x
            .column(column)
            .iter()
            .filter(|&value| ValueKey::of(value).is_some_and(|key| seen.insert(key)))
            .cloned()
            .collect()
    }

    /// Splits the rows into those whose `column` matches `value` and those that don't.
    ///
    /// Every row lands in exactly one half and keeps its relative order.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not a valid column index.
    pub fn partition(&self, column: usize, value: &Value) -> (Self, Self) {
        let (matching, non_matching): (Vec<usize>, Vec<usize>) =
            (0..self.nrows()).partition(|&index| self.x[(index, column)].matches(value));

        (self.select_rows(&matching), self.select_rows(&non_matching))
    }

    /// Label counts of the two halves [`partition`](Self::partition) would produce, without
    /// copying any rows.
    pub fn partition_counts(
        &self,
        column: usize,
        value: &Value,
    ) -> (LabelCounts<L>, LabelCounts<L>) {
        let mut matching = LabelCounts::new();
        let mut non_matching = LabelCounts::new();
        for (index, label) in self.y.iter().enumerate() {
            if self.x[(index, column)].matches(value) {
                matching.add(label.clone(), 1);
            } else {
                non_matching.add(label.clone(), 1);
            }
        }
        (matching, non_matching)
    }

    /// Shuffles the rows and splits them into a training and a test part.
    ///
    /// # Errors
    ///
    /// Returns an error if `train_size` is outside of `[0.0, 1.0]`.
    pub fn train_test_split(
        &self,
        train_size: f64,
        seed: Option<u64>,
    ) -> Result<(Self, Self), TreeError> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(TreeError::InvalidParameter(
                "Train size should be between 0.0 and 1.0".into(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        Ok((
            self.select_rows(train_indices),
            self.select_rows(test_indices),
        ))
    }

    fn select_rows(&self, indices: &[usize]) -> Self {
        let x = DMatrix::from_fn(indices.len(), self.ncols(), |row, col| {
            self.x[(indices[row], col)].clone()
        });
        let y = DVector::from_iterator(
            indices.len(),
            indices.iter().map(|&index| self.y[index].clone()),
        );
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_dataset() -> Dataset<String> {
        Dataset::from_rows(vec![
            (vec![Value::from("a"), Value::from(1)], "X".to_string()),
            (vec![Value::from("b"), Value::from(2)], "Y".to_string()),
            (vec![Value::from("a"), Value::from(3)], "X".to_string()),
            (vec![Value::from("c"), Value::from(4)], "Z".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn test_dataset_from_rows() {
        let dataset = sample_dataset();
        assert_eq!(dataset.nrows(), 4);
        assert_eq!(dataset.ncols(), 2);
        assert_eq!(dataset.row(1), vec![Value::from("b"), Value::from(2)]);
        assert_eq!(dataset.y[3], "Z");
    }

    #[test]
    fn test_dataset_from_ragged_rows() {
        let result = Dataset::from_rows(vec![
            (vec![Value::from("a"), Value::from(1)], 0),
            (vec![Value::from("b")], 1),
        ]);
        assert_eq!(
            result.unwrap_err(),
            TreeError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_dataset_is_not_empty() {
        assert!(sample_dataset().is_not_empty());

        let empty = Dataset::<u8>::from_rows(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.nrows(), 0);
    }

    #[test]
    fn test_dataset_formatting() {
        let dataset = Dataset::from_rows(vec![
            (vec![Value::from("a"), Value::from(1)], 5),
            (vec![Value::from("b"), Value::from(2)], 6),
        ])
        .unwrap();

        let expected_str = "\
Dataset {
    rows: [
        [a, 1, 5],
        [b, 2, 6],
    ]
}";

        assert_eq!(format!("{:?}", dataset), expected_str);
    }

    #[test]
    fn test_distinct_values_keep_first_seen_order() {
        let dataset = sample_dataset();
        assert_eq!(
            dataset.distinct_values(0),
            vec![Value::from("a"), Value::from("b"), Value::from("c")]
        );
        assert_eq!(dataset.distinct_values(1).len(), 4);
    }

    #[test]
    fn test_dataset_new_rejects_mismatched_labels() {
        let result = Dataset::new(
            DMatrix::from_element(3, 1, Value::from(1)),
            DVector::from_vec(vec![0u8, 1]),
        );
        assert_eq!(
            result,
            Err(TreeError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );

        let dataset = Dataset::new(
            DMatrix::from_element(2, 1, Value::from(1)),
            DVector::from_vec(vec![0u8, 1]),
        )
        .unwrap();
        assert_eq!(dataset.x().nrows(), dataset.y().len());
    }

    #[test]
    fn test_distinct_values_skip_nan_and_merge_signed_zero() {
        let dataset = Dataset::from_rows(vec![
            (vec![Value::from(f64::NAN)], 0),
            (vec![Value::from(-0.0)], 1),
            (vec![Value::from(f64::NAN)], 2),
            (vec![Value::from(0.0)], 3),
            (vec![Value::from("0")], 4),
        ])
        .unwrap();

        assert_eq!(
            dataset.distinct_values(0),
            vec![Value::from(-0.0), Value::from("0")]
        );
    }

    #[test]
    fn test_partition_counts_match_partition() {
        let dataset = sample_dataset();
        for value in [Value::from("a"), Value::from(2), Value::from("z")] {
            let column = if value.is_numeric() { 1 } else { 0 };
            let (matching, non_matching) = dataset.partition(column, &value);
            assert_eq!(
                dataset.partition_counts(column, &value),
                (matching.label_counts(), non_matching.label_counts())
            );
        }
    }

    #[test]
    fn test_partition_nominal() {
        let (matching, non_matching) = sample_dataset().partition(0, &Value::from("a"));
        assert_eq!(matching.nrows(), 2);
        assert_eq!(non_matching.nrows(), 2);
        assert!(matching.y.iter().all(|label| label == "X"));
        assert_eq!(non_matching.y.as_slice(), &["Y".to_string(), "Z".to_string()]);
    }

    #[test]
    fn test_partition_numeric() {
        let (matching, non_matching) = sample_dataset().partition(1, &Value::from(3));
        assert_eq!(matching.row(0), vec![Value::from("a"), Value::from(3)]);
        assert_eq!(matching.row(1), vec![Value::from("c"), Value::from(4)]);
        assert_eq!(non_matching.nrows(), 2);
    }

    #[test]
    fn test_partition_by_candidate_kind_not_column_kind() {
        let dataset = Dataset::from_rows(vec![
            (vec![Value::from(10)], 0),
            (vec![Value::from("10")], 1),
            (vec![Value::from(5)], 2),
        ])
        .unwrap();

        let (matching, _) = dataset.partition(0, &Value::from(10));
        assert_eq!(matching.y.as_slice(), &[0]);

        let (matching, _) = dataset.partition(0, &Value::from("10"));
        assert_eq!(matching.y.as_slice(), &[1]);
    }

    #[test]
    fn test_partition_everything_matches() {
        let (matching, non_matching) = sample_dataset().partition(1, &Value::from(0));
        assert_eq!(matching.nrows(), 4);
        assert!(non_matching.is_empty());
        assert_eq!(non_matching.ncols(), 2);
    }

    #[test]
    fn test_dataset_train_test_split() {
        let (train, test) = sample_dataset().train_test_split(0.75, Some(7)).unwrap();
        assert_eq!(train.nrows(), 3);
        assert_eq!(test.nrows(), 1);
    }

    #[test]
    fn test_dataset_train_test_split_invalid_size() {
        assert!(sample_dataset().train_test_split(1.5, None).is_err());
    }

    proptest! {
        #[test]
        fn partition_is_an_order_preserving_bipartition(
            values in proptest::collection::vec(0i32..6, 0..40),
            threshold in 0i32..6,
        ) {
            let dataset = Dataset::from_rows(
                values.iter().enumerate().map(|(index, &value)| (vec![Value::from(value)], index)),
            )
            .unwrap();

            let (matching, non_matching) = dataset.partition(0, &Value::from(threshold));
            prop_assert_eq!(matching.nrows() + non_matching.nrows(), dataset.nrows());

            let mut seen: Vec<usize> = matching.y.iter().chain(non_matching.y.iter()).cloned().collect();
            prop_assert!(matching.y.as_slice().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(non_matching.y.as_slice().windows(2).all(|w| w[0] < w[1]));
            seen.sort();
            prop_assert_eq!(seen, (0..dataset.nrows()).collect::<Vec<_>>());
            prop_assert!(matching.y.iter().all(|&index| values[index] >= threshold));
            prop_assert!(non_matching.y.iter().all(|&index| values[index] < threshold));
        }
    }
}
