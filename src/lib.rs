//! # Rusty-trees
//!
//! `rusty-trees` builds binary classification trees from labeled rows of numeric and nominal
//! attributes, classifies new observations (including ones with missing attributes) and prunes
//! fitted trees to counter overfitting.
//!
//! ## Getting Started
//!
//! To use `rusty-trees`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-trees = "*"
//! ```
//!
//! ## Example Usage
//!
//! Here's how you can fit a tree, classify an observation with a missing attribute and prune
//! the tree afterwards:
//!
//! ```rust
//! use rusty_trees::data::dataset::Dataset;
//! use rusty_trees::data::value::Value;
//! use rusty_trees::trees::{Criterion, DecisionTreeClassifier};
//!
//! let dataset = Dataset::from_rows(vec![
//!     (vec![Value::from("a"), Value::from(1)], "X".to_string()),
//!     (vec![Value::from("a"), Value::from(2)], "X".to_string()),
//!     (vec![Value::from("b"), Value::from(1)], "Y".to_string()),
//!     (vec![Value::from("b"), Value::from(2)], "Y".to_string()),
//! ])
//! .unwrap();
//!
//! let mut model = DecisionTreeClassifier::with_params(Some(Criterion::Entropy), None, None).unwrap();
//! model.fit(&dataset).unwrap();
//!
//! let distribution = model.classify(&[None, Some(Value::from(2))]).unwrap();
//! assert_eq!(distribution.get(&"X".to_string()), 1.0);
//!
//! model.prune(0.5).unwrap();
//! ```

/// Dataset and attribute values
pub mod data;
/// Error type shared by the crate
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
