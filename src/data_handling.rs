//! Data structures for quotation/noise datasets.
//!
//! This module defines `VerseMetadata`, `Dataset`, and `SplitDatasets` and
//! contains the row/column selection helpers shared by the scaler, the model
//! trainer, and the evaluator. Labels use the crate convention of `1` for a
//! genuine quotation and `-1` for noise.
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Label value for the positive class (a genuine quotation).
pub const LABEL_QUOTATION: i32 = 1;
/// Label value for the negative class (incidental noise).
pub const LABEL_NOISE: i32 = -1;

/// Which pre-split dataset an operation should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Training,
    Testing,
}

/// Row-aligned identifiers carried alongside the feature matrix.
///
/// The verse and document ids are projected out of the modeling features at
/// load time but kept here so predictions can be traced back to their rows.
#[derive(Debug, Clone, PartialEq)]
pub struct VerseMetadata {
    pub verse_id: Vec<String>,
    pub doc_id: Vec<String>,
    /// Feature names, in feature-matrix column order.
    pub feature_names: Vec<String>,
}

impl VerseMetadata {
    pub fn filter_by_indices(&self, indices: &[usize]) -> VerseMetadata {
        VerseMetadata {
            verse_id: indices.iter().map(|&i| self.verse_id[i].clone()).collect(),
            doc_id: indices.iter().map(|&i| self.doc_id[i].clone()).collect(),
            feature_names: self.feature_names.clone(),
        }
    }
}

/// One split of the input data: a feature matrix, its labels, and the
/// row-aligned identifiers.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array1<i32>,
    pub metadata: VerseMetadata,
}

impl Dataset {
    /// Build a dataset, validating that every row-aligned field agrees on
    /// length and that the metadata names one feature per matrix column.
    pub fn new(x: Array2<f64>, y: Array1<i32>, metadata: VerseMetadata) -> Result<Self, DataError> {
        let n_rows = x.nrows();
        if y.len() != n_rows {
            return Err(DataError::LengthMismatch {
                expected: n_rows,
                actual: y.len(),
            });
        }
        if metadata.verse_id.len() != n_rows {
            return Err(DataError::LengthMismatch {
                expected: n_rows,
                actual: metadata.verse_id.len(),
            });
        }
        if metadata.doc_id.len() != n_rows {
            return Err(DataError::LengthMismatch {
                expected: n_rows,
                actual: metadata.doc_id.len(),
            });
        }
        if metadata.feature_names.len() != x.ncols() {
            return Err(DataError::LengthMismatch {
                expected: x.ncols(),
                actual: metadata.feature_names.len(),
            });
        }
        Ok(Dataset { x, y, metadata })
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn quotation_count(&self) -> usize {
        self.y.iter().filter(|&&v| v == LABEL_QUOTATION).count()
    }

    pub fn noise_count(&self) -> usize {
        self.y.iter().filter(|&&v| v == LABEL_NOISE).count()
    }

    pub fn log_summary(&self, name: &str) {
        log::info!(
            "{}: {} quotation rows, {} noise rows, {} feature columns",
            name,
            self.quotation_count(),
            self.noise_count(),
            self.n_features()
        );
    }

    /// Project the feature matrix down to the named columns, in the given
    /// order. The label column and identifiers are untouched.
    pub fn select_features(&self, names: &[&str]) -> Result<Dataset, DataError> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .metadata
                .feature_names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
            indices.push(idx);
        }

        let mut data = Vec::with_capacity(self.n_rows() * indices.len());
        for row in 0..self.n_rows() {
            for &col in &indices {
                data.push(self.x[(row, col)]);
            }
        }
        let x = Array2::from_shape_vec((self.n_rows(), indices.len()), data)
            .expect("select_features: shape mismatch");

        Ok(Dataset {
            x,
            y: self.y.clone(),
            metadata: VerseMetadata {
                verse_id: self.metadata.verse_id.clone(),
                doc_id: self.metadata.doc_id.clone(),
                feature_names: names.iter().map(|n| n.to_string()).collect(),
            },
        })
    }

    /// Reorder or subset rows by index. Out-of-range indices panic, matching
    /// the underlying matrix indexing.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        let mut data = Vec::with_capacity(indices.len() * self.n_features());
        for &row in indices {
            for col in 0..self.n_features() {
                data.push(self.x[(row, col)]);
            }
        }
        let x = Array2::from_shape_vec((indices.len(), self.n_features()), data)
            .expect("select_rows: shape mismatch");
        let y = indices.iter().map(|&i| self.y[i]).collect::<Array1<i32>>();

        Dataset {
            x,
            y,
            metadata: self.metadata.filter_by_indices(indices),
        }
    }
}

/// The pre-split training and testing datasets, held together so the
/// schema-match invariant is checked once at construction.
#[derive(Debug, Clone)]
pub struct SplitDatasets {
    training: Dataset,
    testing: Dataset,
}

impl SplitDatasets {
    /// Pair the two splits. Fails if they declare different feature columns;
    /// the loader guarantees types, so name agreement is the schema check.
    pub fn new(training: Dataset, testing: Dataset) -> Result<Self, DataError> {
        if training.metadata.feature_names != testing.metadata.feature_names {
            return Err(DataError::SchemaMismatch);
        }
        Ok(SplitDatasets { training, testing })
    }

    pub fn training(&self) -> &Dataset {
        &self.training
    }

    pub fn testing(&self) -> &Dataset {
        &self.testing
    }

    /// Borrow the split an operation was asked to read.
    pub fn select(&self, split: Split) -> &Dataset {
        match split {
            Split::Training => &self.training,
            Split::Testing => &self.testing,
        }
    }

    /// Apply the same feature projection to both splits.
    pub fn select_features(&self, names: &[&str]) -> Result<SplitDatasets, DataError> {
        Ok(SplitDatasets {
            training: self.training.select_features(names)?,
            testing: self.testing.select_features(names)?,
        })
    }
}
