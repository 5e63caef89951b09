use std::cmp::Ordering;

use anyhow::{anyhow, Result};
use ndarray::Array2;
use rayon::prelude::*;

use crate::config::{ModelConfig, ModelType};
use crate::data_handling::{LABEL_NOISE, LABEL_QUOTATION};
use crate::models::classifier_trait::ClassifierModel;

/// k-nearest-neighbor classifier over standardized features.
///
/// Prediction is a majority vote among the `neighbors` closest training rows
/// by Euclidean distance; the quotation probability is the fraction of
/// quotation neighbors. Expects standardized inputs, otherwise large-scale
/// features dominate the distance.
pub struct KnnClassifier {
    params: ModelConfig,
    train_x: Option<Array2<f64>>,
    train_y: Vec<i32>,
}

impl KnnClassifier {
    pub fn new(params: ModelConfig) -> Self {
        KnnClassifier {
            params,
            train_x: None,
            train_y: Vec::new(),
        }
    }

    /// Squared Euclidean distance; ranking only, so the square root is
    /// never taken.
    fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }
}

impl ClassifierModel for KnnClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        let ModelType::Knn { neighbors } = self.params.model_type else {
            return Err(anyhow!(
                "Expected Knn params, got {:?}",
                self.params.model_type
            ));
        };
        if neighbors == 0 {
            return Err(anyhow!("neighbors must be at least 1"));
        }
        if x.nrows() == 0 {
            return Err(anyhow!("cannot fit k-NN on an empty training set"));
        }
        if y.len() != x.nrows() {
            return Err(anyhow!(
                "Labels length {} does not match number of rows {}",
                y.len(),
                x.nrows()
            ));
        }

        self.train_x = Some(x.to_owned());
        self.train_y = y.to_vec();
        log::debug!(
            "Stored {} training rows for k-NN (neighbors={})",
            x.nrows(),
            neighbors
        );
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        let probs = self.predict_proba(x)?;
        Ok(probs
            .iter()
            .map(|&p| if p >= 0.5 { LABEL_QUOTATION } else { LABEL_NOISE })
            .collect())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let ModelType::Knn { neighbors } = self.params.model_type else {
            return Err(anyhow!(
                "Expected Knn params, got {:?}",
                self.params.model_type
            ));
        };
        let train_x = self
            .train_x
            .as_ref()
            .ok_or_else(|| anyhow!("k-NN model has not been fitted"))?;
        let k = neighbors.min(train_x.nrows());

        let probs = (0..x.nrows())
            .into_par_iter()
            .map(|row| {
                let query = x.row(row);
                let query = query.as_slice().expect("row view is contiguous");
                // (distance, training index) pairs; index breaks distance
                // ties deterministically
                let mut candidates: Vec<(f64, usize)> = (0..train_x.nrows())
                    .map(|t| {
                        let train_row = train_x.row(t);
                        let train_row = train_row.as_slice().expect("row view is contiguous");
                        (Self::squared_distance(query, train_row), t)
                    })
                    .collect();
                candidates.sort_unstable_by(|a, b| {
                    a.0.partial_cmp(&b.0)
                        .unwrap_or(Ordering::Equal)
                        .then(a.1.cmp(&b.1))
                });

                let positive = candidates[..k]
                    .iter()
                    .filter(|(_, idx)| self.train_y[*idx] == LABEL_QUOTATION)
                    .count();
                positive as f64 / k as f64
            })
            .collect();

        Ok(probs)
    }

    fn name(&self) -> &str {
        "knn"
    }
}
