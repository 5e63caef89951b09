use anyhow::{anyhow, Context, Result};
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;

/// L2-regularized logistic regression classifier.
///
/// Labels are passed through as 1 / -1; linfa treats the greater label as the
/// positive class, so `predict_proba` is the probability of a quotation.
pub struct LogisticClassifier {
    model: Option<FittedLogisticRegression<f64, i32>>,
    params: ModelConfig,
}

impl LogisticClassifier {
    pub fn new(params: ModelConfig) -> Self {
        LogisticClassifier {
            model: None,
            params,
        }
    }

    fn fitted(&self) -> Result<&FittedLogisticRegression<f64, i32>> {
        self.model
            .as_ref()
            .ok_or_else(|| anyhow!("logistic regression model has not been fitted"))
    }
}

impl ClassifierModel for LogisticClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        let ModelType::LogisticRegression {
            penalty,
            max_iterations,
        } = self.params.model_type
        else {
            return Err(anyhow!(
                "Expected LogisticRegression params, got {:?}",
                self.params.model_type
            ));
        };

        let targets = Array1::from_vec(y.to_vec());
        let dataset = Dataset::new(x.to_owned(), targets);

        let fitted = LogisticRegression::default()
            .alpha(penalty)
            .max_iterations(max_iterations)
            .fit(&dataset)
            .context("Failed to fit logistic regression")?;

        log::debug!(
            "Fitted logistic regression on {} rows (alpha={}, max_iterations={})",
            x.nrows(),
            penalty,
            max_iterations
        );
        self.model = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        let labels: Array1<i32> = self.fitted()?.predict(x);
        Ok(labels.to_vec())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let probs = self.fitted()?.predict_probabilities(x);
        Ok(probs.to_vec())
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
