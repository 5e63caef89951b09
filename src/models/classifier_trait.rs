use anyhow::Result;
use ndarray::Array2;

/// A small trait abstraction over the interchangeable model families. The
/// contract is centralized here so implementations can live next to model
/// code and new families can be added without touching the evaluator.
pub trait ClassifierModel {
    /// Fit the model. `y` uses the crate convention (1 for quotation, -1 for
    /// noise); rows of `x` are standardized feature vectors.
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()>;

    /// Predict class labels (1 for quotation, -1 for noise).
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>>;

    /// Predict the probability of the quotation class, in [0, 1].
    /// Implementations that only produce margins convert appropriately.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>>;

    /// Human readable name for the model family.
    fn name(&self) -> &str {
        "classifier"
    }
}
