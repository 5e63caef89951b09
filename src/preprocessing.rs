//! Feature standardization fitted on training data only.
//!
//! Provides a `Scaler` holding per-column mean and sample standard deviation,
//! plus a convenience helper that scales a train/test pair without ever
//! reading testing-set statistics. Zero-variance features abort the fit: a
//! silently unscaled column would distort the distance-based models.

use ndarray::Array2;

use crate::data_handling::{Dataset, SplitDatasets};
use crate::error::DataError;

/// Per-column standardization parameters (mean, sample standard deviation).
///
/// Immutable once fitted; apply the same instance to every split.
#[derive(Clone, Debug, PartialEq)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Standard deviations at or below this are treated as zero variance.
    const MIN_STD: f64 = 1e-12;
}

/// Fit a `Scaler` from a feature matrix where rows are samples and columns
/// are features. `feature_names` is used for error context and must name one
/// column per matrix column.
///
/// Requires at least two rows (the sample standard deviation uses an n-1
/// denominator) and nonzero variance in every column.
pub fn fit_scaler(x: &Array2<f64>, feature_names: &[String]) -> Result<Scaler, DataError> {
    let (nrows, ncols) = (x.nrows(), x.ncols());
    if nrows < 2 {
        return Err(DataError::NotEnoughRows(nrows));
    }
    if feature_names.len() != ncols {
        return Err(DataError::LengthMismatch {
            expected: ncols,
            actual: feature_names.len(),
        });
    }

    let mut mean = vec![0.0f64; ncols];
    for r in 0..nrows {
        for c in 0..ncols {
            mean[c] += x[(r, c)];
        }
    }
    for v in mean.iter_mut() {
        *v /= nrows as f64;
    }

    let mut std = vec![0.0f64; ncols];
    for r in 0..nrows {
        for c in 0..ncols {
            let d = x[(r, c)] - mean[c];
            std[c] += d * d;
        }
    }
    for (c, v) in std.iter_mut().enumerate() {
        *v = (*v / (nrows as f64 - 1.0)).sqrt();
        if *v <= Scaler::MIN_STD {
            return Err(DataError::DegenerateFeature(feature_names[c].clone()));
        }
    }

    Ok(Scaler { mean, std })
}

/// Transform every cell with `(raw - mean) / std` and return a new matrix.
pub fn transform_all(x: &Array2<f64>, sc: &Scaler) -> Array2<f64> {
    let (nrows, ncols) = (x.nrows(), x.ncols());
    let mut out = Vec::with_capacity(nrows * ncols);

    for r in 0..nrows {
        for c in 0..ncols {
            out.push((x[(r, c)] - sc.mean[c]) / sc.std[c]);
        }
    }

    Array2::from_shape_vec((nrows, ncols), out).expect("transform_all: shape mismatch")
}

/// Fit a scaler on the training split and apply it to both splits.
///
/// Labels and identifiers pass through untouched. The testing split never
/// contributes to the fitted parameters.
pub fn scale_split(data: &SplitDatasets) -> Result<SplitDatasets, DataError> {
    let train = data.training();
    let scaler = fit_scaler(&train.x, &train.metadata.feature_names)?;
    log::debug!(
        "Fitted scaler on {} training rows across {} features",
        train.n_rows(),
        train.n_features()
    );

    let scaled_train = Dataset::new(
        transform_all(&train.x, &scaler),
        train.y.clone(),
        train.metadata.clone(),
    )?;
    let test = data.testing();
    let scaled_test = Dataset::new(
        transform_all(&test.x, &scaler),
        test.y.clone(),
        test.metadata.clone(),
    )?;

    SplitDatasets::new(scaled_train, scaled_test)
}
