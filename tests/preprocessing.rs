//! Integration tests for the preprocessing module (Scaler, scale_split).

use ndarray::{Array1, Array2};

use apb_classifiers::data_handling::{Dataset, SplitDatasets, VerseMetadata};
use apb_classifiers::error::DataError;
use apb_classifiers::preprocessing::{fit_scaler, scale_split, transform_all};

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("f{}", i + 1)).collect()
}

fn make_dataset(rows: usize, cols: usize, data: Vec<f64>, labels: Vec<i32>) -> Dataset {
    let x = Array2::from_shape_vec((rows, cols), data).unwrap();
    let y = Array1::from_vec(labels);
    let metadata = VerseMetadata {
        verse_id: (0..rows).map(|i| format!("verse_{}", i)).collect(),
        doc_id: (0..rows).map(|i| format!("doc_{}", i)).collect(),
        feature_names: names(cols),
    };
    Dataset::new(x, y, metadata).unwrap()
}

// ---------------------------------------------------------------------------
// Scaler fit / transform
// ---------------------------------------------------------------------------

#[test]
fn fit_scaler_computes_mean_and_sample_std() {
    let x = Array2::from_shape_vec(
        (4, 2),
        vec![
            1.0, 10.0,
            2.0, 20.0,
            3.0, 30.0,
            4.0, 40.0,
        ],
    )
    .unwrap();

    let sc = fit_scaler(&x, &names(2)).unwrap();
    assert_eq!(sc.mean.len(), 2);
    assert!((sc.mean[0] - 2.5).abs() < 1e-12, "mean[0] = {}", sc.mean[0]);
    assert!((sc.mean[1] - 25.0).abs() < 1e-12, "mean[1] = {}", sc.mean[1]);

    // Sample standard deviation uses the n-1 denominator.
    let expected = (5.0f64 / 3.0).sqrt();
    assert!(
        (sc.std[0] - expected).abs() < 1e-12,
        "std[0] = {}",
        sc.std[0]
    );
    assert!(
        (sc.std[1] - 10.0 * expected).abs() < 1e-10,
        "std[1] = {}",
        sc.std[1]
    );
}

#[test]
fn transform_standardizes_training_data() {
    let x = Array2::from_shape_vec(
        (5, 2),
        vec![
            1.0, 100.0,
            2.0, 250.0,
            3.0, 300.0,
            4.0, 420.0,
            5.0, 530.0,
        ],
    )
    .unwrap();

    let sc = fit_scaler(&x, &names(2)).unwrap();
    let t = transform_all(&x, &sc);

    for c in 0..2 {
        let col_mean: f64 = (0..5).map(|r| t[(r, c)]).sum::<f64>() / 5.0;
        assert!(
            col_mean.abs() < 1e-10,
            "col {} mean after transform = {}",
            c,
            col_mean
        );

        let var: f64 = (0..5).map(|r| (t[(r, c)] - col_mean).powi(2)).sum::<f64>() / 4.0;
        assert!(
            (var - 1.0).abs() < 1e-10,
            "col {} sample variance after transform = {}",
            c,
            var
        );
    }
}

#[test]
fn zero_variance_feature_fails_fast() {
    let x = Array2::from_shape_vec(
        (4, 2),
        vec![
            1.0, 7.0,
            2.0, 7.0,
            3.0, 7.0,
            4.0, 7.0,
        ],
    )
    .unwrap();

    let err = fit_scaler(&x, &names(2)).unwrap_err();
    assert_eq!(err, DataError::DegenerateFeature("f2".to_string()));
}

#[test]
fn single_row_rejected() {
    let x = Array2::from_shape_vec((1, 2), vec![1.0, 2.0]).unwrap();
    let err = fit_scaler(&x, &names(2)).unwrap_err();
    assert_eq!(err, DataError::NotEnoughRows(1));
}

// ---------------------------------------------------------------------------
// scale_split: training statistics only
// ---------------------------------------------------------------------------

#[test]
fn scale_split_ignores_testing_statistics() {
    let train = make_dataset(
        4,
        1,
        vec![1.0, 2.0, 3.0, 4.0],
        vec![1, 1, -1, -1],
    );
    let test_a = make_dataset(2, 1, vec![10.0, 20.0], vec![1, -1]);
    let test_b = make_dataset(2, 1, vec![-500.0, 900.0], vec![1, -1]);

    let scaled_a = scale_split(&SplitDatasets::new(train.clone(), test_a).unwrap()).unwrap();
    let scaled_b = scale_split(&SplitDatasets::new(train.clone(), test_b).unwrap()).unwrap();

    // Radically different testing data must not move the training transform.
    for r in 0..4 {
        assert_eq!(
            scaled_a.training().x[(r, 0)],
            scaled_b.training().x[(r, 0)],
            "row {} of the scaled training set changed with the testing set",
            r
        );
    }

    // The testing transform uses the training mean (2.5) and sample std.
    let std = (5.0f64 / 3.0).sqrt();
    assert!((scaled_a.testing().x[(0, 0)] - (10.0 - 2.5) / std).abs() < 1e-10);
    assert!((scaled_a.testing().x[(1, 0)] - (20.0 - 2.5) / std).abs() < 1e-10);
}

#[test]
fn scale_split_preserves_labels_and_metadata() {
    let train = make_dataset(4, 2, vec![1.0, 5.0, 2.0, 6.0, 3.0, 7.0, 4.0, 9.0], vec![1, 1, -1, -1]);
    let test = make_dataset(2, 2, vec![1.5, 5.5, 3.5, 8.0], vec![-1, 1]);
    let data = SplitDatasets::new(train.clone(), test.clone()).unwrap();

    let scaled = scale_split(&data).unwrap();
    assert_eq!(scaled.training().y, train.y);
    assert_eq!(scaled.testing().y, test.y);
    assert_eq!(scaled.training().metadata, train.metadata);
    assert_eq!(scaled.testing().metadata, test.metadata);
}
