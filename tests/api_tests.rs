mod test_utils;

use lloyd_kmeans::{
    Dataset, FitState, InitMethod, KMeansClustering, KMeansConfig, KMeansError,
};
use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_utils::*;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = KMeansConfig::new(3, InitMethod::Random);
    assert_eq!(config.n_clusters, 3);
    assert_eq!(config.max_iter, 300);
    assert!((config.tolerance - 1e-3).abs() < f32::EPSILON);
    assert!(!config.early_stop);
    assert_eq!(config.seed, None);
}

#[test]
fn test_from_method_name() {
    let clf = KMeansClustering::from_method_name(2, "kmeans++").unwrap();
    assert_eq!(clf.config().init, InitMethod::KMeansPlusPlus);
    assert_eq!(clf.state(), FitState::Uninitialized);

    let err = KMeansClustering::from_method_name(2, "farthest").err().unwrap();
    assert!(matches!(err, KMeansError::UnknownInitMethod(ref name) if name == "farthest"));
    assert!(err.to_string().contains("farthest"));
}

// ============================================================================
// Fit Contract
// ============================================================================

#[test]
fn test_fit_on_flat_buffer() {
    let x = [0.0, 0.0, 5.0, 0.0, 0.0, 5.0];
    let config = KMeansConfig::new(2, InitMethod::KMeansPlusPlus).with_max_iter(0);
    let mut clf = KMeansClustering::new(config);

    clf.fit(&x, 3, 2).unwrap();

    assert_eq!(clf.state(), FitState::Done);
    assert_eq!(clf.centroid_buffer().unwrap(), &[0.0, 0.0, 5.0, 0.0]);
}

#[test]
fn test_centroid_shape_is_k_by_dims() {
    let data = create_deterministic_dataset(50, 7, 4);
    let config = KMeansConfig::new(6, InitMethod::Random)
        .with_max_iter(5)
        .with_seed(1);
    let mut clf = KMeansClustering::new(config);
    clf.fit(data.as_slice(), 50, 7).unwrap();

    assert_eq!(clf.centroids().unwrap().dim(), (6, 7));
    assert_eq!(clf.centroid_buffer().unwrap().len(), 42);
}

#[test]
fn test_centroids_unavailable_before_fit() {
    let clf = KMeansClustering::new(KMeansConfig::new(2, InitMethod::Random));
    let data = two_column_square();

    assert!(matches!(clf.centroids(), Err(KMeansError::NotFitted)));
    assert!(matches!(clf.centroid_buffer(), Err(KMeansError::NotFitted)));
    assert!(matches!(clf.predict(&data), Err(KMeansError::NotFitted)));
    assert!(matches!(clf.inertia(&data), Err(KMeansError::NotFitted)));
}

#[test]
fn test_predict_and_inertia_after_fit() {
    let data = two_column_square();
    let mut clf = KMeansClustering::new(KMeansConfig::new(2, InitMethod::Random).with_max_iter(3));
    clf.fit_with_centroids(&data, array![[0.0, 0.0], [10.0, 0.0]])
        .unwrap();

    let query = dataset(&[&[1.0, 1.0], &[9.0, -3.0]]);
    assert_eq!(clf.predict(&query).unwrap().to_vec(), vec![0, 1]);
    // Four points, each 0.5 from its centroid.
    assert!((clf.inertia(&data).unwrap() - 1.0).abs() < 1e-6);

    let wrong_dims = dataset(&[&[1.0, 1.0, 1.0]]);
    assert!(matches!(
        clf.predict(&wrong_dims),
        Err(KMeansError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_refit_replaces_centroids() {
    let data = two_column_square();
    let mut clf = KMeansClustering::new(KMeansConfig::new(2, InitMethod::Random).with_max_iter(0));
    clf.fit_with_centroids(&data, array![[1.0, 1.0], [2.0, 2.0]])
        .unwrap();
    clf.fit_with_centroids(&data, array![[3.0, 3.0], [4.0, 4.0]])
        .unwrap();
    assert_rows_close(clf.centroids().unwrap(), &[&[3.0, 3.0], &[4.0, 4.0]], 0.0);
}

// ============================================================================
// Input Validation
// ============================================================================

#[test]
fn test_zero_clusters_rejected() {
    let mut clf = KMeansClustering::new(KMeansConfig::new(0, InitMethod::Random));
    let err = clf.fit(&[1.0, 2.0], 1, 2).unwrap_err();
    assert!(matches!(err, KMeansError::InvalidConfig(_)));
    assert_eq!(clf.state(), FitState::Uninitialized);
}

#[test]
fn test_more_clusters_than_points_rejected() {
    let mut clf = KMeansClustering::new(KMeansConfig::new(5, InitMethod::KMeansPlusPlus));
    let err = clf
        .fit_dataset(&two_column_square(), &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, KMeansError::InvalidConfig(_)));
    assert!(matches!(clf.centroids(), Err(KMeansError::NotFitted)));
}

#[test]
fn test_empty_dataset_rejected() {
    let mut clf = KMeansClustering::new(KMeansConfig::new(1, InitMethod::Random));
    assert!(matches!(
        clf.fit(&[], 0, 2),
        Err(KMeansError::InvalidInput(_))
    ));
    assert!(matches!(
        clf.fit(&[], 2, 0),
        Err(KMeansError::InvalidInput(_))
    ));
}

#[test]
fn test_buffer_length_must_match_shape() {
    let mut clf = KMeansClustering::new(KMeansConfig::new(1, InitMethod::Random));
    let err = clf.fit(&[1.0, 2.0, 3.0], 2, 2).unwrap_err();
    assert!(matches!(err, KMeansError::ShapeMismatch { .. }));
}

#[test]
fn test_invalid_tolerance_rejected() {
    let config = KMeansConfig::new(1, InitMethod::Random).with_tolerance(f32::NAN);
    let mut clf = KMeansClustering::new(config);
    let err = clf.fit(&[1.0], 1, 1).unwrap_err();
    assert!(matches!(err, KMeansError::InvalidConfig(_)));
}

#[test]
fn test_initial_centroid_shape_checked() {
    let data = two_column_square();
    let mut clf = KMeansClustering::new(KMeansConfig::new(2, InitMethod::Random));
    let err = clf
        .fit_with_centroids(&data, array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]])
        .unwrap_err();
    assert!(matches!(err, KMeansError::ShapeMismatch { .. }));
}

#[test]
fn test_single_cluster_is_global_mean() {
    let data = Dataset::from_flat((0..60).map(|x| x as f32).collect(), 20, 3).unwrap();
    let mut clf = KMeansClustering::new(KMeansConfig::new(1, InitMethod::KMeansPlusPlus).with_max_iter(3));
    clf.fit_dataset(&data, &mut StdRng::seed_from_u64(0)).unwrap();

    assert!(clf.predict(&data).unwrap().iter().all(|&l| l == 0));
    assert_rows_close(clf.centroids().unwrap(), &[&[28.5, 29.5, 30.5]], 1e-4);
}
