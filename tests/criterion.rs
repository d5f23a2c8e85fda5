use approx::assert_abs_diff_eq;
use hoeffding_tree::criterion::{FitnessFunction, GiniImpurity, InformationGain};
use ndarray::{array, Array2};

#[test]
fn test_gini_impurity() {
    let gini = GiniImpurity;

    // Perfect separation removes all impurity
    assert_abs_diff_eq!(gini.evaluate(array![[5, 0], [0, 5]].view()), 0.5);
    // Uninformative split
    assert_abs_diff_eq!(gini.evaluate(array![[2, 2], [3, 3]].view()), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(gini.impurity(&[1, 1, 2], 4), 0.625);

    assert_abs_diff_eq!(gini.range(2), 0.5);
    assert_abs_diff_eq!(gini.range(4), 0.75);
}

#[test]
fn test_information_gain() {
    let info = InformationGain;

    assert_abs_diff_eq!(info.evaluate(array![[4, 0], [0, 4]].view()), 1.0);
    assert_abs_diff_eq!(
        info.evaluate(array![[2, 0, 0], [0, 2, 0], [0, 0, 2]].view()),
        3f64.log2(),
        epsilon = 1e-12
    );

    assert_abs_diff_eq!(info.range(2), 1.0);
    assert_abs_diff_eq!(info.range(4), 2.0);
    assert_eq!(info.range(1), 0.0);
}

#[test]
fn test_degenerate_tables_score_zero() {
    for table in [
        Array2::<usize>::zeros((2, 2)),
        array![[3, 7]],
        array![[4, 4], [0, 0]],
    ] {
        let gini = GiniImpurity.evaluate(table.view());
        let info = InformationGain.evaluate(table.view());
        assert!(!gini.is_nan() && !info.is_nan());
        assert_abs_diff_eq!(gini, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(info, 0.0, epsilon = 1e-12);
    }
}
