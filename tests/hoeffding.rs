use hoeffding_tree::config::HoeffdingTreeSettings;
use hoeffding_tree::hoeffding::{hoeffding_bound, HoeffdingTest, SplitDecision};

#[test]
fn test_decision_defers_below_min_samples() {
    let test = HoeffdingTest::new(0.05, 100, 5000);
    // Even a perfect separation waits for min_samples
    assert_eq!(test.decide(0.5, 0.0, 99, 0.5), SplitDecision::Defer);
    assert_eq!(
        test.decide(0.5, 0.0, 100, 0.5),
        SplitDecision::Split { forced: false }
    );
}

#[test]
fn test_decision_requires_margin_over_epsilon() {
    let test = HoeffdingTest::new(0.05, 10, 5000);
    let n = 200;
    let epsilon = hoeffding_bound(0.5, 0.05, n);

    assert_eq!(
        test.decide(0.30, 0.30 - epsilon * 0.9, n, 0.5),
        SplitDecision::Defer
    );
    assert_eq!(
        test.decide(0.30, 0.30 - epsilon * 1.1, n, 0.5),
        SplitDecision::Split { forced: false }
    );
}

#[test]
fn test_decision_forces_split_at_max_samples() {
    let test = HoeffdingTest::new(0.05, 10, 1000);
    assert_eq!(test.decide(0.1, 0.1, 999, 0.5), SplitDecision::Defer);
    assert_eq!(
        test.decide(0.1, 0.1, 1000, 0.5),
        SplitDecision::Split { forced: true }
    );
    // Even with nothing to gain
    assert_eq!(
        test.decide(0.0, 0.0, 1000, 0.5),
        SplitDecision::Split { forced: true }
    );
}

#[test]
fn test_settings_define_the_test() {
    let settings = HoeffdingTreeSettings::new(0.99, 5000, 50);
    let test = HoeffdingTest::from_settings(&settings);
    assert_eq!(test, HoeffdingTest::new(1.0 - 0.99, 50, 5000));

    let a = test.epsilon(0.5, 50);
    let b = hoeffding_bound(0.5, settings.delta(), 50);
    assert_eq!(a, b);
}
