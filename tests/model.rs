use hoeffding_tree::config::{HoeffdingTreeSettings, NumericSplitKind};
use hoeffding_tree::data::{Dimension, FeatureSchema};
use hoeffding_tree::error::{ConfigError, HoeffdingError};
use hoeffding_tree::model::{HoeffdingTreeModel, ModelKind};
use hoeffding_tree::testing::{accuracy, gaussian_blobs, select, split_indices, two_gaussians};

fn settings(info_gain: bool, strategy: NumericSplitKind) -> HoeffdingTreeSettings {
    HoeffdingTreeSettings {
        info_gain,
        numeric_split_strategy: strategy,
        ..HoeffdingTreeSettings::new(0.99, 5000, 50)
    }
}

#[test]
fn test_settings_select_the_engine() {
    let cases = [
        (false, NumericSplitKind::Binary, ModelKind::GiniBinary),
        (false, NumericSplitKind::Domingos, ModelKind::GiniDomingos),
        (true, NumericSplitKind::Binary, ModelKind::InfoGainBinary),
        (true, NumericSplitKind::Domingos, ModelKind::InfoGainDomingos),
    ];
    for (info_gain, strategy, kind) in cases {
        let model =
            HoeffdingTreeModel::new(FeatureSchema::numeric(2), 2, settings(info_gain, strategy))
                .unwrap();
        assert_eq!(model.kind(), kind);
        assert_eq!(kind.numeric_split(), strategy);
        assert_eq!(model.num_nodes(), 1);
        assert_eq!(model.num_classes(), 2);
        assert_eq!(model.settings().info_gain, info_gain);
    }
}

#[test]
fn test_every_engine_learns_two_gaussians() {
    let (data, labels) = two_gaussians(1200, 3.0, 1, 42);
    let (train_idx, test_idx) = split_indices(1200, 0.2, 0);
    let (train, train_labels) = select(&data, &labels, &train_idx);
    let (test, test_labels) = select(&data, &labels, &test_idx);

    for info_gain in [false, true] {
        for strategy in [NumericSplitKind::Binary, NumericSplitKind::Domingos] {
            let model = HoeffdingTreeModel::build_model(
                train.view(),
                FeatureSchema::numeric(2),
                &train_labels,
                2,
                settings(info_gain, strategy),
            )
            .unwrap();
            assert!(model.num_nodes() >= 3);
            assert_eq!(model.samples_seen(), train_idx.len());

            let predictions = model.classify(test.view()).unwrap();
            assert!(accuracy(&predictions, &test_labels) >= 0.95);
        }
    }
}

#[test]
fn test_multiclass_blobs() {
    let (data, labels) = gaussian_blobs(3000, 3, 1, 6.0, 8);
    let model = HoeffdingTreeModel::fit(
        data.view(),
        FeatureSchema::numeric(1),
        &labels,
        3,
        HoeffdingTreeSettings {
            info_gain: true,
            ..HoeffdingTreeSettings::new(0.95, 5000, 100)
        },
    )
    .unwrap();

    assert!(model.num_leaves() >= 3);
    let (predictions, probabilities) = model.classify_with_probabilities(data.view()).unwrap();
    assert_eq!(probabilities.dim(), (3000, 3));
    assert!(accuracy(&predictions, &labels) >= 0.9);
}

#[test]
fn test_build_model_rejects_bad_input() {
    let (data, labels) = two_gaussians(100, 3.0, 1, 1);

    assert_eq!(
        HoeffdingTreeModel::build_model(
            data.view(),
            FeatureSchema::numeric(3),
            &labels,
            2,
            HoeffdingTreeSettings::default(),
        )
        .unwrap_err(),
        HoeffdingError::Config(ConfigError::DimensionMismatch {
            expected: 3,
            got: 2
        })
    );

    let bad_settings = HoeffdingTreeSettings {
        check_interval: 0,
        ..HoeffdingTreeSettings::default()
    };
    assert_eq!(
        HoeffdingTreeModel::build_model(
            data.view(),
            FeatureSchema::numeric(2),
            &labels,
            2,
            bad_settings,
        )
        .unwrap_err(),
        HoeffdingError::Config(ConfigError::ZeroCheckInterval)
    );

    // Dimension 1 declared categorical but holds real values
    let schema = FeatureSchema::new(vec![
        Dimension::Numeric,
        Dimension::Categorical { cardinality: 3 },
    ])
    .unwrap();
    assert!(matches!(
        HoeffdingTreeModel::build_model(
            data.view(),
            schema,
            &labels,
            2,
            HoeffdingTreeSettings::default()
        ),
        Err(HoeffdingError::Data(_))
    ));
}

#[test]
fn test_training_continues_after_build() {
    let (data, labels) = two_gaussians(600, 1.0, 1, 4);
    let mut model = HoeffdingTreeModel::build_model(
        data.view(),
        FeatureSchema::numeric(2),
        &labels,
        2,
        HoeffdingTreeSettings::new(0.95, 300, 50),
    )
    .unwrap();
    let num_nodes = model.num_nodes();

    model.train(data.view(), &labels, false).unwrap();
    assert!(model.num_nodes() >= num_nodes);
    assert_eq!(model.samples_seen(), 1200);

    model.train_one(data.row(0), labels[0]).unwrap();
    assert_eq!(model.samples_seen(), 1201);
}

#[test]
fn test_serde_round_trip() {
    let (data, labels) = two_gaussians(800, 1.0, 1, 12);

    for strategy in [NumericSplitKind::Binary, NumericSplitKind::Domingos] {
        let model = HoeffdingTreeModel::build_model(
            data.view(),
            FeatureSchema::numeric(2),
            &labels,
            2,
            HoeffdingTreeSettings {
                numeric_split_strategy: strategy,
                ..HoeffdingTreeSettings::new(0.95, 400, 50)
            },
        )
        .unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: HoeffdingTreeModel = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, model);
        assert_eq!(restored.kind(), model.kind());
        assert_eq!(
            restored.classify(data.view()).unwrap(),
            model.classify(data.view()).unwrap()
        );

        // A restored model keeps training where the original left off
        let mut original = model;
        let mut restored = restored;
        original.train(data.view(), &labels, false).unwrap();
        restored.train(data.view(), &labels, false).unwrap();
        assert_eq!(restored, original);
    }
}
