//! Tests for configuration document field management and validation
//!
//! This file covers:
//! - Session defaults
//! - Scalar field coercion and clamping
//! - Augmentation toggling
//! - The log10 learning-rate slider
//! - The validation gate run before dispatch

use approx::assert_relative_eq;
use ferrite_architect::{
    Augmentation, ConfigError, ConfigurationDocument, Device, DocumentField, LayerField, LayerKind,
    Optimizer,
};

fn minimal_document() -> ConfigurationDocument {
    ConfigurationDocument::from_json(
        r#"{
  "layers": [{"layer_type": "activation", "function": "relu"}],
  "optimizer_type": "adam",
  "loss_function": "cross_entropy",
  "learning_rate": 0.001,
  "batch_size": 32,
  "num_epochs": 10,
  "device": "cpu",
  "augmentations": []
}"#,
    )
    .expect("minimal document should parse")
}

fn assert_invalid_configuration(doc: &ConfigurationDocument, expected_field: &str) {
    match doc.validate() {
        Err(ConfigError::InvalidConfiguration { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected InvalidConfiguration on {expected_field}, got {other:?}"),
    }
}

// ============================================================================
// Default Tests
// ============================================================================

mod default_tests {
    use super::*;

    #[test]
    fn test_new_document_defaults() {
        let doc = ConfigurationDocument::new();

        assert!(doc.layers().is_empty());
        assert_eq!(doc.optimizer_type(), Optimizer::Adam);
        assert_eq!(doc.loss_function(), "cross_entropy");
        assert_eq!(doc.learning_rate(), 0.001);
        assert_eq!(doc.batch_size(), 32);
        assert_eq!(doc.num_epochs(), 10);
        assert_eq!(doc.device(), Device::Gpu);
        assert!(doc.augmentations().is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut doc = ConfigurationDocument::new();
        doc.layers_mut().append(LayerKind::Conv2d);
        doc.set_field(DocumentField::BatchSize, "64").unwrap();
        doc.toggle_augmentation(Augmentation::RandomHorizontalFlip, true);

        doc.reset();

        assert_eq!(doc, ConfigurationDocument::default());
    }
}

// ============================================================================
// Field Coercion Tests
// ============================================================================

mod field_tests {
    use super::*;

    #[test]
    fn test_batch_size_clamped_to_bounds() {
        let mut doc = ConfigurationDocument::new();

        doc.set_field(DocumentField::BatchSize, "9999").unwrap();
        assert_eq!(doc.batch_size(), 512);

        doc.set_field(DocumentField::BatchSize, "0").unwrap();
        assert_eq!(doc.batch_size(), 1);

        doc.set_field(DocumentField::BatchSize, "-40").unwrap();
        assert_eq!(doc.batch_size(), 1);

        doc.set_field(DocumentField::BatchSize, "99999999999999999999999999999999999999999").unwrap();
        assert_eq!(doc.batch_size(), 512);

        doc.set_field(DocumentField::BatchSize, "64").unwrap();
        assert_eq!(doc.batch_size(), 64);
    }

    #[test]
    fn test_unparsable_counts_fall_back_to_one() {
        let mut doc = ConfigurationDocument::new();

        doc.set_field(DocumentField::BatchSize, "lots").unwrap();
        assert_eq!(doc.batch_size(), 1);

        doc.set_field(DocumentField::NumEpochs, "").unwrap();
        assert_eq!(doc.num_epochs(), 1);
    }

    #[test]
    fn test_counts_take_leading_integer() {
        let mut doc = ConfigurationDocument::new();

        doc.set_field(DocumentField::BatchSize, "32.7").unwrap();
        assert_eq!(doc.batch_size(), 32);

        doc.set_field(DocumentField::BatchSize, " 64abc").unwrap();
        assert_eq!(doc.batch_size(), 64);

        doc.set_field(DocumentField::NumEpochs, "+5 epochs").unwrap();
        assert_eq!(doc.num_epochs(), 5);

        doc.set_field(DocumentField::NumEpochs, "-").unwrap();
        assert_eq!(doc.num_epochs(), 1);

        doc.set_field(DocumentField::NumEpochs, ".5").unwrap();
        assert_eq!(doc.num_epochs(), 1);
    }

    #[test]
    fn test_epochs_have_no_upper_bound() {
        let mut doc = ConfigurationDocument::new();
        doc.set_field(DocumentField::NumEpochs, "5000").unwrap();
        assert_eq!(doc.num_epochs(), 5000);
    }

    #[test]
    fn test_invalid_learning_rate_keeps_previous_value() {
        let mut doc = ConfigurationDocument::new();
        doc.set_field(DocumentField::LearningRate, "0.05").unwrap();

        for raw in ["abc", "", "0", "-0.1", "inf", "NaN"] {
            let result = doc.set_field(DocumentField::LearningRate, raw);
            assert!(
                matches!(result, Err(ConfigError::InvalidFieldValue { .. })),
                "{raw:?} should be rejected"
            );
            assert_eq!(doc.learning_rate(), 0.05);
        }
    }

    #[test]
    fn test_set_field_named_accepts_both_spellings() {
        let mut doc = ConfigurationDocument::new();

        doc.set_field_named("batchSize", "9999").unwrap();
        assert_eq!(doc.batch_size(), 512);

        doc.set_field_named("num_epochs", "3").unwrap();
        assert_eq!(doc.num_epochs(), 3);

        let result = doc.set_field_named("learningRate", "abc");
        assert!(matches!(result, Err(ConfigError::InvalidFieldValue { .. })));
        assert_eq!(doc.learning_rate(), 0.001);
    }

    #[test]
    fn test_set_field_named_rejects_unknown_field() {
        let mut doc = ConfigurationDocument::new();
        let result = doc.set_field_named("momentum", "0.9");
        assert!(matches!(result, Err(ConfigError::InvalidFieldValue { .. })));
    }

    #[test]
    fn test_enum_fields() {
        let mut doc = ConfigurationDocument::new();

        doc.set_field(DocumentField::OptimizerType, "rmsprop").unwrap();
        assert_eq!(doc.optimizer_type(), Optimizer::Rmsprop);
        assert!(doc.set_field(DocumentField::OptimizerType, "adagrad").is_err());
        assert_eq!(doc.optimizer_type(), Optimizer::Rmsprop);

        doc.set_field(DocumentField::Device, "cpu").unwrap();
        assert_eq!(doc.device(), Device::Cpu);
        doc.set_field(DocumentField::Device, "gpu").unwrap();
        assert_eq!(doc.device(), Device::Gpu);
        assert!(doc.set_field(DocumentField::Device, "tpu").is_err());
        assert_eq!(doc.device(), Device::Gpu);
    }

    #[test]
    fn test_loss_function_passes_through() {
        let mut doc = ConfigurationDocument::new();
        doc.set_field(DocumentField::LossFunction, "mse").unwrap();
        assert_eq!(doc.loss_function(), "mse");

        assert!(doc.set_field(DocumentField::LossFunction, "  ").is_err());
        assert_eq!(doc.loss_function(), "mse");
    }

    #[test]
    fn test_augmentations_field_takes_list() {
        let mut doc = ConfigurationDocument::new();
        doc.set_field(DocumentField::Augmentations, "random_horizontal_flip").unwrap();
        assert!(doc.augmentations().contains(&Augmentation::RandomHorizontalFlip));

        assert!(doc.set_field(DocumentField::Augmentations, "random_crop").is_err());
        assert_eq!(doc.augmentations().len(), 1);

        doc.set_field(DocumentField::Augmentations, "").unwrap();
        assert!(doc.augmentations().is_empty());
    }
}

// ============================================================================
// Augmentation and Slider Tests
// ============================================================================

mod augmentation_tests {
    use super::*;

    #[test]
    fn test_toggle_is_idempotent() {
        let mut doc = ConfigurationDocument::new();

        doc.toggle_augmentation(Augmentation::RandomHorizontalFlip, true);
        doc.toggle_augmentation(Augmentation::RandomHorizontalFlip, true);
        assert_eq!(doc.augmentations().len(), 1);

        doc.toggle_augmentation(Augmentation::RandomHorizontalFlip, false);
        doc.toggle_augmentation(Augmentation::RandomHorizontalFlip, false);
        assert!(doc.augmentations().is_empty());
    }

    #[test]
    fn test_toggle_by_name() {
        let mut doc = ConfigurationDocument::new();
        doc.toggle_augmentation_named("random_horizontal_flip", true).unwrap();
        assert_eq!(doc.augmentations().len(), 1);

        let result = doc.toggle_augmentation_named("color_jitter", true);
        assert!(matches!(result, Err(ConfigError::InvalidFieldValue { .. })));
        assert_eq!(doc.augmentations().len(), 1);
    }

    #[test]
    fn test_learning_rate_slider() {
        let mut doc = ConfigurationDocument::new();
        assert_relative_eq!(doc.learning_rate_log10(), -3.0, epsilon = 1e-12);

        doc.set_learning_rate_log10(-2.0).unwrap();
        assert_relative_eq!(doc.learning_rate(), 0.01, epsilon = 1e-12);

        doc.set_learning_rate_log10(-9.0).unwrap();
        assert_relative_eq!(doc.learning_rate(), 1e-5, epsilon = 1e-15);

        doc.set_learning_rate_log10(3.0).unwrap();
        assert_relative_eq!(doc.learning_rate(), 0.1, epsilon = 1e-12);

        assert!(doc.set_learning_rate_log10(f64::NAN).is_err());
        assert_relative_eq!(doc.learning_rate(), 0.1, epsilon = 1e-12);
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_empty_layers_fail_validation() {
        let doc = ConfigurationDocument::new();
        assert_invalid_configuration(&doc, "layers");
    }

    #[test]
    fn test_minimal_document_passes() {
        let doc = minimal_document();
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_imported_batch_size_fails() {
        let mut doc = minimal_document();
        let mut value = doc.export().unwrap();
        value["batch_size"] = serde_json::json!(1000);
        doc.import(&value).unwrap();

        assert_invalid_configuration(&doc, "batch_size");
    }

    #[test]
    fn test_zero_epochs_fail() {
        let mut value = minimal_document().export().unwrap();
        value["num_epochs"] = serde_json::json!(0);
        let doc = ConfigurationDocument::from_value(&value).unwrap();

        assert_invalid_configuration(&doc, "num_epochs");
    }

    #[test]
    fn test_non_positive_learning_rate_fails() {
        let mut value = minimal_document().export().unwrap();
        value["learning_rate"] = serde_json::json!(-0.5);
        let doc = ConfigurationDocument::from_value(&value).unwrap();

        assert_invalid_configuration(&doc, "learning_rate");
    }

    #[test]
    fn test_zero_kernel_layer_fails() {
        let mut value = minimal_document().export().unwrap();
        value["layers"] = serde_json::json!([
            {"layer_type": "maxpool", "channels": 1, "kernel_size": 0, "stride": 2}
        ]);
        let doc = ConfigurationDocument::from_value(&value).unwrap();

        assert_invalid_configuration(&doc, "layers");
    }

    #[test]
    fn test_layers_checked_before_scalars() {
        let mut value = ConfigurationDocument::new().export().unwrap();
        value["batch_size"] = serde_json::json!(0);
        let doc = ConfigurationDocument::from_value(&value).unwrap();

        assert_invalid_configuration(&doc, "layers");
    }

    #[test]
    fn test_imported_huge_padding_validates() {
        let mut value = minimal_document().export().unwrap();
        value["layers"] = serde_json::json!([
            {"layer_type": "conv2d", "in_channels": 1, "out_channels": 1,
             "kernel_size": 3, "stride": 1, "padding": usize::MAX},
            {"layer_type": "linear", "in_features": 784, "out_features": 10}
        ]);
        let mut doc = ConfigurationDocument::from_value(&value).unwrap();

        assert!(doc.validate().is_ok());
        assert_eq!(doc.layers().shape_issues().len(), 1);
        assert_eq!(doc.layers_mut().reconcile(), 1);
    }

    #[test]
    fn test_stale_shapes_do_not_block_dispatch() {
        let mut doc = ConfigurationDocument::new();
        doc.layers_mut().append(LayerKind::Conv2d);
        doc.layers_mut().append(LayerKind::Linear);
        doc.layers_mut().update_field(0, LayerField::KernelSize, "7").unwrap();

        assert_eq!(doc.layers().shape_issues().len(), 1);
        assert!(doc.validate().is_ok());
    }
}
