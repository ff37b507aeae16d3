//! Tests for the two-model comparison session

use ferrite_architect::{ConfigError, DocumentField, LayerKind, ModelSlot, Session};

#[test]
fn test_models_are_independent() {
    let mut session = Session::new();

    session.model_mut(ModelSlot::First).layers_mut().append(LayerKind::Conv2d);
    session
        .model_mut(ModelSlot::First)
        .set_field(DocumentField::BatchSize, "128")
        .unwrap();

    assert_eq!(session.model(ModelSlot::First).layers().len(), 1);
    assert_eq!(session.model(ModelSlot::First).batch_size(), 128);
    assert!(session.model(ModelSlot::Second).layers().is_empty());
    assert_eq!(session.model(ModelSlot::Second).batch_size(), 32);
}

#[test]
fn test_export_file_names() {
    assert_eq!(Session::export_file_name(ModelSlot::First), "model1_config.json");
    assert_eq!(Session::export_file_name(ModelSlot::Second), "model2_config.json");
}

#[test]
fn test_ready_gates_on_validation() {
    let mut session = Session::new();

    let result = session.ready(ModelSlot::Second);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidConfiguration { ref field, .. }) if field == "layers"
    ));

    session.model_mut(ModelSlot::Second).layers_mut().append(LayerKind::Linear);
    let model = session.ready(ModelSlot::Second).unwrap();
    assert_eq!(model.layers().len(), 1);
}

#[test]
fn test_import_touches_only_its_slot() {
    let mut session = Session::new();
    session.model_mut(ModelSlot::Second).layers_mut().append(LayerKind::Activation);
    let second_before = session.model(ModelSlot::Second).clone();

    let text = second_before.export_json().unwrap();
    session.import_json(ModelSlot::First, &text).unwrap();

    assert_eq!(session.model(ModelSlot::First), &second_before);
    assert_eq!(session.model(ModelSlot::Second), &second_before);

    assert!(session.import_json(ModelSlot::Second, "{}").is_err());
    assert_eq!(session.model(ModelSlot::Second), &second_before);
}

#[test]
fn test_reset_clears_both_models() {
    let mut session = Session::new();
    for slot in ModelSlot::ALL {
        session.model_mut(slot).layers_mut().append(LayerKind::Conv2d);
    }

    session.reset();

    assert_eq!(session, Session::new());
}
