//! Schema validation tests over JSON request bodies.

use serde_json::{json, Value};
use test_utils::{invalid_records, valid_batch, valid_record, REFERENCE_CASES};
use windpower_model::{DateField, SchemaError, SchemaValidator, ValidatedInput};

fn validate(value: &Value) -> Result<ValidatedInput, SchemaError> {
    SchemaValidator::new().validate_value(value)
}

// ============================================================================
// Accepted payloads
// ============================================================================

#[test]
fn test_single_record_is_single() {
    let validated = validate(&valid_record()).unwrap();
    match validated {
        ValidatedInput::Single(row) => {
            assert_eq!(row.date, DateField::Text("2009070100".to_string()));
            assert_eq!(row.hors, 1);
            assert_eq!(row.numeric_fields(), [1.0, 2.34, -0.79, 2.47, 108.68]);
        }
        other => panic!("expected single record, got {:?}", other),
    }
}

#[test]
fn test_batch_rows_keep_order() {
    let validated = validate(&valid_batch()).unwrap();
    assert_eq!(validated.len(), REFERENCE_CASES.len());
    for (row, case) in validated.rows().iter().zip(REFERENCE_CASES.iter()) {
        assert_eq!(row.date, DateField::from(case.date));
        assert_eq!(row.u, case.u);
        assert_eq!(row.wd, case.wd);
    }
}

#[test]
fn test_extra_fields_ignored() {
    let mut record = valid_record();
    record["station"] = json!("north");
    record["comment"] = json!(null);
    assert!(validate(&record).is_ok());
}

#[test]
fn test_integer_reals_accepted() {
    let record = json!({"date": "2009070100", "hors": 3, "u": 2, "v": -1, "ws": 0, "wd": 270});
    let validated = validate(&record).unwrap();
    let row = &validated.rows()[0];
    assert_eq!(row.u, 2.0);
    assert_eq!(row.wd, 270.0);
}

#[test]
fn test_validation_does_not_mutate_input() {
    let record = valid_record();
    let before = record.clone();
    validate(&record).unwrap();
    assert_eq!(record, before);
}

// ============================================================================
// Rejected payloads
// ============================================================================

#[test]
fn test_invalid_records_name_failing_field() {
    for (field, record) in invalid_records() {
        let err = validate(&record).unwrap_err();
        assert_eq!(err.field(), Some(field), "record {} should fail on {}", record, field);
    }
}

#[test]
fn test_fractional_hors_rejected() {
    let record = json!({"date": "2009070100", "hors": 1.5, "u": 0.1, "v": 0.1, "ws": 0.1, "wd": 0.1});
    let err = validate(&record).unwrap_err();
    assert!(matches!(err, SchemaError::WrongKind { field: "hors", .. }));
}

#[test]
fn test_numeric_date_rejected() {
    let record = json!({"date": 2009070100u64, "hors": 1, "u": 0.1, "v": 0.1, "ws": 0.1, "wd": 0.1});
    let err = validate(&record).unwrap_err();
    assert!(matches!(err, SchemaError::WrongKind { field: "date", .. }));
}

#[test]
fn test_batch_error_carries_index() {
    let mut batch = valid_batch();
    batch[3]["ws"] = json!("fast");
    let err = validate(&batch).unwrap_err();
    match &err {
        SchemaError::InBatch { index, .. } => assert_eq!(*index, 3),
        other => panic!("expected batch error, got {:?}", other),
    }
    assert_eq!(err.field(), Some("ws"));
}

#[test]
fn test_empty_batch_rejected() {
    assert!(matches!(validate(&json!([])).unwrap_err(), SchemaError::EmptyBatch));
}

#[test]
fn test_non_record_payloads_rejected() {
    for payload in [json!(null), json!(42), json!("2009070100"), json!([1, 2])] {
        assert!(validate(&payload).is_err(), "payload {} should be rejected", payload);
    }
}
