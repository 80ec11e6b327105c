//! Feature Record Validation

use crate::error::ValidationError;
use crate::record::{FeatureRecord, FeatureValue};
use crate::schema::{NORMALIZED_FIELDS, REQUIRED_FIELDS};
use tracing::debug;

/// Check a feature record against its contract.
///
/// Required fields first (a miss means the normalizer's defaulting is
/// broken), then every normalized field against [0, 1] in record order.
/// Fails on the first violation; no aggregate report.
pub fn validate(record: &FeatureRecord) -> Result<(), ValidationError> {
    for field in REQUIRED_FIELDS {
        if record.get(field).is_none() {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
    }

    for (name, value) in record.iter() {
        if !NORMALIZED_FIELDS.contains(&name) {
            continue;
        }
        if let FeatureValue::Num(v) = value {
            debug!(field = name, value = v, "range check");
            if !(0.0..=1.0).contains(v) {
                return Err(ValidationError::OutOfRange {
                    field: name.to_string(),
                    value: *v,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_record() -> FeatureRecord {
        let mut record = FeatureRecord::with_capacity(32);
        for field in REQUIRED_FIELDS {
            match *field {
                "subject" => record.push_text("subject", "mathematics"),
                "gender" => record.push_text("gender", "female"),
                _ => record.push_num(*field, 0.0),
            }
        }
        record.push_num("Avgalc", 0.0);
        record.push_num("Bum", 0.5);
        record.push_num("Gvg", 0.0);
        record
    }

    #[test]
    fn test_complete_record_passes() {
        assert_eq!(validate(&minimal_record()), Ok(()));
    }

    #[test]
    fn test_missing_required_field_is_reported() {
        let mut record = FeatureRecord::with_capacity(8);
        record.push_text("subject", "mathematics");

        let err = validate(&record).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "gender".to_string()
            }
        );
    }

    #[test]
    fn test_range_violation_names_field_and_bounds() {
        let mut record = minimal_record();
        record.insert_num("goout", 1.25);

        let err = validate(&record).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "goout".to_string(),
                value: 1.25,
                min: 0.0,
                max: 1.0,
            }
        );
        assert_eq!(
            err.to_string(),
            "goout value 1.25 is out of range [0, 1]"
        );
    }

    #[test]
    fn test_negative_value_fails() {
        let mut record = minimal_record();
        record.insert_num("absences", -0.01);
        assert!(matches!(
            validate(&record),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let mut record = minimal_record();
        record.insert_num("Dalc", 0.0);
        record.insert_num("Walc", 1.0);
        assert_eq!(validate(&record), Ok(()));
    }

    #[test]
    fn test_fail_fast_stops_at_first_violation() {
        let mut record = minimal_record();
        record.insert_num("age", 2.0);
        record.insert_num("health", -1.0);

        // age precedes health in record order
        let err = validate(&record).unwrap_err();
        assert_eq!(err.field(), "age");
    }

    #[test]
    fn test_unranged_fields_are_not_checked() {
        let mut record = minimal_record();
        // school is pass-through and may be any number
        record.insert_num("school", 5.0);
        record.insert_num("Gvg", 14.5);
        assert_eq!(validate(&record), Ok(()));
    }
}
