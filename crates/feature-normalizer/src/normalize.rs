//! Raw Input to Feature Record Transform

use crate::error::ValidationError;
use crate::raw::RawInput;
use crate::record::FeatureRecord;
use crate::schema::{FieldKind, SCHEMA};
use crate::validate::validate;
use tracing::debug;

/// Normalize a raw form submission into a validated feature record.
///
/// Pure and synchronous: the record is fully derived from the input plus the
/// schema constants, and either passes validation or the first violation is
/// returned. Nothing is clamped.
pub fn normalize(raw: &RawInput) -> Result<FeatureRecord, ValidationError> {
    let record = encode(raw);
    validate(&record)?;
    Ok(record)
}

/// Build the feature record without validating it.
///
/// Exposed separately so callers can inspect out-of-contract records; most
/// code wants [`normalize`].
pub fn encode(raw: &RawInput) -> FeatureRecord {
    debug!(fields = raw.len(), "encoding raw input");

    let mut record = FeatureRecord::with_capacity(48);

    for spec in SCHEMA {
        match spec.kind {
            FieldKind::Text { default } => {
                record.push_text(spec.name, raw.text(spec.raw_key, default));
            }
            FieldKind::Indicator {
                zero_label,
                default,
            } => {
                let value = if raw.text(spec.raw_key, default) == zero_label {
                    0.0
                } else {
                    1.0
                };
                record.push_num(spec.name, value);
            }
            FieldKind::Numeric { default } => {
                record.push_num(spec.name, raw.number(spec.raw_key, default));
            }
            FieldKind::Scalar {
                offset,
                scale,
                default,
            } => {
                let value = (raw.number(spec.raw_key, default) - offset) / scale;
                record.push_num(spec.name, value);
            }
            FieldKind::Binary => {
                record.push_num(spec.name, raw.binary(spec.raw_key));
            }
            FieldKind::OneHot { categories } => {
                for category in categories {
                    let value = if raw.matches(spec.raw_key, category) {
                        1.0
                    } else {
                        0.0
                    };
                    record.push_num(format!("{}_{}", spec.name, category), value);
                }
            }
        }
    }

    push_composites(raw, &mut record);
    record
}

/// Derived composite scores, computed from pre-normalization raw values.
///
/// Composite inputs treat absent as 0 rather than using the per-field
/// normalization defaults; with everything absent, Bum comes out at 1/6.
fn push_composites(raw: &RawInput, record: &mut FeatureRecord) {
    let dalc = raw.number("Dalc", 0.0);
    let walc = raw.number("Walc", 0.0);
    let failures = raw.number("failures", 0.0);
    let absences = raw.number("absences", 0.0);
    let studytime = raw.number("studytime", 0.0);
    let freetime = raw.number("freetime", 0.0);

    record.push_num("Avgalc", (dalc + walc) / 10.0);

    // Disengagement composite. At valid extreme inputs this can exceed 1.0
    // and is then rejected by the range check rather than clamped.
    let bum = (2.0 * failures / 4.0
        + 1.5 * absences / 93.0
        + dalc / 5.0
        + walc / 5.0
        + (4.0 - studytime) / 4.0
        + 0.5 * freetime / 5.0)
        / 6.0;
    record.push_num("Bum", bum);

    // Reserved placeholder; the model layer overwrites it from G1/G2.
    record.push_num("Gvg", 0.0);
}
