//! Field Schema
//!
//! Declarative table describing how each raw form field maps onto the
//! feature record: interpretation kind, rescaling constants, and default.
//! The table drives a single generic transform loop in `normalize`.

/// How a raw field is interpreted and encoded.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Text pass-through with a default label
    Text { default: &'static str },
    /// 0/1 indicator derived from a text field: 0 when the raw value equals
    /// `zero_label`, 1 otherwise
    Indicator {
        zero_label: &'static str,
        default: &'static str,
    },
    /// Numeric pass-through, absent takes `default`
    Numeric { default: f64 },
    /// Linear rescale `(raw - offset) / scale`, absent takes `default`.
    /// Defaults are chosen so the rescaled default is a valid in-range value.
    Scalar {
        offset: f64,
        scale: f64,
        default: f64,
    },
    /// 1 iff "yes" / "1" / true, otherwise 0
    Binary,
    /// One 0/1 output column per category, named `{field}_{category}`
    OneHot { categories: &'static [&'static str] },
}

/// One row of the schema table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Output field name (column prefix for one-hot families)
    pub name: &'static str,
    /// Raw form field this is read from
    pub raw_key: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn scalar(name: &'static str, offset: f64, scale: f64, default: f64) -> Self {
        Self {
            name,
            raw_key: name,
            kind: FieldKind::Scalar {
                offset,
                scale,
                default,
            },
        }
    }

    const fn numeric(name: &'static str) -> Self {
        Self {
            name,
            raw_key: name,
            kind: FieldKind::Numeric { default: 0.0 },
        }
    }

    const fn binary(name: &'static str) -> Self {
        Self {
            name,
            raw_key: name,
            kind: FieldKind::Binary,
        }
    }

    const fn one_hot(name: &'static str, categories: &'static [&'static str]) -> Self {
        Self {
            name,
            raw_key: name,
            kind: FieldKind::OneHot { categories },
        }
    }
}

/// Job categories shared by the mother's and father's job fields
pub const JOB_CATEGORIES: &[&str] = &["at_home", "health", "other", "services", "teacher"];

/// Reasons for choosing the school
pub const REASON_CATEGORIES: &[&str] = &["course", "home", "other", "reputation"];

/// Guardian categories
pub const GUARDIAN_CATEGORIES: &[&str] = &["father", "mother", "other"];

/// The full field table, in output column order.
///
/// Scale constants come from the documented dataset domains: age 15-22,
/// parental education 0-4, travel/study time 1-4, failures 0-4, the 1-5
/// rating scales, and absences 0-93.
pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: "subject",
        raw_key: "subject",
        kind: FieldKind::Text {
            default: "mathematics",
        },
    },
    FieldSpec {
        name: "gender",
        raw_key: "gender",
        kind: FieldKind::Text { default: "female" },
    },
    FieldSpec {
        name: "sex",
        raw_key: "gender",
        kind: FieldKind::Indicator {
            zero_label: "female",
            default: "female",
        },
    },
    FieldSpec::numeric("school"),
    FieldSpec::scalar("age", 15.0, 7.0, 15.0),
    FieldSpec::numeric("address"),
    FieldSpec::numeric("famsize"),
    FieldSpec::numeric("Pstatus"),
    FieldSpec::scalar("Medu", 0.0, 4.0, 0.0),
    FieldSpec::scalar("Fedu", 0.0, 4.0, 0.0),
    FieldSpec::scalar("traveltime", 1.0, 3.0, 1.0),
    FieldSpec::scalar("studytime", 1.0, 3.0, 1.0),
    FieldSpec::scalar("failures", 0.0, 4.0, 0.0),
    FieldSpec::binary("schoolsup"),
    FieldSpec::binary("famsup"),
    FieldSpec::binary("paid"),
    FieldSpec::binary("activities"),
    FieldSpec::binary("nursery"),
    FieldSpec::binary("higher"),
    FieldSpec::binary("internet"),
    FieldSpec::binary("romantic"),
    FieldSpec::scalar("famrel", 1.0, 4.0, 1.0),
    FieldSpec::scalar("freetime", 1.0, 4.0, 1.0),
    FieldSpec::scalar("goout", 1.0, 4.0, 1.0),
    FieldSpec::scalar("Dalc", 1.0, 4.0, 1.0),
    FieldSpec::scalar("Walc", 1.0, 4.0, 1.0),
    FieldSpec::scalar("health", 1.0, 4.0, 1.0),
    FieldSpec::scalar("absences", 0.0, 93.0, 0.0),
    FieldSpec::one_hot("Mjob", JOB_CATEGORIES),
    FieldSpec::one_hot("Fjob", JOB_CATEGORIES),
    FieldSpec::one_hot("reason", REASON_CATEGORIES),
    FieldSpec::one_hot("guardian", GUARDIAN_CATEGORIES),
];

/// Fields that must be present in every record. Absence after normalization
/// signals a defaulting bug upstream, not bad user input.
pub const REQUIRED_FIELDS: &[&str] = &[
    "subject",
    "gender",
    "sex",
    "school",
    "age",
    "address",
    "famsize",
    "Pstatus",
    "Medu",
    "Fedu",
    "traveltime",
    "studytime",
    "failures",
    "schoolsup",
    "famsup",
    "paid",
    "activities",
    "nursery",
    "higher",
    "internet",
    "romantic",
    "famrel",
    "freetime",
    "goout",
    "Dalc",
    "Walc",
    "health",
    "absences",
];

/// Fields whose value must lie in [0, 1] inclusive after normalization
pub const NORMALIZED_FIELDS: &[&str] = &[
    "age",
    "Medu",
    "Fedu",
    "traveltime",
    "studytime",
    "failures",
    "absences",
    "famrel",
    "freetime",
    "goout",
    "Dalc",
    "Walc",
    "health",
    "Avgalc",
    "Bum",
];
