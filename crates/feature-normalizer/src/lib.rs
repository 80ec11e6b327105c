//! Feature Normalization
//!
//! Turns a flat set of raw form values into the fixed-schema numeric feature
//! record expected by the grade prediction models, then checks every
//! normalized field against its [0, 1] contract.

mod error;
mod normalize;
mod raw;
mod record;
mod schema;
mod validate;

pub use error::ValidationError;
pub use normalize::{encode, normalize};
pub use raw::{RawInput, RawValue};
pub use record::{FeatureRecord, FeatureValue};
pub use schema::{FieldKind, FieldSpec, NORMALIZED_FIELDS, REQUIRED_FIELDS, SCHEMA};
pub use validate::validate;
