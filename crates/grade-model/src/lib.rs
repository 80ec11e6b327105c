//! Grade Prediction Models
//!
//! Registry of per-(subject, gender, period) models and the final-period
//! (G3) prediction operation over validated feature records.

mod engine;
mod error;
mod model;

pub use engine::{Gender, GradeLevel, ModelKey, ModelRegistry, Period, Prediction, Subject};
pub use error::ModelError;
pub use model::LinearModel;
