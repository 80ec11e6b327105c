//! Model Registry and Prediction

use crate::error::ModelError;
use crate::model::LinearModel;
use feature_normalizer::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Top of the grade scale
pub const GRADE_MAX: f64 = 20.0;

/// Course subject a model was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Mathematics,
    Portuguese,
}

impl Subject {
    /// Map a form label onto a subject; anything other than "mathematics"
    /// selects the Portuguese models.
    pub fn from_label(label: &str) -> Self {
        if label == "mathematics" {
            Subject::Mathematics
        } else {
            Subject::Portuguese
        }
    }

    /// Short key used in model names
    pub fn key(&self) -> &'static str {
        match self {
            Subject::Mathematics => "math",
            Subject::Portuguese => "por",
        }
    }
}

/// Student gender the model was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Map a form label onto a gender; defaults to female like the form
    pub fn from_label(label: &str) -> Self {
        if label == "male" {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Grading period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    G1,
    G2,
    G3,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::G1, Period::G2, Period::G3];

    pub fn key(&self) -> &'static str {
        match self {
            Period::G1 => "G1",
            Period::G2 => "G2",
            Period::G3 => "G3",
        }
    }
}

/// Identifies one model in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub subject: Subject,
    pub gender: Gender,
    pub period: Period,
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.subject.key(),
            self.gender.key(),
            self.period.key()
        )
    }
}

/// Qualitative band for a predicted grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeLevel {
    Poor,
    #[serde(rename = "Below Average")]
    BelowAverage,
    Average,
    Good,
    Excellent,
}

impl GradeLevel {
    /// Band a grade on the 0-20 scale
    pub fn from_grade(grade: f64) -> Self {
        if grade <= 5.0 {
            GradeLevel::Poor
        } else if grade <= 10.0 {
            GradeLevel::BelowAverage
        } else if grade <= 14.0 {
            GradeLevel::Average
        } else if grade <= 17.0 {
            GradeLevel::Good
        } else {
            GradeLevel::Excellent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::Poor => "Poor",
            GradeLevel::BelowAverage => "Below Average",
            GradeLevel::Average => "Average",
            GradeLevel::Good => "Good",
            GradeLevel::Excellent => "Excellent",
        }
    }
}

/// Result of a G3 prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted final grade, clamped to the 0-20 scale
    pub g3: f64,
    /// Qualitative band for the grade
    pub grade_level: GradeLevel,
    /// Key of the model that produced it
    pub model: String,
}

/// Registry of scoring models keyed by (subject, gender, period).
///
/// Models load from a directory of `{subject}_{gender}_{period}.json` files
/// when one is configured; otherwise the built-in deterministic models are
/// used.
#[derive(Debug)]
pub struct ModelRegistry {
    models: HashMap<ModelKey, LinearModel>,
}

impl ModelRegistry {
    /// Registry with the built-in G3 models for every subject and gender
    pub fn builtin() -> Self {
        let mut models = HashMap::new();
        for subject in [Subject::Mathematics, Subject::Portuguese] {
            for gender in [Gender::Male, Gender::Female] {
                let key = ModelKey {
                    subject,
                    gender,
                    period: Period::G3,
                };
                models.insert(key, builtin_g3(subject, gender));
            }
        }
        info!(models = models.len(), "using built-in grade models");
        Self { models }
    }

    /// Load models from a directory, one `{subject}_{gender}_{period}.json`
    /// file per model. Missing files are skipped; unreadable or malformed
    /// files are errors.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ModelError> {
        let dir = dir.as_ref();
        let mut models = HashMap::new();

        for subject in [Subject::Mathematics, Subject::Portuguese] {
            for gender in [Gender::Male, Gender::Female] {
                for period in Period::ALL {
                    let key = ModelKey {
                        subject,
                        gender,
                        period,
                    };
                    let path = dir.join(format!("{key}.json"));
                    if !path.exists() {
                        continue;
                    }
                    let contents =
                        std::fs::read_to_string(&path).map_err(|source| ModelError::Io {
                            path: path.display().to_string(),
                            source,
                        })?;
                    let model = serde_json::from_str(&contents).map_err(|source| {
                        ModelError::Parse {
                            path: path.display().to_string(),
                            source,
                        }
                    })?;
                    info!(model = %key, "loaded model");
                    models.insert(key, model);
                }
            }
        }

        if models.is_empty() {
            warn!(dir = %dir.display(), "no model files found");
        }

        Ok(Self { models })
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn contains(&self, key: &ModelKey) -> bool {
        self.models.contains_key(key)
    }

    /// Predict the final-period grade for a validated feature record.
    ///
    /// G1 and G2 are the prior-period grades on the 0-20 scale (0.0 when the
    /// caller had none). They are written into the scoring row along with
    /// `Gvg = (G1 + G2) / 2`, replacing the normalizer's placeholder, before
    /// the subject/gender G3 model scores it.
    pub fn predict(
        &self,
        record: &FeatureRecord,
        g1: f64,
        g2: f64,
    ) -> Result<Prediction, ModelError> {
        let subject = Subject::from_label(record.text("subject").unwrap_or("mathematics"));
        let gender = Gender::from_label(record.text("gender").unwrap_or("female"));
        let key = ModelKey {
            subject,
            gender,
            period: Period::G3,
        };

        let model = self
            .models
            .get(&key)
            .ok_or_else(|| ModelError::ModelNotFound(key.to_string()))?;

        let mut row = record.clone();
        row.insert_num("G1", g1);
        row.insert_num("G2", g2);
        row.insert_num("Gvg", (g1 + g2) / 2.0);

        let g3 = model.score(&row).clamp(0.0, GRADE_MAX);
        debug!(model = %key, g3, "scored feature row");

        Ok(Prediction {
            g3,
            grade_level: GradeLevel::from_grade(g3),
            model: key.to_string(),
        })
    }
}

/// Built-in G3 model: prior grades dominate, with modest corrections from
/// the normalized lifestyle and support features.
fn builtin_g3(subject: Subject, gender: Gender) -> LinearModel {
    let intercept = match (subject, gender) {
        (Subject::Mathematics, Gender::Female) => 2.1,
        (Subject::Mathematics, Gender::Male) => 2.0,
        (Subject::Portuguese, Gender::Female) => 2.6,
        (Subject::Portuguese, Gender::Male) => 2.4,
    };

    let weights = [
        ("G1", 0.30),
        ("G2", 0.45),
        ("Gvg", 0.10),
        ("failures", -1.8),
        ("studytime", 0.9),
        ("absences", -1.1),
        ("higher", 0.8),
        ("Medu", 0.4),
        ("Fedu", 0.3),
        ("Bum", -1.4),
        ("goout", -0.3),
        ("Avgalc", -0.5),
        ("schoolsup", -0.3),
        ("famsup", 0.1),
        ("internet", 0.2),
    ];

    LinearModel {
        intercept,
        weights: weights
            .iter()
            .map(|(name, w)| (name.to_string(), *w))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_normalizer::{normalize, RawInput};

    fn record_for(subject: &str, gender: &str) -> FeatureRecord {
        let mut raw = RawInput::new();
        raw.set("subject", subject)
            .set("gender", gender)
            .set("age", 16.0)
            .set("studytime", 3.0)
            .set("higher", "yes");
        normalize(&raw).unwrap()
    }

    #[test]
    fn test_builtin_registry_covers_all_g3_keys() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.len(), 4);

        for subject in [Subject::Mathematics, Subject::Portuguese] {
            for gender in [Gender::Male, Gender::Female] {
                assert!(registry.contains(&ModelKey {
                    subject,
                    gender,
                    period: Period::G3,
                }));
            }
        }
    }

    #[test]
    fn test_predict_selects_model_by_subject_and_gender() {
        let registry = ModelRegistry::builtin();

        let p = registry
            .predict(&record_for("mathematics", "female"), 12.0, 13.0)
            .unwrap();
        assert_eq!(p.model, "math_female_G3");

        let p = registry
            .predict(&record_for("portuguese", "male"), 12.0, 13.0)
            .unwrap();
        assert_eq!(p.model, "por_male_G3");
    }

    #[test]
    fn test_prediction_is_deterministic_and_on_scale() {
        let registry = ModelRegistry::builtin();
        let record = record_for("mathematics", "male");

        let a = registry.predict(&record, 14.0, 15.0).unwrap();
        let b = registry.predict(&record, 14.0, 15.0).unwrap();
        assert_eq!(a.g3, b.g3);
        assert!((0.0..=GRADE_MAX).contains(&a.g3));
    }

    #[test]
    fn test_better_prior_grades_raise_prediction() {
        let registry = ModelRegistry::builtin();
        let record = record_for("mathematics", "female");

        let low = registry.predict(&record, 5.0, 6.0).unwrap();
        let high = registry.predict(&record, 17.0, 18.0).unwrap();
        assert!(high.g3 > low.g3);
    }

    #[test]
    fn test_input_record_is_not_mutated() {
        let registry = ModelRegistry::builtin();
        let record = record_for("mathematics", "female");

        registry.predict(&record, 12.0, 13.0).unwrap();
        assert_eq!(record.number("Gvg"), Some(0.0));
        assert_eq!(record.number("G1"), None);
    }

    #[test]
    fn test_empty_registry_reports_missing_model() {
        let registry = ModelRegistry {
            models: HashMap::new(),
        };
        let err = registry
            .predict(&record_for("mathematics", "female"), 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, ModelError::ModelNotFound(key) if key == "math_female_G3"));
    }

    #[test]
    fn test_grade_level_bands() {
        assert_eq!(GradeLevel::from_grade(3.0), GradeLevel::Poor);
        assert_eq!(GradeLevel::from_grade(5.0), GradeLevel::Poor);
        assert_eq!(GradeLevel::from_grade(8.0), GradeLevel::BelowAverage);
        assert_eq!(GradeLevel::from_grade(12.0), GradeLevel::Average);
        assert_eq!(GradeLevel::from_grade(16.0), GradeLevel::Good);
        assert_eq!(GradeLevel::from_grade(19.5), GradeLevel::Excellent);
    }

    #[test]
    fn test_from_dir_loads_model_files() {
        let dir = std::env::temp_dir().join(format!(
            "grade-model-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        let model = LinearModel {
            intercept: 5.0,
            weights: vec![("G2".to_string(), 0.5)],
        };
        std::fs::write(
            dir.join("math_female_G3.json"),
            serde_json::to_string(&model).unwrap(),
        )
        .unwrap();

        let registry = ModelRegistry::from_dir(&dir).unwrap();
        assert_eq!(registry.len(), 1);

        let p = registry
            .predict(&record_for("mathematics", "female"), 10.0, 12.0)
            .unwrap();
        assert_eq!(p.g3, 5.0 + 0.5 * 12.0);
        assert_eq!(p.grade_level, GradeLevel::Average);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_dir_rejects_malformed_model() {
        let dir = std::env::temp_dir().join(format!(
            "grade-model-bad-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("por_male_G1.json"), "not json").unwrap();

        let err = ModelRegistry::from_dir(&dir).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
