//! Patient record types for heart-disease risk estimation.
//!
//! Field domains follow the bounded inputs of the clinical intake form.

use serde::{Deserialize, Serialize};

/// Number of slots in the classifier input vector.
pub const FEATURE_COUNT: usize = 13;

/// Index of the unused slot kept for compatibility with the serialized scaler.
///
/// Remove it if the classifier is ever retrained.
pub const PLACEHOLDER_SLOT: usize = 5;

/// Classifier input slot names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "cp",
    "trestbps",
    "chol",
    "placeholder",
    "restecg",
    "thalach",
    "exang",
    "oldpeak",
    "slope",
    "ca",
    "thal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Female => 0.0,
            Self::Male => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestPainType {
    TypicalAngina,
    AtypicalAngina,
    NonAnginal,
    Asymptomatic,
}

impl ChestPainType {
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::TypicalAngina => 0.0,
            Self::AtypicalAngina => 1.0,
            Self::NonAnginal => 2.0,
            Self::Asymptomatic => 3.0,
        }
    }
}

/// Resting electrocardiographic result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestingEcg {
    Normal,
    StTAbnormality,
    LvHypertrophy,
}

impl RestingEcg {
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Normal => 0.0,
            Self::StTAbnormality => 1.0,
            Self::LvHypertrophy => 2.0,
        }
    }
}

/// Slope of the peak exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StSlope {
    Upsloping,
    Flat,
    Downsloping,
}

impl StSlope {
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Upsloping => 0.0,
            Self::Flat => 1.0,
            Self::Downsloping => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Thalassemia {
    Normal,
    FixedDefect,
    ReversibleDefect,
}

impl Thalassemia {
    /// Thalassemia codes start at 1 in the training data.
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::FixedDefect => 2.0,
            Self::ReversibleDefect => 3.0,
        }
    }
}

/// Clinical measurements submitted for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years (20-100)
    pub age: u32,

    pub sex: Sex,

    pub chest_pain_type: ChestPainType,

    /// Resting blood pressure in mmHg (90-200)
    pub resting_bp: u32,

    /// Serum cholesterol in mg/dL (100-600)
    pub cholesterol: u32,

    /// Fasting blood sugar above 120 mg/dL
    pub fasting_blood_sugar_high: bool,

    pub resting_ecg: RestingEcg,

    /// Maximum heart rate achieved in bpm (60-220)
    pub max_heart_rate: u32,

    /// Exercise induced angina
    pub exercise_angina: bool,

    /// ST depression induced by exercise relative to rest (0.0-6.0)
    pub st_depression: f64,

    pub st_slope: StSlope,

    /// Major vessels colored by fluoroscopy (0-3)
    pub major_vessels: u8,

    pub thalassemia: Thalassemia,
}

impl PatientRecord {
    pub const AGE_RANGE: (u32, u32) = (20, 100);
    pub const RESTING_BP_RANGE: (u32, u32) = (90, 200);
    pub const CHOLESTEROL_RANGE: (u32, u32) = (100, 600);
    pub const MAX_HEART_RATE_RANGE: (u32, u32) = (60, 220);
    pub const ST_DEPRESSION_RANGE: (f64, f64) = (0.0, 6.0);
    pub const MAJOR_VESSELS_MAX: u8 = 3;

    /// Validate that every field lies within its domain.
    ///
    /// # Errors
    /// Returns one message per offending field; values are never clamped.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "Age", self.age, Self::AGE_RANGE);
        check_range(
            &mut errors,
            "Resting blood pressure",
            self.resting_bp,
            Self::RESTING_BP_RANGE,
        );
        check_range(
            &mut errors,
            "Cholesterol",
            self.cholesterol,
            Self::CHOLESTEROL_RANGE,
        );
        check_range(
            &mut errors,
            "Max heart rate",
            self.max_heart_rate,
            Self::MAX_HEART_RATE_RANGE,
        );

        let (lo, hi) = Self::ST_DEPRESSION_RANGE;
        if !self.st_depression.is_finite() || !(lo..=hi).contains(&self.st_depression) {
            errors.push(format!(
                "ST depression {} out of range [{lo}, {hi}]",
                self.st_depression
            ));
        }
        if self.major_vessels > Self::MAJOR_VESSELS_MAX {
            errors.push(format!(
                "Major vessels {} out of range [0, {}]",
                self.major_vessels,
                Self::MAJOR_VESSELS_MAX
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the classifier input vector.
    ///
    /// Order: age, sex, cp, trestbps, chol, placeholder (always 0), restecg,
    /// thalach, exang, oldpeak, slope, ca, thal. Fasting blood sugar is not
    /// part of the vector.
    #[must_use]
    pub fn to_feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.age),
            self.sex.code(),
            self.chest_pain_type.code(),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            0.0,
            self.resting_ecg.code(),
            f64::from(self.max_heart_rate),
            bool_code(self.exercise_angina),
            self.st_depression,
            self.st_slope.code(),
            f64::from(self.major_vessels),
            self.thalassemia.code(),
        ]
    }
}

fn check_range(errors: &mut Vec<String>, name: &str, value: u32, (lo, hi): (u32, u32)) {
    if !(lo..=hi).contains(&value) {
        errors.push(format!("{name} {value} out of range [{lo}, {hi}]"));
    }
}

fn bool_code(v: bool) -> f64 {
    if v {
        1.0
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_feature_vector_order() {
        let v = high_risk_record().to_feature_vector();
        assert_eq!(
            v,
            [70.0, 1.0, 0.0, 180.0, 280.0, 0.0, 2.0, 100.0, 1.0, 3.5, 1.0, 3.0, 3.0]
        );
    }

    #[test]
    fn test_placeholder_slot_is_zero() {
        let v = healthy_record().to_feature_vector();
        assert_eq!(v[PLACEHOLDER_SLOT], 0.0);
        assert_eq!(FEATURE_NAMES[PLACEHOLDER_SLOT], "placeholder");
    }

    #[test]
    fn test_validation() {
        assert!(high_risk_record().validate().is_ok());
        assert!(healthy_record().validate().is_ok());

        let invalid = PatientRecord {
            age: 19,
            cholesterol: 601,
            st_depression: 6.1,
            major_vessels: 4,
            ..healthy_record()
        };
        let errors = invalid.validate().expect_err("must reject");
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("Age 19"));
    }

    #[test]
    fn test_validation_accepts_domain_edges() {
        let edges = PatientRecord {
            age: 100,
            resting_bp: 90,
            cholesterol: 600,
            max_heart_rate: 60,
            st_depression: 6.0,
            major_vessels: 3,
            ..healthy_record()
        };
        assert!(edges.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_nan_st_depression() {
        let record = PatientRecord {
            st_depression: f64::NAN,
            ..healthy_record()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_enum_serde_names() {
        let json = serde_json::to_string(&high_risk_record()).expect("serialize");
        assert!(json.contains("\"typical_angina\""));
        assert!(json.contains("\"lv_hypertrophy\""));
        assert!(json.contains("\"reversible_defect\""));

        let back: PatientRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, high_risk_record());
    }
}
