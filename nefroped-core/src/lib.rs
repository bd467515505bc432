//! Clinical derivation engine for pediatric nephrology ward rounds.
//!
//! Every calculation here is a pure function over plain values: body
//! surface area, Schwartz filtration rate, corticosteroid and edema
//! doses, blood-pressure limits and stage, urine output rate. Records
//! (`PatientProfile`, `VitalObservation`) carry the derived values so that
//! storage and reporting never need to recompute them.

use std::fmt;

use serde::{Deserialize, Serialize};

mod anthropometry;
mod config;
mod dosing;
mod pressure;
mod record;
mod reference;
mod urine;

pub use anthropometry::{
    body_surface_area, compute_anthropometrics, filtration_rate, AgeCategory, Anthropometrics,
};
pub use config::{DosingConfig, DosingRegimen, WardConfig};
pub use dosing::{
    compute_doses, DoseSchedule, ALBUMIN_G_PER_KG, ALBUMIN_ML_PER_G, ATTACK_CEILING_MG,
    DIURETIC_MG_PER_KG, MAINTENANCE_CEILING_MG,
};
pub use pressure::{classify_bp, resolve_bp_limits, BloodPressure, BpLimits, BpStage};
pub use record::{Admission, PatientId, PatientProfile, TimeSlot, VitalObservation, VitalReading};
pub use reference::{HeightColumn, ReferenceBand, AGE_CHECKPOINTS};
pub use urine::{compute_urine_rate, is_oliguric, OLIGURIA_THRESHOLD_ML_KG_H};

/// Biological sex as used by the reference tables and the K constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Map free text from a form or a legacy row to a sex code.
    ///
    /// Anything that does not read as male is treated as female, which is
    /// how the reference tables have always been keyed.
    pub fn normalize(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "m" | "male" | "masc" | "masculino" | "menino" | "boy" => Sex::Male,
            _ => Sex::Female,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Age at admission, decomposed the way it is charted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    #[serde(default)]
    pub days: u32,
}

impl Age {
    pub fn new(years: u32, months: u32, days: u32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn total_months(&self) -> u32 {
        self.years.saturating_mul(12).saturating_add(self.months)
    }
}

/// Errors raised by the calculators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClinicalError {
    #[error("{field} must be positive, received {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("urine output rate is undefined without a positive dry weight")]
    UndefinedRate,
    #[error("could not parse input: {0}")]
    Parse(String),
}

/// Reject zero, negative and NaN values for a calculation divisor or factor.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ClinicalError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ClinicalError::InvalidInput { field, value })
    }
}
