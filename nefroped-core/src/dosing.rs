//! Corticosteroid and edema management doses.

use serde::{Deserialize, Serialize};

use crate::{require_positive, ClinicalError, DosingConfig, DosingRegimen};

/// Ceiling for the daily attack dose (mg).
pub const ATTACK_CEILING_MG: f64 = 60.0;
/// Ceiling for the alternate-day maintenance dose (mg).
pub const MAINTENANCE_CEILING_MG: f64 = 40.0;
/// Albumin target mass (g/kg).
pub const ALBUMIN_G_PER_KG: f64 = 0.5;
/// Volume of 20% albumin solution per gram.
pub const ALBUMIN_ML_PER_G: f64 = 5.0;
/// Furosemide IV.
pub const DIURETIC_MG_PER_KG: f64 = 0.5;

const ATTACK_MG_PER_M2: f64 = 60.0;
const MAINTENANCE_MG_PER_M2: f64 = 40.0;
const ATTACK_MG_PER_KG: f64 = 2.0;
const MAINTENANCE_MG_PER_KG: f64 = 1.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DoseSchedule {
    pub regimen: DosingRegimen,
    /// mg/day
    pub attack_dose_mg: f64,
    /// mg on alternate days
    pub maintenance_dose_mg: f64,
    pub albumin_volume_ml: f64,
    pub diuretic_dose_mg: f64,
    #[serde(default)]
    pub attack_volume_ml: Option<f64>,
    #[serde(default)]
    pub maintenance_volume_ml: Option<f64>,
}

pub fn compute_doses(
    body_surface_area: f64,
    weight_kg: f64,
    config: &DosingConfig,
) -> Result<DoseSchedule, ClinicalError> {
    let weight = require_positive("weight_kg", weight_kg)?;

    let (attack_raw, maintenance_raw) = match config.regimen {
        DosingRegimen::BodySurfaceArea => {
            let bsa = require_positive("body_surface_area", body_surface_area)?;
            (bsa * ATTACK_MG_PER_M2, bsa * MAINTENANCE_MG_PER_M2)
        }
        DosingRegimen::WeightBased => (weight * ATTACK_MG_PER_KG, weight * MAINTENANCE_MG_PER_KG),
    };

    let attack_dose_mg = attack_raw.min(ATTACK_CEILING_MG);
    let maintenance_dose_mg = maintenance_raw.min(MAINTENANCE_CEILING_MG);

    let concentration = config
        .concentration_mg_per_ml
        .map(|value| require_positive("concentration_mg_per_ml", value))
        .transpose()?;

    Ok(DoseSchedule {
        regimen: config.regimen,
        attack_dose_mg,
        maintenance_dose_mg,
        albumin_volume_ml: (weight * ALBUMIN_G_PER_KG) * ALBUMIN_ML_PER_G,
        diuretic_dose_mg: weight * DIURETIC_MG_PER_KG,
        attack_volume_ml: concentration.map(|c| attack_dose_mg / c),
        maintenance_volume_ml: concentration.map(|c| maintenance_dose_mg / c),
    })
}
