use crate::{require_positive, ClinicalError};

/// Below this output (mL/kg/h) a positive rate is flagged as oliguria.
pub const OLIGURIA_THRESHOLD_ML_KG_H: f64 = 1.0;

/// 24-hour volume spread over dry weight and hours, in mL/kg/h.
///
/// A missing or non-positive weight gives `UndefinedRate` rather than a
/// zero rate.
pub fn compute_urine_rate(volume_24h_ml: f64, dry_weight_kg: f64) -> Result<f64, ClinicalError> {
    if !(dry_weight_kg > 0.0 && dry_weight_kg.is_finite()) {
        log::warn!("urine rate undefined for dry weight {dry_weight_kg}");
        return Err(ClinicalError::UndefinedRate);
    }
    if volume_24h_ml != 0.0 {
        require_positive("volume_24h_ml", volume_24h_ml)?;
    }
    Ok(volume_24h_ml / dry_weight_kg / 24.0)
}

/// Zero means nothing was charted, so only `0 < rate < 1` flags.
pub fn is_oliguric(rate: f64) -> bool {
    rate > 0.0 && rate < OLIGURIA_THRESHOLD_ML_KG_H
}
