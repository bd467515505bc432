use serde::{Deserialize, Serialize};

/// How corticosteroid doses scale with the patient.
///
/// Both regimens appear in ward practice and the canonical one has not been
/// signed off, so the choice is explicit configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DosingRegimen {
    /// 60 mg/m²/day attack, 40 mg/m² alternate-day maintenance.
    #[default]
    BodySurfaceArea,
    /// 2 mg/kg/day attack, 1.5 mg/kg alternate-day maintenance.
    WeightBased,
}

impl DosingRegimen {
    pub fn as_str(self) -> &'static str {
        match self {
            DosingRegimen::BodySurfaceArea => "body_surface_area",
            DosingRegimen::WeightBased => "weight_based",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "body_surface_area" | "bsa" | "sc" => Some(DosingRegimen::BodySurfaceArea),
            "weight_based" | "weight" | "peso" => Some(DosingRegimen::WeightBased),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DosingConfig {
    pub regimen: DosingRegimen,
    /// Oral solution strength (e.g. prednisolone 3 mg/mL). When set, doses
    /// are also reported as volumes.
    pub concentration_mg_per_ml: Option<f64>,
}

/// Ward-level settings shared by the CLI and the report renderer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WardConfig {
    pub dosing: DosingConfig,
    /// Systolic value (mmHg) highlighted in reports regardless of stage.
    pub systolic_alert_mmhg: u16,
}

impl Default for WardConfig {
    fn default() -> Self {
        Self {
            dosing: DosingConfig::default(),
            systolic_alert_mmhg: 130,
        }
    }
}
