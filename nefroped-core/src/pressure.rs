//! Blood-pressure limits and staging.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceBand;
use crate::{ClinicalError, Sex};

/// From this age on the adult cut-offs apply regardless of height.
const ADULT_PATTERN_AGE_YEARS: u32 = 13;
/// Stage 2 starts at P95 + 12 mmHg. This is a fixed offset, not a
/// statistical 99th percentile.
const P99_OFFSET_MMHG: u16 = 12;

/// Threshold set used by [`classify_bp`], in mmHg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BpLimits {
    pub p90_systolic: u16,
    pub p95_systolic: u16,
    pub p99_systolic: u16,
    pub p90_diastolic: u16,
    pub p95_diastolic: u16,
    pub p99_diastolic: u16,
}

impl BpLimits {
    const ADULT: BpLimits = BpLimits {
        p90_systolic: 120,
        p95_systolic: 130,
        p99_systolic: 140,
        p90_diastolic: 80,
        p95_diastolic: 80,
        p99_diastolic: 90,
    };
}

/// Severity, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BpStage {
    Normotensive,
    Elevated,
    Stage1,
    Stage2,
}

impl BpStage {
    pub fn as_str(self) -> &'static str {
        match self {
            BpStage::Normotensive => "normotensive",
            BpStage::Elevated => "elevated",
            BpStage::Stage1 => "stage1",
            BpStage::Stage2 => "stage2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normotensive" => Some(BpStage::Normotensive),
            "elevated" => Some(BpStage::Elevated),
            "stage1" => Some(BpStage::Stage1),
            "stage2" => Some(BpStage::Stage2),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BpStage::Normotensive => "Normotenso",
            BpStage::Elevated => "PA elevada",
            BpStage::Stage1 => "HAS estágio 1",
            BpStage::Stage2 => "HAS estágio 2",
        }
    }
}

/// A charted pressure reading, written as `110/70`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    pub fn new(systolic: u16, diastolic: u16) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}

impl FromStr for BloodPressure {
    type Err = ClinicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sys, dia) = s.split_once('/').ok_or_else(|| {
            ClinicalError::Parse(format!("expected systolic/diastolic, got {s:?}"))
        })?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|err| ClinicalError::Parse(format!("invalid pressure {part:?}: {err}")))
        };
        Ok(Self::new(parse(sys)?, parse(dia)?))
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Resolve thresholds for a patient.
///
/// Coverage gaps never fail: ages and heights outside the table snap to
/// the nearest band and column.
pub fn resolve_bp_limits(sex: Sex, age_years: u32, height_cm: f64) -> BpLimits {
    if age_years >= ADULT_PATTERN_AGE_YEARS {
        return BpLimits::ADULT;
    }

    let column = ReferenceBand::lookup(sex, age_years).nearest_column(height_cm);
    BpLimits {
        p90_systolic: column.p90_systolic,
        p95_systolic: column.p95_systolic,
        p99_systolic: column.p95_systolic + P99_OFFSET_MMHG,
        p90_diastolic: column.p90_diastolic,
        p95_diastolic: column.p95_diastolic,
        p99_diastolic: column.p95_diastolic + P99_OFFSET_MMHG,
    }
}

/// Most severe stage reached by either component.
pub fn classify_bp(systolic: u16, diastolic: u16, limits: &BpLimits) -> BpStage {
    if systolic >= limits.p99_systolic || diastolic >= limits.p99_diastolic {
        BpStage::Stage2
    } else if systolic >= limits.p95_systolic || diastolic >= limits.p95_diastolic {
        BpStage::Stage1
    } else if systolic >= limits.p90_systolic || diastolic >= limits.p90_diastolic {
        BpStage::Elevated
    } else {
        BpStage::Normotensive
    }
}
