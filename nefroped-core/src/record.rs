//! Admission and nursing-round records with their derived values.

use std::cmp::Reverse;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    classify_bp, compute_anthropometrics, compute_doses, require_positive, resolve_bp_limits, Age,
    AgeCategory, BloodPressure, BpStage, ClinicalError, DoseSchedule, DosingConfig, Sex,
};

/// Row id handed out by the record store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PatientId(pub i64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Admission form as filled in at the bedside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Admission {
    pub name: String,
    pub bed: String,
    pub admitted_on: NaiveDate,
    pub age: Age,
    pub sex: Sex,
    /// Only consulted for infants under 12 months.
    #[serde(default)]
    pub preterm: bool,
    pub dry_weight_kg: f64,
    pub height_cm: f64,
    pub creatinine_mg_dl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    pub name: String,
    pub bed: String,
    pub admitted_on: NaiveDate,
    pub age: Age,
    pub sex: Sex,
    #[serde(default)]
    pub preterm: bool,
    pub k: f64,
    pub category: AgeCategory,
    pub dry_weight_kg: f64,
    pub height_cm: f64,
    pub creatinine_mg_dl: f64,
    pub body_surface_area_m2: f64,
    pub filtration_rate: f64,
    pub doses: DoseSchedule,
}

impl PatientProfile {
    /// Derive every admission value once. Later edits go through a new
    /// admission, never through recomputation of a stored profile.
    pub fn admit(admission: &Admission, dosing: &DosingConfig) -> Result<Self, ClinicalError> {
        let anthropometrics = compute_anthropometrics(
            admission.dry_weight_kg,
            admission.height_cm,
            admission.creatinine_mg_dl,
            admission.age.years,
            admission.age.months,
            admission.sex,
            admission.preterm,
        )?;
        let doses = compute_doses(
            anthropometrics.body_surface_area,
            admission.dry_weight_kg,
            dosing,
        )?;

        let name = admission.name.trim().to_uppercase();
        log::debug!(
            "admitted {name}: K={} ({}), BSA={:.2} m², eGFR={:.1}",
            anthropometrics.k,
            anthropometrics.category.label(),
            anthropometrics.body_surface_area,
            anthropometrics.filtration_rate
        );

        Ok(Self {
            name,
            bed: admission.bed.trim().to_string(),
            admitted_on: admission.admitted_on,
            age: admission.age,
            sex: admission.sex,
            preterm: admission.preterm,
            k: anthropometrics.k,
            category: anthropometrics.category,
            dry_weight_kg: admission.dry_weight_kg,
            height_cm: admission.height_cm,
            creatinine_mg_dl: admission.creatinine_mg_dl,
            body_surface_area_m2: anthropometrics.body_surface_area,
            filtration_rate: anthropometrics.filtration_rate,
            doses,
        })
    }
}

/// Nursing round. `Extra` covers readings taken outside the schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeSlot {
    #[serde(rename = "08:00")]
    Morning,
    #[serde(rename = "14:00")]
    Afternoon,
    #[serde(rename = "20:00")]
    Night,
    #[serde(rename = "Extra")]
    Extra,
}

impl TimeSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Morning => "08:00",
            TimeSlot::Afternoon => "14:00",
            TimeSlot::Night => "20:00",
            TimeSlot::Extra => "Extra",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "08:00" | "8:00" | "08h" => Some(TimeSlot::Morning),
            "14:00" | "14h" => Some(TimeSlot::Afternoon),
            "20:00" | "20h" => Some(TimeSlot::Night),
            other if other.eq_ignore_ascii_case("extra") => Some(TimeSlot::Extra),
            _ => None,
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values charted during one round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalReading {
    pub observed_on: NaiveDate,
    pub slot: TimeSlot,
    /// Fasting weight, kg.
    pub weight_kg: f64,
    pub blood_pressure: BloodPressure,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    pub temperature_c: f64,
    pub urine_24h_ml: f64,
}

impl VitalReading {
    /// Reject charted values no round can produce. Zero urine volume is
    /// allowed and means nothing was measured.
    pub fn validate(&self) -> Result<(), ClinicalError> {
        require_positive("weight_kg", self.weight_kg)?;
        require_positive("temperature_c", self.temperature_c)?;
        if self.urine_24h_ml != 0.0 {
            require_positive("urine_24h_ml", self.urine_24h_ml)?;
        }
        Ok(())
    }
}

/// Stored round with its blood-pressure stage. Never edited after entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalObservation {
    pub patient_id: PatientId,
    pub reading: VitalReading,
    pub bp_stage: BpStage,
}

impl VitalObservation {
    pub fn record(patient_id: PatientId, patient: &PatientProfile, reading: VitalReading) -> Self {
        let limits = resolve_bp_limits(patient.sex, patient.age.years, patient.height_cm);
        let bp = reading.blood_pressure;
        let bp_stage = classify_bp(bp.systolic, bp.diastolic, &limits);
        log::debug!(
            "patient {patient_id} {} {}: {bp} -> {}",
            reading.observed_on,
            reading.slot,
            bp_stage.as_str()
        );

        Self {
            patient_id,
            reading,
            bp_stage,
        }
    }

    /// Most recent round first: date, then slot, both descending.
    pub fn sort_for_display(observations: &mut [VitalObservation]) {
        observations.sort_by_key(|obs| Reverse((obs.reading.observed_on, obs.reading.slot)));
    }
}
