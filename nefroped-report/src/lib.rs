//! Ward report built from stored admission and round records.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use nefroped_core::{
    compute_urine_rate, is_oliguric, Age, AgeCategory, BpStage, ClinicalError, DoseSchedule,
    PatientProfile, Sex, TimeSlot, VitalObservation, WardConfig,
};
use serde::{Deserialize, Serialize};

/// Display priority of a report alert, most urgent first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Moderate,
}

/// Input document accepted by [`build_ward_report_str`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportInput {
    pub patient: PatientProfile,
    #[serde(default)]
    pub observations: Vec<VitalObservation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub name: String,
    pub bed: String,
    pub admitted_on: NaiveDate,
    pub age: Age,
    pub sex: Sex,
    pub category: AgeCategory,
    pub k: f64,
    pub dry_weight_kg: f64,
    pub height_cm: f64,
    pub body_surface_area_m2: f64,
    pub filtration_rate: f64,
    pub doses: DoseSchedule,
}

impl From<&PatientProfile> for PatientSummary {
    fn from(profile: &PatientProfile) -> Self {
        Self {
            name: profile.name.clone(),
            bed: profile.bed.clone(),
            admitted_on: profile.admitted_on,
            age: profile.age,
            sex: profile.sex,
            category: profile.category,
            k: profile.k,
            dry_weight_kg: profile.dry_weight_kg,
            height_cm: profile.height_cm,
            body_surface_area_m2: profile.body_surface_area_m2,
            filtration_rate: profile.filtration_rate,
            doses: profile.doses,
        }
    }
}

/// One history line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationRow {
    pub observed_on: NaiveDate,
    pub slot: TimeSlot,
    pub weight_kg: f64,
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    pub temperature_c: f64,
    pub urine_24h_ml: f64,
    /// `None` when the dry weight cannot be used as a divisor, or when the
    /// charted volume itself is invalid.
    pub urine_rate_ml_kg_h: Option<f64>,
    /// Set when the charted 24 h volume is negative or not a number.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub urine_volume_invalid: bool,
    pub oliguria: bool,
    pub bp_stage: BpStage,
    pub systolic_alert: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportAlert {
    pub observed_on: NaiveDate,
    pub slot: TimeSlot,
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WardReport {
    pub generated_at: DateTime<Utc>,
    pub patient: PatientSummary,
    pub rows: Vec<ObservationRow>,
    pub alerts: Vec<ReportAlert>,
}

/// Build a report from a JSON `{ "patient": ..., "observations": [...] }` document.
pub fn build_ward_report_str(
    input_json: &str,
    config: &WardConfig,
) -> Result<WardReport, ClinicalError> {
    let input: ReportInput =
        serde_json::from_str(input_json).map_err(|err| ClinicalError::Parse(err.to_string()))?;
    Ok(build_ward_report(&input.patient, &input.observations, config))
}

pub fn build_ward_report(
    patient: &PatientProfile,
    observations: &[VitalObservation],
    config: &WardConfig,
) -> WardReport {
    let mut ordered = observations.to_vec();
    VitalObservation::sort_for_display(&mut ordered);

    let mut aggregate = ReportAggregate::default();
    for observation in &ordered {
        aggregate.handle_observation(patient, observation, config);
    }
    aggregate.finalize(patient)
}

#[derive(Default)]
struct ReportAggregate {
    rows: Vec<ObservationRow>,
    alerts: Vec<ReportAlert>,
}

impl ReportAggregate {
    fn handle_observation(
        &mut self,
        patient: &PatientProfile,
        observation: &VitalObservation,
        config: &WardConfig,
    ) {
        let reading = &observation.reading;
        let (urine_rate, urine_volume_invalid) =
            match compute_urine_rate(reading.urine_24h_ml, patient.dry_weight_kg) {
                Ok(rate) => (Some(rate), false),
                Err(ClinicalError::UndefinedRate) => (None, false),
                Err(err) => {
                    log::warn!(
                        "patient {} {} {}: {err}",
                        observation.patient_id,
                        reading.observed_on,
                        reading.slot
                    );
                    (None, true)
                }
            };
        let oliguric_rate = urine_rate.filter(|rate| is_oliguric(*rate));
        let systolic_alert = reading.blood_pressure.systolic >= config.systolic_alert_mmhg;
        let pressure = format!("{} mmHg", reading.blood_pressure);

        let stage_severity = match observation.bp_stage {
            BpStage::Stage2 => Some(Severity::Critical),
            BpStage::Stage1 => Some(Severity::High),
            BpStage::Elevated | BpStage::Normotensive => None,
        };
        if let Some(severity) = stage_severity {
            self.push_alert(observation, severity, observation.bp_stage.label(), pressure);
        } else if systolic_alert {
            self.push_alert(
                observation,
                Severity::Moderate,
                &format!("PAS ≥ {} mmHg", config.systolic_alert_mmhg),
                pressure,
            );
        }

        if urine_volume_invalid {
            self.push_alert(
                observation,
                Severity::High,
                "Diurese inválida",
                format!("{} mL em 24 h", reading.urine_24h_ml),
            );
        }

        if let Some(rate) = oliguric_rate {
            self.push_alert(
                observation,
                Severity::High,
                "Oligúria",
                format!("{rate:.2} mL/kg/h"),
            );
        }

        self.rows.push(ObservationRow {
            observed_on: reading.observed_on,
            slot: reading.slot,
            weight_kg: reading.weight_kg,
            blood_pressure: reading.blood_pressure.to_string(),
            heart_rate: reading.heart_rate,
            respiratory_rate: reading.respiratory_rate,
            temperature_c: reading.temperature_c,
            urine_24h_ml: reading.urine_24h_ml,
            urine_rate_ml_kg_h: urine_rate,
            urine_volume_invalid,
            oliguria: oliguric_rate.is_some(),
            bp_stage: observation.bp_stage,
            systolic_alert,
        });
    }

    fn push_alert(
        &mut self,
        observation: &VitalObservation,
        severity: Severity,
        title: &str,
        detail: String,
    ) {
        self.alerts.push(ReportAlert {
            observed_on: observation.reading.observed_on,
            slot: observation.reading.slot,
            severity,
            title: title.to_string(),
            detail,
        });
    }

    fn finalize(mut self, patient: &PatientProfile) -> WardReport {
        // Stable: equal severities keep the most-recent-first row order.
        self.alerts.sort_by_key(|alert| alert.severity);
        log::debug!(
            "report for {}: {} row(s), {} alert(s)",
            patient.name,
            self.rows.len(),
            self.alerts.len()
        );

        WardReport {
            generated_at: Utc::now(),
            patient: PatientSummary::from(patient),
            rows: self.rows,
            alerts: self.alerts,
        }
    }
}

/// Fixed-width text rendering for the terminal or a printout.
pub fn render_text(report: &WardReport) -> String {
    let patient = &report.patient;
    let doses = &patient.doses;
    let mut out = String::new();

    let _ = writeln!(out, "{} | Leito: {}", patient.name, patient.bed);
    let _ = writeln!(
        out,
        "Admissão: {} | Idade: {}a {}m {}d | Sexo: {} | K: {} ({})",
        patient.admitted_on,
        patient.age.years,
        patient.age.months,
        patient.age.days,
        patient.sex,
        patient.k,
        patient.category.label()
    );
    let _ = writeln!(
        out,
        "SC: {:.2} m² | Peso seco: {} kg | Estatura: {} cm | TFGe: {:.1} mL/min/1.73m²",
        patient.body_surface_area_m2,
        patient.dry_weight_kg,
        patient.height_cm,
        patient.filtration_rate
    );
    let _ = writeln!(
        out,
        "Corticoterapia: ataque {:.1} mg/dia{} | manutenção {:.1} mg (D.A.){}",
        doses.attack_dose_mg,
        volume_suffix(doses.attack_volume_ml),
        doses.maintenance_dose_mg,
        volume_suffix(doses.maintenance_volume_ml)
    );
    let _ = writeln!(
        out,
        "Edema: albumina 20% {:.1} mL | furosemida IV {:.1} mg",
        doses.albumin_volume_ml, doses.diuretic_dose_mg
    );
    out.push('\n');

    if report.rows.is_empty() {
        out.push_str("Nenhum registro de sinais vitais.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10}  {:<5}  {:>6}  {:<8}  {:>3}  {:>3}  {:>4}  {:>7}  {:>7}  {}",
        "Data", "Hora", "Peso", "PA", "FC", "FR", "Temp", "Diurese", "Débito", "Estágio"
    );
    for row in &report.rows {
        let pressure = if row.systolic_alert {
            format!("{}*", row.blood_pressure)
        } else {
            row.blood_pressure.clone()
        };
        let rate = match row.urine_rate_ml_kg_h {
            Some(rate) if row.oliguria => format!("{rate:.2}!"),
            Some(rate) => format!("{rate:.2}"),
            None if row.urine_volume_invalid => "?".to_string(),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<10}  {:<5}  {:>6.2}  {:<8}  {:>3}  {:>3}  {:>4.1}  {:>7}  {:>7}  {}",
            row.observed_on.to_string(),
            row.slot.as_str(),
            row.weight_kg,
            pressure,
            row.heart_rate,
            row.respiratory_rate,
            row.temperature_c,
            row.urine_24h_ml,
            rate,
            row.bp_stage.label()
        );
    }

    if !report.alerts.is_empty() {
        out.push_str("\nAlertas:\n");
        for alert in &report.alerts {
            let _ = writeln!(
                out,
                "- [{}] {} {}: {} ({})",
                severity_tag(alert.severity),
                alert.observed_on,
                alert.slot,
                alert.title,
                alert.detail
            );
        }
    }

    out.push_str(
        "\n* PAS acima do alerta fixo | ! débito urinário < 1 mL/kg/h (oligúria) \
         | ? volume de diurese inválido\n",
    );
    out
}

fn volume_suffix(volume_ml: Option<f64>) -> String {
    volume_ml
        .map(|ml| format!(" ({ml:.1} mL)"))
        .unwrap_or_default()
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRÍTICO",
        Severity::High => "ALTO",
        Severity::Moderate => "MODERADO",
    }
}
