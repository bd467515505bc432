use chrono::NaiveDate;
use nefroped_core::{
    Admission, Age, BloodPressure, ClinicalError, DosingConfig, DosingRegimen, PatientId,
    PatientProfile, Sex, TimeSlot, VitalObservation, VitalReading, WardConfig,
};
use nefroped_report::{build_ward_report, build_ward_report_str, render_text, Severity};

fn patient() -> PatientProfile {
    PatientProfile::admit(
        &Admission {
            name: "Bruno Dias".to_string(),
            bed: "7".to_string(),
            admitted_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            age: Age::new(14, 2, 0),
            sex: Sex::Male,
            preterm: false,
            dry_weight_kg: 48.0,
            height_cm: 160.0,
            creatinine_mg_dl: 0.8,
        },
        &DosingConfig {
            regimen: DosingRegimen::BodySurfaceArea,
            concentration_mg_per_ml: Some(3.0),
        },
    )
    .unwrap()
}

fn observe(patient: &PatientProfile, day: u32, bp: (u16, u16), urine: f64) -> VitalObservation {
    VitalObservation::record(
        PatientId(1),
        patient,
        VitalReading {
            observed_on: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            slot: TimeSlot::Morning,
            weight_kg: 48.5,
            blood_pressure: BloodPressure::new(bp.0, bp.1),
            heart_rate: 80,
            respiratory_rate: 16,
            temperature_c: 36.4,
            urine_24h_ml: urine,
        },
    )
}

#[test]
fn fixed_systolic_alert_is_moderate_when_stage_is_lower() {
    let patient = patient();
    let config = WardConfig {
        systolic_alert_mmhg: 125,
        ..WardConfig::default()
    };
    // Adolescent cut-offs: 126/70 is elevated, under the stage 1 limit of 130.
    let report = build_ward_report(&patient, &[observe(&patient, 2, (126, 70), 1600.0)], &config);

    assert!(report.rows[0].systolic_alert);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].severity, Severity::Moderate);
    assert_eq!(report.alerts[0].title, "PAS ≥ 125 mmHg");
}

#[test]
fn quiet_round_produces_no_alerts() {
    let patient = patient();
    let report = build_ward_report(
        &patient,
        &[observe(&patient, 2, (110, 70), 1600.0)],
        &WardConfig::default(),
    );

    assert!(report.alerts.is_empty());
    assert!(!report.rows[0].oliguria);
    assert!(!report.rows[0].systolic_alert);
}

#[test]
fn undefined_rate_is_reported_without_flag() {
    let mut patient = patient();
    patient.dry_weight_kg = 0.0;
    let report = build_ward_report(
        &patient,
        &[observe(&patient, 2, (110, 70), 300.0)],
        &WardConfig::default(),
    );

    assert_eq!(report.rows[0].urine_rate_ml_kg_h, None);
    assert!(!report.rows[0].oliguria);
    assert!(report.alerts.is_empty());
}

#[test]
fn negative_volume_is_flagged_apart_from_undefined_rate() {
    let patient = patient();
    let report = build_ward_report(
        &patient,
        &[observe(&patient, 2, (110, 70), -300.0)],
        &WardConfig::default(),
    );

    let row = &report.rows[0];
    assert_eq!(row.urine_rate_ml_kg_h, None);
    assert!(row.urine_volume_invalid);
    assert!(!row.oliguria);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].severity, Severity::High);
    assert_eq!(report.alerts[0].title, "Diurese inválida");
    assert_eq!(report.alerts[0].detail, "-300 mL em 24 h");

    let text = render_text(&report);
    assert!(text.contains("      ?  Normotenso"));
    assert!(text.contains("? volume de diurese inválido"));

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["rows"][0]["urine_volume_invalid"], true);
}

#[test]
fn undefined_rate_row_renders_a_dash() {
    let mut patient = patient();
    patient.dry_weight_kg = 0.0;
    let report = build_ward_report(
        &patient,
        &[observe(&patient, 2, (110, 70), 300.0)],
        &WardConfig::default(),
    );

    assert!(!report.rows[0].urine_volume_invalid);
    assert!(render_text(&report).contains("      -  Normotenso"));
    let value = serde_json::to_value(&report).unwrap();
    assert!(value["rows"][0].get("urine_volume_invalid").is_none());
}

#[test]
fn text_rendering_marks_highlights() {
    let patient = patient();
    let report = build_ward_report(
        &patient,
        &[
            observe(&patient, 2, (110, 70), 1600.0),
            observe(&patient, 3, (142, 92), 240.0),
        ],
        &WardConfig::default(),
    );
    let text = render_text(&report);

    assert!(text.starts_with("BRUNO DIAS | Leito: 7\n"));
    assert!(text.contains("K: 0.7 (Adolescente Masculino)"));
    assert!(text.contains("ataque 60.0 mg/dia (20.0 mL)"));
    assert!(text.contains("142/92*"));
    // 240 mL over 48 kg in 24 h.
    assert!(text.contains("0.21!"));
    assert!(text.contains("[CRÍTICO] 2026-03-03 08:00: HAS estágio 2 (142/92 mmHg)"));

    let first_row = text.find("2026-03-03  08:00").unwrap();
    let second_row = text.find("2026-03-02  08:00").unwrap();
    assert!(first_row < second_row);
}

#[test]
fn empty_history_renders_placeholder() {
    let report = build_ward_report(&patient(), &[], &WardConfig::default());
    assert!(render_text(&report).contains("Nenhum registro de sinais vitais."));
}

#[test]
fn malformed_document_is_a_parse_error() {
    let err = build_ward_report_str("{ \"patient\": 3 }", &WardConfig::default()).unwrap_err();
    assert!(matches!(err, ClinicalError::Parse(_)));
}
