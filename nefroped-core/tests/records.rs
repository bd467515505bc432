use chrono::NaiveDate;
use nefroped_core::{
    Admission, Age, AgeCategory, BloodPressure, BpStage, ClinicalError, DosingConfig,
    DosingRegimen, PatientId, PatientProfile, Sex, TimeSlot, VitalObservation, VitalReading,
    WardConfig,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

fn admission() -> Admission {
    Admission {
        name: "  maria souza ".to_string(),
        bed: " 12B ".to_string(),
        admitted_on: date(2026, 3, 1),
        age: Age::new(5, 0, 0),
        sex: Sex::Female,
        preterm: false,
        dry_weight_kg: 20.0,
        height_cm: 110.0,
        creatinine_mg_dl: 0.6,
    }
}

fn reading(day: u32, slot: TimeSlot, bp: (u16, u16)) -> VitalReading {
    VitalReading {
        observed_on: date(2026, 3, day),
        slot,
        weight_kg: 20.4,
        blood_pressure: BloodPressure::new(bp.0, bp.1),
        heart_rate: 98,
        respiratory_rate: 22,
        temperature_c: 36.8,
        urine_24h_ml: 480.0,
    }
}

#[test]
fn admission_derives_profile_once() {
    let profile = PatientProfile::admit(&admission(), &DosingConfig::default())
        .expect("valid admission");

    assert_eq!(profile.name, "MARIA SOUZA");
    assert_eq!(profile.bed, "12B");
    assert_eq!(profile.k, 0.55);
    assert_eq!(profile.category, AgeCategory::ChildOrAdolescentFemale);
    assert!((profile.body_surface_area_m2 - 0.7817).abs() < 1e-3);
    assert!((profile.filtration_rate - 100.83).abs() < 1e-2);
    assert_eq!(profile.doses.regimen, DosingRegimen::BodySurfaceArea);
    assert_eq!(profile.doses.albumin_volume_ml, 50.0);
    assert_eq!(profile.doses.diuretic_dose_mg, 10.0);
}

#[test]
fn admission_rejects_missing_creatinine() {
    let mut form = admission();
    form.creatinine_mg_dl = 0.0;
    assert!(PatientProfile::admit(&form, &DosingConfig::default()).is_err());
}

#[test]
fn observation_stage_uses_profile_limits() {
    let profile = PatientProfile::admit(&admission(), &DosingConfig::default())
        .expect("valid admission");
    let id = PatientId(7);

    // 5-year-old girl at 110 cm: P90 102/65, P95 106/69, P99 118/81.
    let cases = [
        ((98, 60), BpStage::Normotensive),
        ((104, 60), BpStage::Elevated),
        ((90, 70), BpStage::Stage1),
        ((120, 60), BpStage::Stage2),
    ];
    for (bp, expected) in cases {
        let obs = VitalObservation::record(id, &profile, reading(2, TimeSlot::Morning, bp));
        assert_eq!(obs.bp_stage, expected, "reading {bp:?}");
        assert_eq!(obs.patient_id, id);
    }
}

#[test]
fn display_order_is_most_recent_round_first() {
    let profile = PatientProfile::admit(&admission(), &DosingConfig::default())
        .expect("valid admission");
    let id = PatientId(1);
    let mut observations = vec![
        VitalObservation::record(id, &profile, reading(2, TimeSlot::Morning, (100, 60))),
        VitalObservation::record(id, &profile, reading(3, TimeSlot::Morning, (100, 60))),
        VitalObservation::record(id, &profile, reading(2, TimeSlot::Night, (100, 60))),
        VitalObservation::record(id, &profile, reading(2, TimeSlot::Extra, (100, 60))),
    ];

    VitalObservation::sort_for_display(&mut observations);

    let order: Vec<(u32, TimeSlot)> = observations
        .iter()
        .map(|obs| (chrono::Datelike::day(&obs.reading.observed_on), obs.reading.slot))
        .collect();
    assert_eq!(
        order,
        vec![
            (3, TimeSlot::Morning),
            (2, TimeSlot::Extra),
            (2, TimeSlot::Night),
            (2, TimeSlot::Morning),
        ]
    );
}

#[test]
fn records_serialize_with_ward_codes() {
    let profile = PatientProfile::admit(&admission(), &DosingConfig::default())
        .expect("valid admission");
    let obs = VitalObservation::record(
        PatientId(3),
        &profile,
        reading(2, TimeSlot::Afternoon, (100, 60)),
    );

    let value = serde_json::to_value(&obs).expect("serializable");
    assert_eq!(value["patient_id"], 3);
    assert_eq!(value["reading"]["slot"], "14:00");
    assert_eq!(value["reading"]["observed_on"], "2026-03-02");
    assert_eq!(value["bp_stage"], "normotensive");

    let profile_value = serde_json::to_value(&profile).expect("serializable");
    assert_eq!(profile_value["sex"], "F");
    assert_eq!(profile_value["category"], "child_or_adolescent_female");
}

#[test]
fn time_slots_parse_from_charted_text() {
    assert_eq!(TimeSlot::parse("08:00"), Some(TimeSlot::Morning));
    assert_eq!(TimeSlot::parse("20:00"), Some(TimeSlot::Night));
    assert_eq!(TimeSlot::parse("extra"), Some(TimeSlot::Extra));
    assert_eq!(TimeSlot::parse("03:00"), None);
}

#[test]
fn ward_config_accepts_partial_documents() {
    let config: WardConfig =
        serde_json::from_str(r#"{ "dosing": { "regimen": "weight_based" } }"#)
            .expect("valid config");

    assert_eq!(config.dosing.regimen, DosingRegimen::WeightBased);
    assert_eq!(config.dosing.concentration_mg_per_ml, None);
    assert_eq!(config.systolic_alert_mmhg, 130);
    assert_eq!(WardConfig::default().dosing.regimen, DosingRegimen::BodySurfaceArea);
}

#[test]
fn readings_with_impossible_values_are_rejected() {
    assert_eq!(reading(2, TimeSlot::Morning, (100, 60)).validate(), Ok(()));

    let mut nothing_measured = reading(2, TimeSlot::Morning, (100, 60));
    nothing_measured.urine_24h_ml = 0.0;
    assert_eq!(nothing_measured.validate(), Ok(()));

    let mut negative_urine = reading(2, TimeSlot::Morning, (100, 60));
    negative_urine.urine_24h_ml = -300.0;
    assert_eq!(
        negative_urine.validate(),
        Err(ClinicalError::InvalidInput {
            field: "urine_24h_ml",
            value: -300.0
        })
    );

    let mut unread_urine = reading(2, TimeSlot::Morning, (100, 60));
    unread_urine.urine_24h_ml = f64::NAN;
    assert!(unread_urine.validate().is_err());

    let mut no_weight = reading(2, TimeSlot::Morning, (100, 60));
    no_weight.weight_kg = 0.0;
    assert!(matches!(
        no_weight.validate(),
        Err(ClinicalError::InvalidInput {
            field: "weight_kg",
            ..
        })
    ));

    let mut infinite_temperature = reading(2, TimeSlot::Morning, (100, 60));
    infinite_temperature.temperature_c = f64::INFINITY;
    assert!(infinite_temperature.validate().is_err());
}
