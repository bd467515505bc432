use nefroped_core::{
    classify_bp, compute_anthropometrics, compute_doses, compute_urine_rate, is_oliguric,
    resolve_bp_limits, Age, AgeCategory, DosingConfig, DosingRegimen, Sex, ATTACK_CEILING_MG,
    MAINTENANCE_CEILING_MG,
};
use proptest::prelude::*;

fn sex_strategy() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Male), Just(Sex::Female)]
}

proptest! {
    #[test]
    fn k_constant_partitions_every_input(
        years in 0u32..19,
        months in 0u32..12,
        sex in sex_strategy(),
        preterm in any::<bool>(),
    ) {
        let category = AgeCategory::select(Age::new(years, months, 0), sex, preterm);
        let expected = if years * 12 + months < 12 {
            if preterm { AgeCategory::PretermNewborn } else { AgeCategory::TermNewborn }
        } else if sex == Sex::Male && years >= 13 {
            AgeCategory::AdolescentMale
        } else {
            AgeCategory::ChildOrAdolescentFemale
        };
        prop_assert_eq!(category, expected);
        prop_assert!([0.33, 0.45, 0.55, 0.70].contains(&category.k()));
    }

    #[test]
    fn doses_never_exceed_ceilings(
        bsa in 0.05f64..3.0,
        weight in 1.0f64..150.0,
        weight_based in any::<bool>(),
    ) {
        let regimen = if weight_based {
            DosingRegimen::WeightBased
        } else {
            DosingRegimen::BodySurfaceArea
        };
        let config = DosingConfig {
            regimen,
            concentration_mg_per_ml: None,
        };
        let doses = compute_doses(bsa, weight, &config).unwrap();
        prop_assert!(doses.attack_dose_mg > 0.0);
        prop_assert!(doses.attack_dose_mg <= ATTACK_CEILING_MG);
        prop_assert!(doses.maintenance_dose_mg > 0.0);
        prop_assert!(doses.maintenance_dose_mg <= MAINTENANCE_CEILING_MG);
        prop_assert!(doses.albumin_volume_ml >= 0.0);
        prop_assert!(doses.diuretic_dose_mg >= 0.0);
    }

    #[test]
    fn calculations_are_repeatable(
        weight in 1.0f64..150.0,
        height in 30.0f64..200.0,
        creatinine in 0.1f64..15.0,
        years in 0u32..18,
        months in 0u32..12,
        sex in sex_strategy(),
        preterm in any::<bool>(),
        volume in 0.0f64..5000.0,
        systolic in 50u16..220,
        diastolic in 20u16..140,
    ) {
        let admit = || {
            compute_anthropometrics(weight, height, creatinine, years, months, sex, preterm)
                .unwrap()
        };
        let first = admit();
        let second = admit();
        prop_assert_eq!(first.body_surface_area.to_bits(), second.body_surface_area.to_bits());
        prop_assert_eq!(first.filtration_rate.to_bits(), second.filtration_rate.to_bits());

        let dose = || {
            compute_doses(first.body_surface_area, weight, &DosingConfig::default()).unwrap()
        };
        prop_assert_eq!(dose(), dose());

        let limits = resolve_bp_limits(sex, years, height);
        prop_assert_eq!(limits, resolve_bp_limits(sex, years, height));
        let stage = classify_bp(systolic, diastolic, &limits);
        prop_assert_eq!(stage, classify_bp(systolic, diastolic, &limits));

        let rate = compute_urine_rate(volume, weight).unwrap();
        prop_assert_eq!(rate.to_bits(), compute_urine_rate(volume, weight).unwrap().to_bits());
        prop_assert_eq!(is_oliguric(rate), rate > 0.0 && rate < 1.0);
    }
}
