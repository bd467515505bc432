//! Body surface area (Mosteller) and filtration rate (Schwartz 1, Jaffé).

use serde::{Deserialize, Serialize};

use crate::{require_positive, Age, ClinicalError, Sex};

/// Age/sex band that selects the Schwartz K constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    PretermNewborn,
    TermNewborn,
    AdolescentMale,
    ChildOrAdolescentFemale,
}

impl AgeCategory {
    /// Exactly one band for every (age, sex, prematurity) combination.
    pub fn select(age: Age, sex: Sex, preterm: bool) -> Self {
        if age.total_months() < 12 {
            if preterm {
                AgeCategory::PretermNewborn
            } else {
                AgeCategory::TermNewborn
            }
        } else if sex == Sex::Male && age.years >= 13 {
            AgeCategory::AdolescentMale
        } else {
            AgeCategory::ChildOrAdolescentFemale
        }
    }

    pub fn k(self) -> f64 {
        match self {
            AgeCategory::PretermNewborn => 0.33,
            AgeCategory::TermNewborn => 0.45,
            AgeCategory::AdolescentMale => 0.70,
            AgeCategory::ChildOrAdolescentFemale => 0.55,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgeCategory::PretermNewborn => "preterm_newborn",
            AgeCategory::TermNewborn => "term_newborn",
            AgeCategory::AdolescentMale => "adolescent_male",
            AgeCategory::ChildOrAdolescentFemale => "child_or_adolescent_female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "preterm_newborn" => Some(AgeCategory::PretermNewborn),
            "term_newborn" => Some(AgeCategory::TermNewborn),
            "adolescent_male" => Some(AgeCategory::AdolescentMale),
            "child_or_adolescent_female" => Some(AgeCategory::ChildOrAdolescentFemale),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeCategory::PretermNewborn => "RN Pré-termo",
            AgeCategory::TermNewborn => "RN a termo",
            AgeCategory::AdolescentMale => "Adolescente Masculino",
            AgeCategory::ChildOrAdolescentFemale => "Criança / Adolescente Feminino",
        }
    }
}

/// Result of the admission calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Anthropometrics {
    pub k: f64,
    pub category: AgeCategory,
    /// m²
    pub body_surface_area: f64,
    /// mL/min/1.73m²
    pub filtration_rate: f64,
}

/// Mosteller: `sqrt(weight * height / 3600)`.
pub fn body_surface_area(weight_kg: f64, height_cm: f64) -> Result<f64, ClinicalError> {
    let weight = require_positive("weight_kg", weight_kg)?;
    let height = require_positive("height_cm", height_cm)?;
    Ok(((weight * height) / 3600.0).sqrt())
}

/// Schwartz (first generation): `K * height / creatinine`.
pub fn filtration_rate(
    k: f64,
    height_cm: f64,
    creatinine_mg_dl: f64,
) -> Result<f64, ClinicalError> {
    let height = require_positive("height_cm", height_cm)?;
    let creatinine = require_positive("creatinine_mg_dl", creatinine_mg_dl)?;
    Ok((k * height) / creatinine)
}

pub fn compute_anthropometrics(
    weight_kg: f64,
    height_cm: f64,
    creatinine_mg_dl: f64,
    age_years: u32,
    age_months: u32,
    sex: Sex,
    preterm: bool,
) -> Result<Anthropometrics, ClinicalError> {
    let category = AgeCategory::select(Age::new(age_years, age_months, 0), sex, preterm);
    let k = category.k();
    let body_surface_area = body_surface_area(weight_kg, height_cm)?;
    let filtration_rate = filtration_rate(k, height_cm, creatinine_mg_dl)?;

    Ok(Anthropometrics {
        k,
        category,
        body_surface_area,
        filtration_rate,
    })
}
