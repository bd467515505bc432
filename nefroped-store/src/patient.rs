use chrono::NaiveDate;
use nefroped_core::{
    Age, AgeCategory, DoseSchedule, DosingRegimen, PatientId, PatientProfile, Sex,
};
use rusqlite::{params, Connection, Row};

use crate::{Result, StoreError};

/// Picker entry for the ward list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientEntry {
    pub id: PatientId,
    pub name: String,
    pub bed: String,
}

const PATIENT_COLUMNS: &str = "id, name, bed, admitted_on, age_years, age_months, age_days, sex,
    preterm, k, category, dry_weight_kg, height_cm, creatinine_mg_dl, body_surface_area,
    filtration_rate, regimen, attack_dose_mg, maintenance_dose_mg, albumin_volume_ml,
    diuretic_dose_mg, attack_volume_ml, maintenance_volume_ml";

pub(crate) fn insert_patient(conn: &Connection, profile: &PatientProfile) -> Result<PatientId> {
    let doses = &profile.doses;
    conn.execute(
        "INSERT INTO patients (name, bed, admitted_on, age_years, age_months, age_days, sex,
         preterm, k, category, dry_weight_kg, height_cm, creatinine_mg_dl, body_surface_area,
         filtration_rate, regimen, attack_dose_mg, maintenance_dose_mg, albumin_volume_ml,
         diuretic_dose_mg, attack_volume_ml, maintenance_volume_ml)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
         ?18, ?19, ?20, ?21, ?22)",
        params![
            profile.name,
            profile.bed,
            profile.admitted_on.to_string(),
            profile.age.years,
            profile.age.months,
            profile.age.days,
            profile.sex.code(),
            profile.preterm,
            profile.k,
            profile.category.as_str(),
            profile.dry_weight_kg,
            profile.height_cm,
            profile.creatinine_mg_dl,
            profile.body_surface_area_m2,
            profile.filtration_rate,
            doses.regimen.as_str(),
            doses.attack_dose_mg,
            doses.maintenance_dose_mg,
            doses.albumin_volume_ml,
            doses.diuretic_dose_mg,
            doses.attack_volume_ml,
            doses.maintenance_volume_ml,
        ],
    )?;
    let id = PatientId(conn.last_insert_rowid());
    log::debug!("stored patient {id} ({})", profile.name);
    Ok(id)
}

pub(crate) fn get_patient(conn: &Connection, id: PatientId) -> Result<Option<PatientProfile>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"
    ))?;

    match stmt.query_row(params![id.0], PatientRow::read) {
        Ok(row) => Ok(Some(row.into_profile()?.1)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn list_patients(conn: &Connection) -> Result<Vec<PatientEntry>> {
    let mut stmt = conn.prepare("SELECT id, name, bed FROM patients ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(PatientEntry {
            id: PatientId(row.get(0)?),
            name: row.get(1)?,
            bed: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub(crate) fn search_patients(
    conn: &Connection,
    fragment: &str,
) -> Result<Vec<(PatientId, PatientProfile)>> {
    let pattern = format!("%{}%", escape_like(&fragment.trim().to_uppercase()));
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE UPPER(name) LIKE ?1 ESCAPE '\\'
         ORDER BY id"
    ))?;
    let rows = stmt
        .query_map(params![pattern], PatientRow::read)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    log::debug!("name search {fragment:?} matched {} patient(s)", rows.len());

    rows.into_iter().map(PatientRow::into_profile).collect()
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

struct PatientRow {
    id: i64,
    name: String,
    bed: String,
    admitted_on: String,
    age_years: u32,
    age_months: u32,
    age_days: u32,
    sex: String,
    preterm: bool,
    k: f64,
    category: String,
    dry_weight_kg: f64,
    height_cm: f64,
    creatinine_mg_dl: f64,
    body_surface_area: f64,
    filtration_rate: f64,
    regimen: String,
    attack_dose_mg: f64,
    maintenance_dose_mg: f64,
    albumin_volume_ml: f64,
    diuretic_dose_mg: f64,
    attack_volume_ml: Option<f64>,
    maintenance_volume_ml: Option<f64>,
}

impl PatientRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            bed: row.get(2)?,
            admitted_on: row.get(3)?,
            age_years: row.get(4)?,
            age_months: row.get(5)?,
            age_days: row.get(6)?,
            sex: row.get(7)?,
            preterm: row.get(8)?,
            k: row.get(9)?,
            category: row.get(10)?,
            dry_weight_kg: row.get(11)?,
            height_cm: row.get(12)?,
            creatinine_mg_dl: row.get(13)?,
            body_surface_area: row.get(14)?,
            filtration_rate: row.get(15)?,
            regimen: row.get(16)?,
            attack_dose_mg: row.get(17)?,
            maintenance_dose_mg: row.get(18)?,
            albumin_volume_ml: row.get(19)?,
            diuretic_dose_mg: row.get(20)?,
            attack_volume_ml: row.get(21)?,
            maintenance_volume_ml: row.get(22)?,
        })
    }

    fn into_profile(self) -> Result<(PatientId, PatientProfile)> {
        let admitted_on = parse_date(&self.admitted_on)?;
        let sex = match self.sex.as_str() {
            "M" => Sex::Male,
            "F" => Sex::Female,
            other => return Err(StoreError::Corrupt(format!("unknown sex code {other:?}"))),
        };
        let category = AgeCategory::parse(&self.category)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown category {:?}", self.category)))?;
        let regimen = DosingRegimen::parse(&self.regimen)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown regimen {:?}", self.regimen)))?;

        let profile = PatientProfile {
            name: self.name,
            bed: self.bed,
            admitted_on,
            age: Age::new(self.age_years, self.age_months, self.age_days),
            sex,
            preterm: self.preterm,
            k: self.k,
            category,
            dry_weight_kg: self.dry_weight_kg,
            height_cm: self.height_cm,
            creatinine_mg_dl: self.creatinine_mg_dl,
            body_surface_area_m2: self.body_surface_area,
            filtration_rate: self.filtration_rate,
            doses: DoseSchedule {
                regimen,
                attack_dose_mg: self.attack_dose_mg,
                maintenance_dose_mg: self.maintenance_dose_mg,
                albumin_volume_ml: self.albumin_volume_ml,
                diuretic_dose_mg: self.diuretic_dose_mg,
                attack_volume_ml: self.attack_volume_ml,
                maintenance_volume_ml: self.maintenance_volume_ml,
            },
        };
        Ok((PatientId(self.id), profile))
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| StoreError::Corrupt(format!("invalid date {value:?}: {err}")))
}
