//! Ordered, additive schema steps. `PRAGMA user_version` holds the number
//! of steps applied; steps are never edited or removed once released.

use rusqlite::Connection;

use crate::{Result, StoreError};

const MIGRATIONS: &[&str] = &[
    // 1: admissions and rounds
    "CREATE TABLE IF NOT EXISTS patients (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        bed TEXT NOT NULL,
        admitted_on TEXT NOT NULL,
        age_years INTEGER NOT NULL,
        age_months INTEGER NOT NULL,
        age_days INTEGER NOT NULL,
        sex TEXT NOT NULL,
        preterm INTEGER NOT NULL DEFAULT 0,
        k REAL NOT NULL,
        category TEXT NOT NULL,
        dry_weight_kg REAL NOT NULL,
        height_cm REAL NOT NULL,
        creatinine_mg_dl REAL NOT NULL,
        body_surface_area REAL NOT NULL,
        filtration_rate REAL NOT NULL,
        regimen TEXT NOT NULL,
        attack_dose_mg REAL NOT NULL,
        maintenance_dose_mg REAL NOT NULL,
        albumin_volume_ml REAL NOT NULL,
        diuretic_dose_mg REAL NOT NULL,
        attack_volume_ml REAL,
        maintenance_volume_ml REAL
    );
    CREATE TABLE IF NOT EXISTS observations (
        id INTEGER PRIMARY KEY,
        patient_id INTEGER NOT NULL REFERENCES patients(id),
        observed_on TEXT NOT NULL,
        slot TEXT NOT NULL,
        weight_kg REAL NOT NULL,
        systolic INTEGER NOT NULL,
        diastolic INTEGER NOT NULL,
        heart_rate INTEGER NOT NULL,
        respiratory_rate INTEGER NOT NULL,
        temperature_c REAL NOT NULL,
        urine_24h_ml REAL NOT NULL,
        bp_stage TEXT NOT NULL
    );",
    // 2: lookup indexes for name search and per-patient history
    "CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
    CREATE INDEX IF NOT EXISTS idx_observations_patient
        ON observations(patient_id, observed_on, slot);",
];

/// Latest schema version this build writes.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

pub(crate) fn current_version(conn: &Connection) -> Result<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

pub(crate) fn migrate(conn: &mut Connection) -> Result<()> {
    let found = current_version(conn)?;
    if found < 0 {
        return Err(StoreError::Corrupt(format!("negative schema version {found}")));
    }
    if found > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for (index, step) in MIGRATIONS.iter().enumerate().skip(found as usize) {
        let version = index as i64 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(step)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        log::info!("applied schema migration {version}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_latest_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn migrating_twice_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO patients (name, bed, admitted_on, age_years, age_months, age_days, sex,
             k, category, dry_weight_kg, height_cm, creatinine_mg_dl, body_surface_area,
             filtration_rate, regimen, attack_dose_mg, maintenance_dose_mg, albumin_volume_ml,
             diuretic_dose_mg)
             VALUES ('ANA', '1', '2026-01-01', 5, 0, 0, 'F', 0.55, 'child_or_adolescent_female',
             20, 110, 0.6, 0.78, 100.8, 'body_surface_area', 46.8, 31.2, 50, 10)",
            [],
        )
        .unwrap();

        migrate(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 5).unwrap();

        let err = migrate(&mut conn).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedSchema { found, supported }
                if found == SCHEMA_VERSION + 5 && supported == SCHEMA_VERSION
        ));
    }

    #[test]
    fn negative_version_is_corrupt() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", -3i64).unwrap();

        let err = migrate(&mut conn).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn version_one_database_gains_indexes() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(MIGRATIONS[0]).unwrap();
        conn.pragma_update(None, "user_version", 1i64).unwrap();

        migrate(&mut conn).unwrap();

        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 2);
        assert_eq!(current_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
