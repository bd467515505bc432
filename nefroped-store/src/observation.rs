use nefroped_core::{BloodPressure, BpStage, PatientId, TimeSlot, VitalObservation, VitalReading};
use rusqlite::{params, Connection, Row};

use crate::patient::parse_date;
use crate::{Result, StoreError};

pub(crate) fn insert_observation(conn: &Connection, obs: &VitalObservation) -> Result<i64> {
    let reading = &obs.reading;
    reading.validate()?;
    conn.execute(
        "INSERT INTO observations (patient_id, observed_on, slot, weight_kg, systolic, diastolic,
         heart_rate, respiratory_rate, temperature_c, urine_24h_ml, bp_stage)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            obs.patient_id.0,
            reading.observed_on.to_string(),
            reading.slot.as_str(),
            reading.weight_kg,
            reading.blood_pressure.systolic,
            reading.blood_pressure.diastolic,
            reading.heart_rate,
            reading.respiratory_rate,
            reading.temperature_c,
            reading.urine_24h_ml,
            obs.bp_stage.as_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!(
        "stored observation {id} for patient {} ({} {})",
        obs.patient_id,
        reading.observed_on,
        reading.slot
    );
    Ok(id)
}

// Slot labels sort as text in the same order as `TimeSlot`.
pub(crate) fn observations_for(conn: &Connection, id: PatientId) -> Result<Vec<VitalObservation>> {
    let mut stmt = conn.prepare(
        "SELECT observed_on, slot, weight_kg, systolic, diastolic, heart_rate, respiratory_rate,
         temperature_c, urine_24h_ml, bp_stage
         FROM observations
         WHERE patient_id = ?1
         ORDER BY observed_on DESC, slot DESC, id DESC",
    )?;

    let rows = stmt
        .query_map(params![id.0], ObservationRow::read)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| row.into_observation(id)).collect()
}

struct ObservationRow {
    observed_on: String,
    slot: String,
    weight_kg: f64,
    systolic: u16,
    diastolic: u16,
    heart_rate: u16,
    respiratory_rate: u16,
    temperature_c: f64,
    urine_24h_ml: f64,
    bp_stage: String,
}

impl ObservationRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            observed_on: row.get(0)?,
            slot: row.get(1)?,
            weight_kg: row.get(2)?,
            systolic: row.get(3)?,
            diastolic: row.get(4)?,
            heart_rate: row.get(5)?,
            respiratory_rate: row.get(6)?,
            temperature_c: row.get(7)?,
            urine_24h_ml: row.get(8)?,
            bp_stage: row.get(9)?,
        })
    }

    fn into_observation(self, patient_id: PatientId) -> Result<VitalObservation> {
        let slot = TimeSlot::parse(&self.slot)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown slot {:?}", self.slot)))?;
        let bp_stage = BpStage::parse(&self.bp_stage)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown stage {:?}", self.bp_stage)))?;

        Ok(VitalObservation {
            patient_id,
            reading: VitalReading {
                observed_on: parse_date(&self.observed_on)?,
                slot,
                weight_kg: self.weight_kg,
                blood_pressure: BloodPressure::new(self.systolic, self.diastolic),
                heart_rate: self.heart_rate,
                respiratory_rate: self.respiratory_rate,
                temperature_c: self.temperature_c,
                urine_24h_ml: self.urine_24h_ml,
            },
            bp_stage,
        })
    }
}
