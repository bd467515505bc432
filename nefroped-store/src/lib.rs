//! SQLite record store for admissions and nursing rounds.
//!
//! The store only inserts and reads. Profiles and observations arrive with
//! their derived values already computed by `nefroped-core`.

use std::path::Path;

use nefroped_core::{ClinicalError, PatientId, PatientProfile, VitalObservation};
use rusqlite::Connection;

mod migrations;
mod observation;
mod patient;

pub use migrations::SCHEMA_VERSION;
pub use patient::PatientEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i64, supported: i64 },
    #[error("stored row could not be read: {0}")]
    Corrupt(String),
    #[error("observation rejected: {0}")]
    InvalidReading(#[from] ClinicalError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening record store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrations::current_version(&self.conn)
    }

    pub fn insert_patient(&self, profile: &PatientProfile) -> Result<PatientId> {
        patient::insert_patient(&self.conn, profile)
    }

    pub fn get_patient(&self, id: PatientId) -> Result<Option<PatientProfile>> {
        patient::get_patient(&self.conn, id)
    }

    pub fn list_patients(&self) -> Result<Vec<PatientEntry>> {
        patient::list_patients(&self.conn)
    }

    /// Case-insensitive partial match on the patient name, oldest first.
    pub fn search_patients(&self, fragment: &str) -> Result<Vec<(PatientId, PatientProfile)>> {
        patient::search_patients(&self.conn, fragment)
    }

    pub fn insert_observation(&self, observation: &VitalObservation) -> Result<i64> {
        observation::insert_observation(&self.conn, observation)
    }

    /// Rounds for one patient, most recent first.
    pub fn observations_for(&self, id: PatientId) -> Result<Vec<VitalObservation>> {
        observation::observations_for(&self.conn, id)
    }
}
