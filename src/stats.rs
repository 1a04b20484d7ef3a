//! Per-phase statistics over the numeric vitals of a case. Used for inline
//! phase summaries and as a sanity check during data entry.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DatabaseError;

/// avg/min/max over the non-null observations of one vital within a phase.
/// All `None` when the phase holds no observation of that vital; records
/// that left the field empty don't contribute zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStats {
    pub avg: Option<i32>,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

/// Statistics for one case+phase. `count` is the number of matching
/// records, independent of how many populated any given vital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStats {
    pub count: u32,
    pub heart_rate: FieldStats,
    pub sys: FieldStats,
    pub dia: FieldStats,
    pub map: FieldStats,
    pub cvp: FieldStats,
    pub peep: FieldStats,
    pub fio2: FieldStats,
    pub tidal_volume: FieldStats,
}

/// Aggregate one case+phase. A combination with zero records yields
/// `count = 0` and all-null field stats, not an error. Averages are rounded
/// to the nearest integer for display consistency with the entered vitals.
pub fn phase_stats(
    conn: &Connection,
    case_id: &Uuid,
    phase: &str,
) -> Result<PhaseStats, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(*),
                AVG(heart_rate), MIN(heart_rate), MAX(heart_rate),
                AVG(sys), MIN(sys), MAX(sys),
                AVG(dia), MIN(dia), MAX(dia),
                AVG(map), MIN(map), MAX(map),
                AVG(cvp), MIN(cvp), MAX(cvp),
                AVG(peep), MIN(peep), MAX(peep),
                AVG(fio2), MIN(fio2), MAX(fio2),
                AVG(tidal_volume), MIN(tidal_volume), MAX(tidal_volume)
         FROM intraop_records
         WHERE case_id = ?1 AND phase = ?2",
        params![case_id.to_string(), phase],
        |row| {
            Ok(PhaseStats {
                count: row.get(0)?,
                heart_rate: field_stats(row, 1)?,
                sys: field_stats(row, 4)?,
                dia: field_stats(row, 7)?,
                map: field_stats(row, 10)?,
                cvp: field_stats(row, 13)?,
                peep: field_stats(row, 16)?,
                fio2: field_stats(row, 19)?,
                tidal_volume: field_stats(row, 22)?,
            })
        },
    )
    .map_err(DatabaseError::from)
}

fn field_stats(row: &rusqlite::Row, base: usize) -> Result<FieldStats, rusqlite::Error> {
    let avg: Option<f64> = row.get(base)?;
    Ok(FieldStats {
        avg: avg.map(|v| v.round() as i32),
        min: row.get(base + 1)?,
        max: row.get(base + 2)?,
    })
}
