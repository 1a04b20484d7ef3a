use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::sqlite::TS_FORMAT;
use crate::db::DatabaseError;
use crate::models::IntraopRecord;

const RECORD_COLUMNS: &str = "id, case_id, phase, timestamp, heart_rate, sys, dia, map, cvp, \
                              peep, fio2, tidal_volume, observations, created_at";

/// Insert an intraop record.
pub fn insert_record(conn: &Connection, record: &IntraopRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO intraop_records (id, case_id, phase, timestamp, heart_rate, sys, dia, map,
         cvp, peep, fio2, tidal_volume, observations, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            record.id.to_string(),
            record.case_id.to_string(),
            record.phase,
            record.timestamp.format(TS_FORMAT).to_string(),
            record.heart_rate,
            record.sys,
            record.dia,
            record.map,
            record.cvp,
            record.peep,
            record.fio2,
            record.tidal_volume,
            record.observations,
            record.created_at.format(TS_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Get a record by ID.
pub fn get_record(conn: &Connection, id: &Uuid) -> Result<Option<IntraopRecord>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM intraop_records WHERE id = ?1"),
        params![id.to_string()],
        row_to_record,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// All records of a case, ordered by timestamp ascending. Insertion order is
/// broken deliberately: the chart layer depends on chronological order alone.
pub fn list_records_for_case(
    conn: &Connection,
    case_id: &Uuid,
) -> Result<Vec<IntraopRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM intraop_records
         WHERE case_id = ?1
         ORDER BY timestamp ASC, created_at ASC"
    ))?;
    let rows = stmt.query_map(params![case_id.to_string()], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

/// Records of one case+phase, ordered by timestamp ascending.
pub fn list_records_for_phase(
    conn: &Connection,
    case_id: &Uuid,
    phase: &str,
) -> Result<Vec<IntraopRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM intraop_records
         WHERE case_id = ?1 AND phase = ?2
         ORDER BY timestamp ASC, created_at ASC"
    ))?;
    let rows = stmt.query_map(params![case_id.to_string(), phase], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

/// The most recent record of a case+phase by snapshot timestamp.
pub fn latest_record_for_phase(
    conn: &Connection,
    case_id: &Uuid,
    phase: &str,
) -> Result<Option<IntraopRecord>, DatabaseError> {
    conn.query_row(
        &format!(
            "SELECT {RECORD_COLUMNS} FROM intraop_records
             WHERE case_id = ?1 AND phase = ?2
             ORDER BY timestamp DESC, created_at DESC
             LIMIT 1"
        ),
        params![case_id.to_string(), phase],
        row_to_record,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Rewrite a record's mutable columns. `case_id` is immutable and not part
/// of the UPDATE.
pub fn update_record(conn: &Connection, record: &IntraopRecord) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE intraop_records SET phase = ?2, timestamp = ?3, heart_rate = ?4, sys = ?5,
         dia = ?6, map = ?7, cvp = ?8, peep = ?9, fio2 = ?10, tidal_volume = ?11,
         observations = ?12
         WHERE id = ?1",
        params![
            record.id.to_string(),
            record.phase,
            record.timestamp.format(TS_FORMAT).to_string(),
            record.heart_rate,
            record.sys,
            record.dia,
            record.map,
            record.cvp,
            record.peep,
            record.fio2,
            record.tidal_volume,
            record.observations,
        ],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "intraop_record".into(),
            id: record.id.to_string(),
        });
    }
    Ok(())
}

/// Delete a record by ID. The schema cascades to its sub-collections.
pub fn delete_record(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM intraop_records WHERE id = ?1",
        params![id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "intraop_record".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_record(row: &rusqlite::Row) -> Result<IntraopRecord, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let case_str: String = row.get(1)?;
    let ts_str: String = row.get(3)?;
    let created_str: String = row.get(13)?;

    let parse_uuid = |idx: usize, s: &str| {
        Uuid::parse_str(s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    };
    let parse_ts = |idx: usize, s: &str| {
        NaiveDateTime::parse_from_str(s, TS_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    };

    Ok(IntraopRecord {
        id: parse_uuid(0, &id_str)?,
        case_id: parse_uuid(1, &case_str)?,
        phase: row.get(2)?,
        timestamp: parse_ts(3, &ts_str)?,
        heart_rate: row.get(4)?,
        sys: row.get(5)?,
        dia: row.get(6)?,
        map: row.get(7)?,
        cvp: row.get(8)?,
        peep: row.get(9)?,
        fio2: row.get(10)?,
        tidal_volume: row.get(11)?,
        observations: row.get(12)?,
        created_at: parse_ts(13, &created_str)?,
    })
}
