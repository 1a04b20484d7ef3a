use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{DrugEntry, FluidEntry, MonitoringEntry};

/// Insert a fluid entry for a record.
pub fn insert_fluid_entry(conn: &Connection, entry: &FluidEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO fluid_entries (id, record_id, name, volume_ml)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.id.to_string(),
            entry.record_id.to_string(),
            entry.name,
            entry.volume_ml,
        ],
    )?;
    Ok(())
}

/// Fluid entries of a record, in insertion order.
pub fn list_fluid_entries(
    conn: &Connection,
    record_id: &Uuid,
) -> Result<Vec<FluidEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, record_id, name, volume_ml FROM fluid_entries
         WHERE record_id = ?1 ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map(params![record_id.to_string()], |row| {
        Ok(FluidEntry {
            id: parse_uuid(row, 0)?,
            record_id: parse_uuid(row, 1)?,
            name: row.get(2)?,
            volume_ml: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

/// Insert a drug entry for a record.
pub fn insert_drug_entry(conn: &Connection, entry: &DrugEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO drug_entries (id, record_id, name, dose, unit)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.id.to_string(),
            entry.record_id.to_string(),
            entry.name,
            entry.dose,
            entry.unit,
        ],
    )?;
    Ok(())
}

/// Drug entries of a record, in insertion order.
pub fn list_drug_entries(
    conn: &Connection,
    record_id: &Uuid,
) -> Result<Vec<DrugEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, record_id, name, dose, unit FROM drug_entries
         WHERE record_id = ?1 ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map(params![record_id.to_string()], |row| {
        Ok(DrugEntry {
            id: parse_uuid(row, 0)?,
            record_id: parse_uuid(row, 1)?,
            name: row.get(2)?,
            dose: row.get(3)?,
            unit: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

/// Insert a monitoring entry for a record.
pub fn insert_monitoring_entry(
    conn: &Connection,
    entry: &MonitoringEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO monitoring_entries (id, record_id, parameter, value)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.id.to_string(),
            entry.record_id.to_string(),
            entry.parameter,
            entry.value,
        ],
    )?;
    Ok(())
}

/// Monitoring entries of a record, in insertion order.
pub fn list_monitoring_entries(
    conn: &Connection,
    record_id: &Uuid,
) -> Result<Vec<MonitoringEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, record_id, parameter, value FROM monitoring_entries
         WHERE record_id = ?1 ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map(params![record_id.to_string()], |row| {
        Ok(MonitoringEntry {
            id: parse_uuid(row, 0)?,
            record_id: parse_uuid(row, 1)?,
            parameter: row.get(2)?,
            value: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

fn parse_uuid(row: &rusqlite::Row, idx: usize) -> Result<Uuid, rusqlite::Error> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::db::repository::{insert_case, insert_record};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Case, IntraopRecord};

    fn seed_record(conn: &Connection) -> Uuid {
        let ts = NaiveDateTime::parse_from_str("2025-03-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let case = Case {
            id: Uuid::new_v4(),
            case_number: "TX-2025-021".into(),
            patient_name: "Prueba, Paciente".into(),
            created_at: ts,
        };
        insert_case(conn, &case).unwrap();

        let record = IntraopRecord {
            id: Uuid::new_v4(),
            case_id: case.id,
            phase: "ANHEPATICA".into(),
            timestamp: ts,
            heart_rate: None,
            sys: None,
            dia: None,
            map: None,
            cvp: None,
            peep: None,
            fio2: None,
            tidal_volume: None,
            observations: None,
            created_at: ts,
        };
        insert_record(conn, &record).unwrap();
        record.id
    }

    #[test]
    fn fluid_entries_roundtrip_in_order() {
        let conn = open_memory_database().unwrap();
        let record_id = seed_record(&conn);

        for (name, volume) in [("Ringer lactato", 500), ("Plasma", 250)] {
            insert_fluid_entry(
                &conn,
                &FluidEntry {
                    id: Uuid::new_v4(),
                    record_id,
                    name: name.into(),
                    volume_ml: volume,
                },
            )
            .unwrap();
        }

        let entries = list_fluid_entries(&conn, &record_id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Ringer lactato");
        assert_eq!(entries[1].volume_ml, 250);
    }

    #[test]
    fn drug_entry_keeps_fractional_dose() {
        let conn = open_memory_database().unwrap();
        let record_id = seed_record(&conn);

        insert_drug_entry(
            &conn,
            &DrugEntry {
                id: Uuid::new_v4(),
                record_id,
                name: "Noradrenalina".into(),
                dose: 0.12,
                unit: "mcg/kg/min".into(),
            },
        )
        .unwrap();

        let entries = list_drug_entries(&conn, &record_id).unwrap();
        assert_eq!(entries.len(), 1);
        assert!((entries[0].dose - 0.12).abs() < 1e-9);
        assert_eq!(entries[0].unit, "mcg/kg/min");
    }

    #[test]
    fn monitoring_entries_empty_for_fresh_record() {
        let conn = open_memory_database().unwrap();
        let record_id = seed_record(&conn);
        assert!(list_monitoring_entries(&conn, &record_id).unwrap().is_empty());
    }
}
