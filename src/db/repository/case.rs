use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::sqlite::TS_FORMAT;
use crate::db::DatabaseError;
use crate::models::Case;

/// Insert a case. Primarily a seed path: cases belong to the surrounding
/// application, this crate reads them for foreign-key checks.
pub fn insert_case(conn: &Connection, case: &Case) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO cases (id, case_number, patient_name, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            case.id.to_string(),
            case.case_number,
            case.patient_name,
            case.created_at.format(TS_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Get a case by ID.
pub fn get_case(conn: &Connection, id: &Uuid) -> Result<Option<Case>, DatabaseError> {
    conn.query_row(
        "SELECT id, case_number, patient_name, created_at FROM cases WHERE id = ?1",
        params![id.to_string()],
        row_to_case,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Whether a case with this ID exists.
pub fn case_exists(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM cases WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Delete a case. The schema cascades to its records and their
/// sub-collections.
pub fn delete_case(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM cases WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "case".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_case(row: &rusqlite::Row) -> Result<Case, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(3)?;

    Ok(Case {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        case_number: row.get(1)?,
        patient_name: row.get(2)?,
        created_at: NaiveDateTime::parse_from_str(&created_str, TS_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_case(number: &str) -> Case {
        Case {
            id: Uuid::new_v4(),
            case_number: number.into(),
            patient_name: "Prueba, Paciente".into(),
            created_at: chrono::Local::now().naive_local(),
        }
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let conn = open_memory_database().unwrap();
        let case = make_case("TX-2025-014");
        insert_case(&conn, &case).unwrap();

        let stored = get_case(&conn, &case.id).unwrap().unwrap();
        assert_eq!(stored.case_number, "TX-2025-014");
        assert_eq!(stored.id, case.id);
    }

    #[test]
    fn exists_reflects_inserts() {
        let conn = open_memory_database().unwrap();
        let case = make_case("TX-2025-015");
        assert!(!case_exists(&conn, &case.id).unwrap());
        insert_case(&conn, &case).unwrap();
        assert!(case_exists(&conn, &case.id).unwrap());
    }

    #[test]
    fn delete_nonexistent_fails() {
        let conn = open_memory_database().unwrap();
        let result = delete_case(&conn, &Uuid::new_v4());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn duplicate_case_number_rejected() {
        let conn = open_memory_database().unwrap();
        insert_case(&conn, &make_case("TX-2025-016")).unwrap();
        assert!(insert_case(&conn, &make_case("TX-2025-016")).is_err());
    }
}
