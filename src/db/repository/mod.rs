//! Repository layer — entity-scoped database operations.
//!
//! Functions take the connection explicitly so callers (and tests) choose
//! the store; nothing here holds global state.

mod case;
mod entries;
mod intraop_record;

pub use case::*;
pub use entries::*;
pub use intraop_record::*;

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rusqlite::Connection;
    use uuid::Uuid;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Case, DrugEntry, FluidEntry, IntraopRecord};

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn seed_case(conn: &Connection) -> Uuid {
        let case = Case {
            id: Uuid::new_v4(),
            case_number: format!("TX-{}", &Uuid::new_v4().to_string()[..8]),
            patient_name: "Prueba, Paciente".into(),
            created_at: ts("2025-03-01 08:00:00"),
        };
        insert_case(conn, &case).unwrap();
        case.id
    }

    fn seed_record(conn: &Connection, case_id: Uuid, phase: &str, at: &str) -> Uuid {
        let record = IntraopRecord {
            id: Uuid::new_v4(),
            case_id,
            phase: phase.into(),
            timestamp: ts(at),
            heart_rate: Some(80),
            sys: Some(120),
            dia: Some(70),
            map: Some(87),
            cvp: Some(8),
            peep: Some(5),
            fio2: Some(50),
            tidal_volume: Some(450),
            observations: None,
            created_at: ts(at),
        };
        insert_record(conn, &record).unwrap();
        record.id
    }

    // ───────────────────────────────────────
    // Cascade behavior across entities
    // ───────────────────────────────────────

    #[test]
    fn deleting_case_cascades_to_records() {
        let conn = test_db();
        let case_id = seed_case(&conn);
        seed_record(&conn, case_id, "INDUCCION", "2025-03-01 10:00:00");
        seed_record(&conn, case_id, "DISECCION", "2025-03-01 11:00:00");

        delete_case(&conn, &case_id).unwrap();

        let remaining = list_records_for_case(&conn, &case_id).unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn deleting_record_cascades_to_sub_collections() {
        let conn = test_db();
        let case_id = seed_case(&conn);
        let record_id = seed_record(&conn, case_id, "ANHEPATICA", "2025-03-01 12:00:00");

        insert_fluid_entry(
            &conn,
            &FluidEntry {
                id: Uuid::new_v4(),
                record_id,
                name: "Ringer lactato".into(),
                volume_ml: 500,
            },
        )
        .unwrap();
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

        delete_record(&conn, &record_id).unwrap();

        assert!(list_fluid_entries(&conn, &record_id).unwrap().is_empty());
        assert!(list_drug_entries(&conn, &record_id).unwrap().is_empty());
    }

    #[test]
    fn record_insert_rejects_unknown_case() {
        let conn = test_db();
        let record = IntraopRecord {
            id: Uuid::new_v4(),
            case_id: Uuid::new_v4(),
            phase: "INDUCCION".into(),
            timestamp: ts("2025-03-01 10:00:00"),
            heart_rate: None,
            sys: None,
            dia: None,
            map: None,
            cvp: None,
            peep: None,
            fio2: None,
            tidal_volume: None,
            observations: None,
            created_at: ts("2025-03-01 10:00:00"),
        };
        assert!(insert_record(&conn, &record).is_err());
    }
}
