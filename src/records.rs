//! Record lifecycle: validated create/update/delete/duplicate operations
//! for intraoperative snapshots, plus derivation of dependent vitals.
//!
//! Every operation takes the connection explicitly and completes within the
//! calling request; the store is re-read on each call and is the single
//! source of truth.

use chrono::Local;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{
    phase_order, IntraopRecord, NewRecord, Patch, RecordDetail, RecordPatch,
};

// ═══════════════════════════════════════════
// Plausibility ranges
// ═══════════════════════════════════════════

/// Inclusive bounds a vital must fall within to be accepted. Out-of-range
/// values reject the whole operation; nothing is clamped. CVP carries no
/// documented clinical bound and is accepted as-is.
pub const HEART_RATE_RANGE: (i32, i32) = (20, 250);
pub const SYS_RANGE: (i32, i32) = (40, 300);
pub const DIA_RANGE: (i32, i32) = (20, 200);
pub const MAP_RANGE: (i32, i32) = (20, 300);
pub const PEEP_RANGE: (i32, i32) = (0, 30);
pub const FIO2_RANGE: (i32, i32) = (21, 100);
pub const TIDAL_VOLUME_RANGE: (i32, i32) = (0, 2000);

// ═══════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════

#[derive(Debug, Error)]
pub enum IntraopError {
    #[error("Case not found: {0}")]
    CaseNotFound(Uuid),

    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("No record to duplicate in phase {phase} of case {case_id}")]
    NoPriorRecord { case_id: Uuid, phase: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} out of range: {value} (valid {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

// ═══════════════════════════════════════════
// Derived vitals
// ═══════════════════════════════════════════

/// Mean arterial pressure from systolic/diastolic pressure, rounded to the
/// nearest integer (half away from zero). Absent when either input is
/// absent.
pub fn compute_map(sys: Option<i32>, dia: Option<i32>) -> Option<i32> {
    match (sys, dia) {
        (Some(s), Some(d)) => Some((f64::from(s + 2 * d) / 3.0).round() as i32),
        _ => None,
    }
}

// ═══════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════

fn check_range(
    field: &'static str,
    value: Option<i32>,
    (min, max): (i32, i32),
) -> Result<(), IntraopError> {
    match value {
        Some(v) if v < min || v > max => Err(IntraopError::OutOfRange {
            field,
            value: v,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

fn validate_vitals(record: &IntraopRecord) -> Result<(), IntraopError> {
    check_range("heart_rate", record.heart_rate, HEART_RATE_RANGE)?;
    check_range("sys", record.sys, SYS_RANGE)?;
    check_range("dia", record.dia, DIA_RANGE)?;
    check_range("map", record.map, MAP_RANGE)?;
    check_range("peep", record.peep, PEEP_RANGE)?;
    check_range("fio2", record.fio2, FIO2_RANGE)?;
    check_range("tidal_volume", record.tidal_volume, TIDAL_VOLUME_RANGE)?;
    Ok(())
}

// ═══════════════════════════════════════════
// Lifecycle operations
// ═══════════════════════════════════════════

/// Create a snapshot. Validates ranges before any write; derives `map` when
/// it was not supplied and both pressures are present.
pub fn create(conn: &Connection, input: &NewRecord) -> Result<RecordDetail, IntraopError> {
    let phase = input.phase.trim();
    if phase.is_empty() {
        return Err(IntraopError::MissingField("phase"));
    }
    if !db::case_exists(conn, &input.case_id)? {
        return Err(IntraopError::CaseNotFound(input.case_id));
    }

    let record = IntraopRecord {
        id: Uuid::new_v4(),
        case_id: input.case_id,
        phase: phase.to_string(),
        timestamp: input.timestamp,
        heart_rate: input.heart_rate,
        sys: input.sys,
        dia: input.dia,
        map: input.map.or_else(|| compute_map(input.sys, input.dia)),
        cvp: input.cvp,
        peep: input.peep,
        fio2: input.fio2,
        tidal_volume: input.tidal_volume,
        observations: input.observations.clone(),
        created_at: Local::now().naive_local(),
    };
    validate_vitals(&record)?;
    db::insert_record(conn, &record)?;

    tracing::info!(
        record_id = %record.id,
        case_id = %record.case_id,
        phase = %record.phase,
        "intraop record created"
    );

    Ok(RecordDetail {
        record,
        fluids: Vec::new(),
        drugs: Vec::new(),
        monitoring: Vec::new(),
    })
}

/// Get a snapshot with its sub-collections.
pub fn get(conn: &Connection, id: &Uuid) -> Result<RecordDetail, IntraopError> {
    let record = db::get_record(conn, id)?.ok_or(IntraopError::RecordNotFound(*id))?;
    load_detail(conn, record)
}

/// Records of a case for list/edit views, optionally narrowed to one phase.
/// Ordered by phase (procedure order, unknown labels after it) and then by
/// timestamp ascending. A case without records yields an empty vec.
pub fn list(
    conn: &Connection,
    case_id: &Uuid,
    phase: Option<&str>,
) -> Result<Vec<IntraopRecord>, IntraopError> {
    let mut records = match phase {
        Some(p) => db::list_records_for_phase(conn, case_id, p)?,
        None => db::list_records_for_case(conn, case_id)?,
    };
    records.sort_by(|a, b| {
        phase_order(&a.phase, &b.phase).then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    Ok(records)
}

/// Apply a partial update. Touched fields re-validate; `map` re-derives
/// only when `sys` or `dia` is in the patch and `map` itself is not. An
/// explicit `map: null` clears the stored value and re-derives from the
/// merged pressures.
pub fn update(
    conn: &Connection,
    id: &Uuid,
    patch: &RecordPatch,
) -> Result<RecordDetail, IntraopError> {
    let current = db::get_record(conn, id)?.ok_or(IntraopError::RecordNotFound(*id))?;

    let mut merged = current.clone();
    if let Some(ref phase) = patch.phase {
        let phase = phase.trim();
        if phase.is_empty() {
            return Err(IntraopError::MissingField("phase"));
        }
        merged.phase = phase.to_string();
    }
    if let Some(ts) = patch.timestamp {
        merged.timestamp = ts;
    }
    merged.heart_rate = patch.heart_rate.apply(current.heart_rate);
    merged.sys = patch.sys.apply(current.sys);
    merged.dia = patch.dia.apply(current.dia);
    merged.map = patch.map.apply(current.map);
    merged.cvp = patch.cvp.apply(current.cvp);
    merged.peep = patch.peep.apply(current.peep);
    merged.fio2 = patch.fio2.apply(current.fio2);
    merged.tidal_volume = patch.tidal_volume.apply(current.tidal_volume);
    merged.observations = patch.observations.clone().apply(current.observations);

    let pressures_touched = patch.sys.is_present() || patch.dia.is_present();
    match patch.map {
        // Explicit value wins over derivation
        Patch::Value(_) => {}
        // Explicit null: clear and let the calculator re-derive
        Patch::Null => merged.map = compute_map(merged.sys, merged.dia),
        Patch::Absent if pressures_touched => merged.map = compute_map(merged.sys, merged.dia),
        Patch::Absent => {}
    }

    validate_vitals(&merged)?;
    db::update_record(conn, &merged)?;

    tracing::info!(record_id = %id, "intraop record updated");
    load_detail(conn, merged)
}

/// Delete a snapshot. The store cascades its sub-collections.
pub fn delete(conn: &Connection, id: &Uuid) -> Result<(), IntraopError> {
    db::delete_record(conn, id).map_err(|e| match e {
        DatabaseError::NotFound { .. } => IntraopError::RecordNotFound(*id),
        other => IntraopError::Store(other),
    })?;

    tracing::info!(record_id = %id, "intraop record deleted");
    Ok(())
}

/// Copy the most recent snapshot of a case+phase into a new record stamped
/// with the current time. Exists to speed up repetitive entry; vitals
/// rarely change drastically between consecutive snapshots. Every vital is
/// copied verbatim; `map` counts as explicitly supplied and is never
/// recomputed. Sub-collections stay with the source.
pub fn duplicate_last(
    conn: &Connection,
    case_id: &Uuid,
    phase: &str,
) -> Result<RecordDetail, IntraopError> {
    if phase.trim().is_empty() {
        return Err(IntraopError::MissingField("phase"));
    }
    if !db::case_exists(conn, case_id)? {
        return Err(IntraopError::CaseNotFound(*case_id));
    }

    let source = db::latest_record_for_phase(conn, case_id, phase)?.ok_or_else(|| {
        IntraopError::NoPriorRecord {
            case_id: *case_id,
            phase: phase.to_string(),
        }
    })?;

    // Source vitals were validated when the source was written; copying
    // them cannot leave the ranges.
    let now = Local::now().naive_local();
    let record = IntraopRecord {
        id: Uuid::new_v4(),
        case_id: *case_id,
        phase: source.phase.clone(),
        timestamp: now,
        heart_rate: source.heart_rate,
        sys: source.sys,
        dia: source.dia,
        map: source.map,
        cvp: source.cvp,
        peep: source.peep,
        fio2: source.fio2,
        tidal_volume: source.tidal_volume,
        observations: source.observations.clone(),
        created_at: now,
    };
    db::insert_record(conn, &record)?;

    tracing::info!(
        record_id = %record.id,
        source_id = %source.id,
        phase = %record.phase,
        "intraop record duplicated"
    );

    Ok(RecordDetail {
        record,
        fluids: Vec::new(),
        drugs: Vec::new(),
        monitoring: Vec::new(),
    })
}

fn load_detail(conn: &Connection, record: IntraopRecord) -> Result<RecordDetail, IntraopError> {
    let fluids = db::list_fluid_entries(conn, &record.id)?;
    let drugs = db::list_drug_entries(conn, &record.id)?;
    let monitoring = db::list_monitoring_entries(conn, &record.id)?;
    Ok(RecordDetail {
        record,
        fluids,
        drugs,
        monitoring,
    })
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
