use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DrugEntry, FluidEntry, MonitoringEntry, Patch};

/// One physiological snapshot inside a surgical phase. All vitals are
/// optional and independently nullable; `map` is derived from `sys`/`dia`
/// at write time unless the clinician supplied it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntraopRecord {
    pub id: Uuid,
    pub case_id: Uuid,
    pub phase: String,
    pub timestamp: NaiveDateTime,
    pub heart_rate: Option<i32>,
    pub sys: Option<i32>,
    pub dia: Option<i32>,
    pub map: Option<i32>,
    pub cvp: Option<i32>,
    pub peep: Option<i32>,
    pub fio2: Option<i32>,
    pub tidal_volume: Option<i32>,
    pub observations: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input for creating a snapshot. `case_id` and `timestamp` are required by
/// construction; a present `map` is treated as explicitly supplied and is
/// never overwritten by derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub case_id: Uuid,
    pub phase: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub sys: Option<i32>,
    #[serde(default)]
    pub dia: Option<i32>,
    #[serde(default)]
    pub map: Option<i32>,
    #[serde(default)]
    pub cvp: Option<i32>,
    #[serde(default)]
    pub peep: Option<i32>,
    #[serde(default)]
    pub fio2: Option<i32>,
    #[serde(default)]
    pub tidal_volume: Option<i32>,
    #[serde(default)]
    pub observations: Option<String>,
}

/// Partial update of a snapshot. Vitals are three-state (`Patch`): an
/// omitted key leaves the stored value untouched, an explicit `null` clears
/// it, a value replaces it. `case_id` is immutable and has no field here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub heart_rate: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub sys: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub dia: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub map: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub cvp: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub peep: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub fio2: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub tidal_volume: Patch<i32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub observations: Patch<String>,
}

/// Full snapshot with its sub-collections, as returned to the presentation
/// layer. Sub-collections are composed in from their own tables; this crate
/// stores and returns them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: IntraopRecord,
    pub fluids: Vec<FluidEntry>,
    pub drugs: Vec<DrugEntry>,
    pub monitoring: Vec<MonitoringEntry>,
}
