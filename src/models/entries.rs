use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fluid administered at a snapshot (crystalloids, blood products, ...).
/// Pass-through data: stored and returned with the record, never computed
/// over by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidEntry {
    pub id: Uuid,
    pub record_id: Uuid,
    pub name: String,
    pub volume_ml: i32,
}

/// Drug administered at a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugEntry {
    pub id: Uuid,
    pub record_id: Uuid,
    pub name: String,
    pub dose: f64,
    pub unit: String,
}

/// Free-form monitoring reading attached to a snapshot (lab values,
/// device readouts outside the fixed vital columns).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringEntry {
    pub id: Uuid,
    pub record_id: Uuid,
    pub parameter: String,
    pub value: String,
}
