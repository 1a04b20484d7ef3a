use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A surgical episode. Owns the intraop record stream. Cases are managed by
/// the surrounding application; this crate reads them to resolve foreign
/// keys and only writes them from tests and seeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub case_number: String,
    pub patient_name: String,
    pub created_at: NaiveDateTime,
}
