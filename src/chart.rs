//! Phase chart assembly: timestamp-ordered points and contiguous phase
//! bands for the intraop time-series view.
//!
//! Points are re-sorted by timestamp alone before segmentation; the
//! phase-grouped order used by list/edit views does not apply here.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::phase_color;

/// Minimum band width, in pixels, before its phase label is drawn.
/// Narrower bands stay color-banded but unlabeled.
pub const MIN_LABEL_WIDTH_PX: f64 = 48.0;

/// Maximal run of same-labeled consecutive points. Indices refer to the
/// timestamp-sorted point sequence; `end_index` is inclusive. Derived on
/// demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSegment {
    pub phase: String,
    pub start_index: usize,
    pub end_index: usize,
}

/// One chartable point: the snapshot vitals the time-series view plots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub record_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub phase: String,
    pub heart_rate: Option<i32>,
    pub sys: Option<i32>,
    pub dia: Option<i32>,
    pub map: Option<i32>,
    pub cvp: Option<i32>,
}

/// Render-ready band for one segment. A band spans from its segment's first
/// point to the first point of the NEXT segment (the chart's right edge for
/// the final one); ending it at its own last point instead would mis-align
/// the band with the point that actually changed phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseBand {
    pub phase: String,
    pub color: String,
    pub start_x: f64,
    pub end_x: f64,
    pub label_visible: bool,
}

/// Chart source for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseChart {
    pub points: Vec<ChartPoint>,
    pub segments: Vec<PhaseSegment>,
}

/// Partition an ordered label sequence into contiguous phase segments. A
/// new segment starts at every point whose label differs from the previous
/// point's; the first point always starts segment 0. Empty input yields no
/// segments; a single point yields one single-point segment.
pub fn segment_phases<S: AsRef<str>>(labels: &[S]) -> Vec<PhaseSegment> {
    let mut segments: Vec<PhaseSegment> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        match segments.last_mut() {
            Some(open) if open.phase == label.as_ref() => open.end_index = i,
            _ => segments.push(PhaseSegment {
                phase: label.as_ref().to_string(),
                start_index: i,
                end_index: i,
            }),
        }
    }
    segments
}

/// Lay segments out over `chart_width` pixels, one equal horizontal slot
/// per point. Labels are suppressed on bands narrower than
/// [`MIN_LABEL_WIDTH_PX`].
pub fn phase_bands(
    segments: &[PhaseSegment],
    point_count: usize,
    chart_width: f64,
) -> Vec<PhaseBand> {
    if point_count == 0 {
        return Vec::new();
    }
    let slot = chart_width / point_count as f64;

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let start_x = segment.start_index as f64 * slot;
            let end_x = match segments.get(i + 1) {
                Some(next) => next.start_index as f64 * slot,
                None => chart_width,
            };
            PhaseBand {
                phase: segment.phase.clone(),
                color: phase_color(&segment.phase).to_string(),
                start_x,
                end_x,
                label_visible: end_x - start_x >= MIN_LABEL_WIDTH_PX,
            }
        })
        .collect()
}

/// Assemble the chart source for a case: points sorted by timestamp alone
/// and the phase segments over that sequence.
pub fn case_chart(conn: &Connection, case_id: &Uuid) -> Result<CaseChart, DatabaseError> {
    let records = db::list_records_for_case(conn, case_id)?;

    let points: Vec<ChartPoint> = records
        .iter()
        .map(|r| ChartPoint {
            record_id: r.id,
            timestamp: r.timestamp,
            phase: r.phase.clone(),
            heart_rate: r.heart_rate,
            sys: r.sys,
            dia: r.dia,
            map: r.map,
            cvp: r.cvp,
        })
        .collect();

    let labels: Vec<&str> = records.iter().map(|r| r.phase.as_str()).collect();
    let segments = segment_phases(&labels);

    Ok(CaseChart { points, segments })
}
