use std::cmp::Ordering;

/// Standard surgical phases in procedure order, with the band color the
/// chart layer uses for each. A record's `phase` stays a free string:
/// legacy and imported data carry labels outside this list, and those must
/// round-trip untouched.
pub const PHASE_CATALOG: &[(&str, &str)] = &[
    ("INDUCCION", "#4e79a7"),
    ("DISECCION", "#f28e2b"),
    ("ANHEPATICA", "#e15759"),
    ("PRE_REPERFUSION", "#76b7b2"),
    ("POST_REPERFUSION", "#59a14f"),
    ("FIN_VIA_BILIAR", "#edc948"),
    ("CIERRE", "#b07aa1"),
];

/// Band color for labels outside the catalog.
pub const UNKNOWN_PHASE_COLOR: &str = "#9aa0a6";

/// Position of a label in the procedure order, if it is a catalog phase.
pub fn phase_position(label: &str) -> Option<usize> {
    PHASE_CATALOG.iter().position(|(name, _)| *name == label)
}

/// Band color for a phase label.
pub fn phase_color(label: &str) -> &'static str {
    PHASE_CATALOG
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_PHASE_COLOR)
}

/// Display ordering for list views: catalog phases first in procedure
/// order, unknown labels after them alphabetically. Used only for
/// presentation, never for correctness checks.
pub fn phase_order(a: &str, b: &str) -> Ordering {
    let rank = |label: &str| phase_position(label).unwrap_or(PHASE_CATALOG.len());
    rank(a).cmp(&rank(b)).then_with(|| {
        if phase_position(a).is_none() && phase_position(b).is_none() {
            a.cmp(b)
        } else {
            Ordering::Equal
        }
    })
}
