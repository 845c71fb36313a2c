use crate::error::ReportError;
use grna_protocol::{ClassifiedCandidate, LayoutWindow, SitePlacement};

/// Lower bound on window padding, in bp.
pub const MIN_PADDING_BP: u64 = 100;

/// `round(0.2 * span)`, exact in integer arithmetic. A fifth of an integer
/// never ends in .5, so there is no tie to break.
fn fifth_rounded(span: u64) -> u64 {
    ((span as u128 * 2 + 5) / 10) as u64
}

pub fn padding_for_span(span: u64) -> u64 {
    fifth_rounded(span).max(MIN_PADDING_BP)
}

/// Padded window over all start positions. Never zero-width: a single
/// clustered position gets `MIN_PADDING_BP` on each side.
pub fn compute_window(starts: &[u64]) -> Result<LayoutWindow, ReportError> {
    let (Some(&min_start), Some(&max_start)) = (starts.iter().min(), starts.iter().max()) else {
        return Err(ReportError::EmptyResult);
    };
    let padding = padding_for_span(max_start - min_start);
    Ok(LayoutWindow {
        min: min_start.saturating_sub(padding),
        max: max_start.saturating_add(padding),
    })
}

pub fn place_sites(rows: &[ClassifiedCandidate], window: &LayoutWindow) -> Vec<SitePlacement> {
    rows.iter()
        .map(|row| SitePlacement {
            rank: row.rank,
            start: row.candidate.start,
            strand: row.candidate.strand,
            fraction: window.fraction(row.candidate.start),
        })
        .collect()
}
