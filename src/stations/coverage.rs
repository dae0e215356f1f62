use crate::types::query::{Candidate, CoverageRequest};
use crate::types::span::YearSpan;
use crate::types::station::YearRange;

/// Whether a station's reported years fully contain `period`.
///
/// Partial overlap does not count. A range with either bound unknown never covers.
pub fn covers(range: &YearRange, period: YearSpan) -> bool {
    match (range.start, range.end) {
        (Some(first), Some(last)) => first <= period.start && last >= period.end,
        _ => false,
    }
}

/// Splits candidates into those covering the request and the rest, keeping order in both.
pub fn split_by_coverage<'a>(
    candidates: Vec<Candidate<'a>>,
    request: CoverageRequest,
) -> (Vec<Candidate<'a>>, Vec<Candidate<'a>>) {
    candidates
        .into_iter()
        .partition(|c| covers(c.station.coverage(request.frequency), request.period))
}
