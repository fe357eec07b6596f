//! Batch-to-window matching
//!
//! Decides whether an ingredient batch counts toward a reporting window.
//! A batch carries an optional [period_start, period_end] interval; either
//! bound may be null (open-ended), and legacy batches predate the period
//! columns entirely and only have a creation timestamp.
//!
//! Two predicates exist on purpose and must not be unified:
//!
//! - [`matches_report_window`] (profit reports): interval overlap with
//!   open-ended bounds; only a batch with *no* period at all falls back to
//!   its creation timestamp.
//! - [`matches_dashboard_window`] (owner dashboard): a batch missing
//!   *either* bound is treated as dated by its creation timestamp.

/// Interval overlap between a batch period and a reporting window
///
/// A batch overlaps [from, to] iff
/// `(period_end is null or period_end >= from) and
///  (period_start is null or period_start <= to)`.
/// Null window bounds make that side of the window unbounded. All
/// comparisons are inclusive, so touching endpoints count as overlap.
pub fn period_overlaps(
    period_start: Option<i64>,
    period_end: Option<i64>,
    from: Option<i64>,
    to: Option<i64>,
) -> bool {
    let end_ok = match (period_end, from) {
        (Some(end), Some(from)) => end >= from,
        _ => true,
    };
    let start_ok = match (period_start, to) {
        (Some(start), Some(to)) => start <= to,
        _ => true,
    };
    end_ok && start_ok
}

/// Whether a timestamp falls inside the window (inclusive, open-ended nulls)
fn created_in_window(created_at: i64, from: Option<i64>, to: Option<i64>) -> bool {
    from.is_none_or(|f| created_at >= f) && to.is_none_or(|t| created_at <= t)
}

/// Profit-report matching rule
///
/// Batches with at least one period bound use the overlap test; a batch
/// with no period at all is matched on its creation timestamp instead of
/// being unconditionally included.
pub fn matches_report_window(
    period_start: Option<i64>,
    period_end: Option<i64>,
    created_at: i64,
    from: Option<i64>,
    to: Option<i64>,
) -> bool {
    if period_start.is_none() && period_end.is_none() {
        return created_in_window(created_at, from, to);
    }
    period_overlaps(period_start, period_end, from, to)
}

/// Dashboard matching rule
///
/// Stricter about half-entered periods: if either bound is missing the
/// batch is dated by its creation timestamp.
pub fn matches_dashboard_window(
    period_start: Option<i64>,
    period_end: Option<i64>,
    created_at: i64,
    from: Option<i64>,
    to: Option<i64>,
) -> bool {
    match (period_start, period_end) {
        (Some(start), Some(end)) => period_overlaps(Some(start), Some(end), from, to),
        _ => created_in_window(created_at, from, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Window used throughout: [100, 200]
    const FROM: Option<i64> = Some(100);
    const TO: Option<i64> = Some(200);

    #[test]
    fn test_overlap_both_bounds_set() {
        // fully inside
        assert!(period_overlaps(Some(120), Some(180), FROM, TO));
        // spanning the whole window
        assert!(period_overlaps(Some(50), Some(250), FROM, TO));
        // straddling the start
        assert!(period_overlaps(Some(50), Some(150), FROM, TO));
        // straddling the end
        assert!(period_overlaps(Some(150), Some(250), FROM, TO));
        // entirely before
        assert!(!period_overlaps(Some(10), Some(99), FROM, TO));
        // entirely after
        assert!(!period_overlaps(Some(201), Some(300), FROM, TO));
    }

    #[test]
    fn test_overlap_boundary_equality() {
        // period_end == from: still overlaps (inclusive)
        assert!(period_overlaps(Some(50), Some(100), FROM, TO));
        // period_start == to: still overlaps (inclusive)
        assert!(period_overlaps(Some(200), Some(300), FROM, TO));
        // one millisecond off either way: no overlap
        assert!(!period_overlaps(Some(50), Some(99), FROM, TO));
        assert!(!period_overlaps(Some(201), Some(300), FROM, TO));
    }

    #[test]
    fn test_overlap_open_ended_start() {
        // null period_start: batch extends infinitely into the past
        assert!(period_overlaps(None, Some(150), FROM, TO));
        assert!(period_overlaps(None, Some(100), FROM, TO));
        // ends before the window opens
        assert!(!period_overlaps(None, Some(99), FROM, TO));
    }

    #[test]
    fn test_overlap_open_ended_end() {
        // null period_end: batch extends infinitely into the future
        assert!(period_overlaps(Some(150), None, FROM, TO));
        assert!(period_overlaps(Some(200), None, FROM, TO));
        // starts after the window closes
        assert!(!period_overlaps(Some(201), None, FROM, TO));
    }

    #[test]
    fn test_overlap_both_bounds_null() {
        // the raw interval test includes everything when both bounds are
        // null — the report rule intercepts this case before it gets here
        assert!(period_overlaps(None, None, FROM, TO));
    }

    #[test]
    fn test_overlap_unbounded_window() {
        assert!(period_overlaps(Some(10), Some(20), None, None));
        assert!(period_overlaps(Some(10), Some(20), None, TO));
        assert!(!period_overlaps(Some(10), Some(20), FROM, None));
        assert!(period_overlaps(Some(150), Some(160), FROM, None));
    }

    #[test]
    fn test_report_rule_uses_overlap_when_any_bound_set() {
        assert!(matches_report_window(Some(120), Some(180), 0, FROM, TO));
        assert!(matches_report_window(None, Some(150), 0, FROM, TO));
        assert!(matches_report_window(Some(150), None, 0, FROM, TO));
        // created_at is irrelevant once a period bound exists
        assert!(!matches_report_window(Some(10), Some(20), 150, FROM, TO));
    }

    #[test]
    fn test_report_rule_legacy_fallback() {
        // no period at all: match on creation timestamp, not unconditional
        assert!(matches_report_window(None, None, 150, FROM, TO));
        assert!(matches_report_window(None, None, 100, FROM, TO));
        assert!(matches_report_window(None, None, 200, FROM, TO));
        assert!(!matches_report_window(None, None, 99, FROM, TO));
        assert!(!matches_report_window(None, None, 201, FROM, TO));
    }

    #[test]
    fn test_report_rule_unbounded_window_includes_everything() {
        assert!(matches_report_window(Some(10), Some(20), 0, None, None));
        assert!(matches_report_window(None, None, 0, None, None));
        assert!(matches_report_window(None, Some(5), 0, None, None));
    }

    #[test]
    fn test_dashboard_rule_requires_both_bounds_for_overlap() {
        // both bounds: plain overlap
        assert!(matches_dashboard_window(Some(120), Some(180), 0, FROM, TO));
        assert!(!matches_dashboard_window(Some(10), Some(20), 150, FROM, TO));
    }

    #[test]
    fn test_dashboard_rule_single_null_falls_back_to_created_at() {
        // half-entered period: the dashboard dates the batch by entry time,
        // where the report rule would have treated the interval as open-ended
        assert!(matches_dashboard_window(None, Some(150), 150, FROM, TO));
        assert!(!matches_dashboard_window(None, Some(150), 50, FROM, TO));
        assert!(matches_dashboard_window(Some(150), None, 150, FROM, TO));
        assert!(!matches_dashboard_window(Some(150), None, 250, FROM, TO));
    }

    #[test]
    fn test_dashboard_rule_both_null_falls_back_to_created_at() {
        assert!(matches_dashboard_window(None, None, 150, FROM, TO));
        assert!(!matches_dashboard_window(None, None, 250, FROM, TO));
    }

    #[test]
    fn test_rules_disagree_on_half_open_periods() {
        // The divergence that keeps these two predicates separate: a batch
        // with only period_end inside the window but created outside it.
        let (start, end, created) = (None, Some(150), 300);
        assert!(matches_report_window(start, end, created, FROM, TO));
        assert!(!matches_dashboard_window(start, end, created, FROM, TO));
    }
}
