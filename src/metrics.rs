//! Aggregate performance metrics over a set of tasks.
//!
//! Every formula here is pure and defined for the empty set: sums degrade to
//! zero, ratios avoid division by zero, and the grade falls back to its
//! lowest bucket. Consumers may pass the full collection or any filtered
//! subset and get consistent results.

use crate::fields::{Grade, Status};
use crate::task::Task;

/// Hours of credit per completed task in the time-efficiency formula.
pub const EFFICIENCY_BASELINE_HOURS: f64 = 8.0;

/// Average ROI at or above which the grade is `Excellent`.
pub const GRADE_EXCELLENT_ROI: f64 = 100.0;
/// Average ROI at or above which the grade is `Good`.
pub const GRADE_GOOD_ROI: f64 = 50.0;
/// Average ROI at or above which the grade is `Fair`; below is
/// `NeedsImprovement`, which is also the empty-set default.
pub const GRADE_FAIR_ROI: f64 = 20.0;

/// Aggregate statistics recomputed whenever the task collection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_revenue: f64,
    pub total_time_taken: f64,
    pub time_efficiency_pct: f64,
    pub revenue_per_hour: f64,
    pub average_roi: f64,
    pub performance_grade: Grade,
}

/// Compute all aggregate metrics for the given tasks.
pub fn compute_metrics(tasks: &[Task]) -> Metrics {
    let total_revenue: f64 = tasks.iter().map(|t| t.revenue).sum();
    let total_time_taken: f64 = tasks.iter().map(|t| t.time_taken).sum();
    let done_count = tasks.iter().filter(|t| t.status == Status::Done).count();

    let revenue_per_hour = if total_time_taken > 0.0 {
        total_revenue / total_time_taken
    } else {
        0.0
    };

    // Credit each completed task with a fixed baseline of hours; the more
    // actual hours spent beyond that, the lower the percentage.
    let time_efficiency_pct = if total_time_taken > 0.0 {
        (done_count as f64 * EFFICIENCY_BASELINE_HOURS / total_time_taken * 100.0)
            .clamp(0.0, 100.0)
    } else {
        0.0
    };

    let average_roi = if tasks.is_empty() {
        0.0
    } else {
        tasks.iter().map(|t| t.revenue / t.time_taken).sum::<f64>() / tasks.len() as f64
    };

    Metrics {
        total_revenue,
        total_time_taken,
        time_efficiency_pct,
        revenue_per_hour,
        average_roi,
        performance_grade: grade_for(average_roi),
    }
}

/// Bucket an average ROI into a performance grade.
pub fn grade_for(average_roi: f64) -> Grade {
    if average_roi >= GRADE_EXCELLENT_ROI {
        Grade::Excellent
    } else if average_roi >= GRADE_GOOD_ROI {
        Grade::Good
    } else if average_roi >= GRADE_FAIR_ROI {
        Grade::Fair
    } else {
        Grade::NeedsImprovement
    }
}
