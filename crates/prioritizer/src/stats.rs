use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskmate_core::Task;

/// Dashboard counters over a point-in-time read of every task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_tasks: usize,
    pub active_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage, one decimal.
    pub completion_rate: f64,
    pub overdue_tasks: usize,
    pub average_urgency: f64,
    pub average_importance: f64,
    pub average_completion_hours: f64,
    pub focus_score: f64,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Mean rounded to two decimals; 0 for an empty slice.
fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round_to(values.iter().sum::<f64>() / values.len() as f64, 2)
}

pub fn build_stats(tasks: &[Task]) -> StatsSnapshot {
    build_stats_at(tasks, Utc::now())
}

pub fn build_stats_at(tasks: &[Task], now: DateTime<Utc>) -> StatsSnapshot {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();

    let overdue_tasks = tasks
        .iter()
        .filter(|t| !t.completed && t.due_date.is_some_and(|due| due < now))
        .count();

    let completion_rate = if total_tasks > 0 {
        round_to(completed_tasks as f64 / total_tasks as f64 * 100.0, 1)
    } else {
        0.0
    };

    let urgency: Vec<f64> = tasks.iter().map(|t| t.urgency).collect();
    let importance: Vec<f64> = tasks.iter().map(|t| t.importance).collect();

    let completion_hours: Vec<f64> = tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
        .map(|elapsed| elapsed.num_milliseconds() as f64 / 3_600_000.0)
        .filter(|hours| *hours >= 0.0)
        .collect();

    let average_urgency = average(&urgency);
    let average_importance = average(&importance);

    StatsSnapshot {
        total_tasks,
        active_tasks: total_tasks - completed_tasks,
        completed_tasks,
        completion_rate,
        overdue_tasks,
        average_urgency,
        average_importance,
        average_completion_hours: average(&completion_hours),
        focus_score: round_to(0.6 * average_importance + 0.4 * average_urgency, 2),
    }
}
