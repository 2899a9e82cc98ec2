//! Experiment completion and revenue projections
//!
//! Completion dates extrapolate the slowest arm's daily traffic to a target
//! sample size. A second date rounds the run up to whole weeks from the
//! start, since weekly seasonality makes partial weeks misleading.

use crate::error::{AnalysisError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days in a full traffic cycle
pub const WEEK_CYCLE_DAYS: i64 = 7;

/// Inputs for [`project_completion`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub start_date: NaiveDate,
    pub today: NaiveDate,
    /// Visits per arm so far; the smallest arm paces the experiment
    pub arm_visits: Vec<u64>,
    /// Visits each arm needs before the experiment can be called
    pub target_sample_size: Option<u64>,
}

/// Where an experiment stands and when it should finish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentProjection {
    pub days_running: i64,
    /// Visits per day for the slowest arm, rounded
    pub daily_traffic_rate: Option<u64>,
    pub projected_end: Option<NaiveDate>,
    /// Projected end rounded up to a whole number of weeks from the start
    pub projected_end_week_cycle: Option<NaiveDate>,
}

impl ExperimentProjection {
    /// True once the target sample size has been met
    pub fn is_complete(&self, today: NaiveDate) -> bool {
        self.projected_end == Some(today)
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Days running: {}\n", self.days_running));

        match self.daily_traffic_rate {
            Some(rate) => report.push_str(&format!("Daily traffic (slowest arm): {}\n", rate)),
            None => report.push_str("Daily traffic (slowest arm): n/a\n"),
        }

        match (self.projected_end, self.projected_end_week_cycle) {
            (Some(end), Some(week_end)) => {
                report.push_str(&format!("Projected end (sample size): {}\n", end));
                report.push_str(&format!("Projected end (full weeks): {}\n", week_end));
            }
            _ => report.push_str("Projected end: n/a\n"),
        }

        report
    }
}

/// Project when an experiment reaches its target sample size
pub fn project_completion(input: &ProjectionInput) -> Result<ExperimentProjection> {
    let current_sample_size = *input.arm_visits.iter().min().ok_or(AnalysisError::EmptyArms)?;
    let days_running = (input.today - input.start_date).num_days();

    let mut projection = ExperimentProjection {
        days_running,
        daily_traffic_rate: None,
        projected_end: None,
        projected_end_week_cycle: None,
    };

    if days_running <= 0 {
        return Ok(projection);
    }

    let daily_rate = current_sample_size as f64 / days_running as f64;
    projection.daily_traffic_rate = Some(daily_rate.round() as u64);

    let Some(target) = input.target_sample_size else {
        return Ok(projection);
    };
    if daily_rate <= 0.0 {
        return Ok(projection);
    }

    if target > current_sample_size {
        let remaining = (target - current_sample_size) as f64;
        let days_remaining = (remaining / daily_rate).ceil() as u64;
        let end = add_days(input.today, days_remaining)?;

        let days_since_start = (end - input.start_date).num_days();
        let whole_weeks = (days_since_start + WEEK_CYCLE_DAYS - 1) / WEEK_CYCLE_DAYS;
        let week_end = add_days(input.start_date, (whole_weeks * WEEK_CYCLE_DAYS) as u64)?;

        projection.projected_end = Some(end);
        projection.projected_end_week_cycle = Some(week_end);
    } else {
        projection.projected_end = Some(input.today);
        projection.projected_end_week_cycle = Some(input.today);
    }

    tracing::debug!(
        days_running,
        daily_rate,
        target,
        projected_end = ?projection.projected_end,
        "Projected experiment completion"
    );

    Ok(projection)
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or(AnalysisError::ProjectionOverflow { date, days })
}

/// Inputs for [`project_annual_revenue`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueInput {
    /// Revenue attributed to the control arm so far
    pub control_revenue: f64,
    pub control_visits: u64,
    /// Visitors across every arm, control included
    pub total_visitors: u64,
    pub days_running: u64,
    /// Uplift of the primary metric, percent
    pub uplift_percent: f64,
}

/// Annualised revenue effect of shipping a variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueProjection {
    pub control_revenue_per_visitor: f64,
    pub variant_revenue_per_visitor: f64,
    pub daily_impact: f64,
    pub annual_revenue: i64,
}

/// Apply the primary metric's uplift to revenue per visitor and annualise
/// the difference over all traffic
///
/// `None` when control has no visits, nothing has run yet, or the uplift is
/// not finite.
pub fn project_annual_revenue(input: &RevenueInput) -> Option<RevenueProjection> {
    if input.control_visits == 0 || input.days_running == 0 || !input.uplift_percent.is_finite() {
        return None;
    }

    let control_rate = input.control_revenue / input.control_visits as f64;
    let variant_rate = control_rate * (1.0 + input.uplift_percent / 100.0);
    let daily_visitors = input.total_visitors as f64 / input.days_running as f64;
    let daily_impact = daily_visitors * variant_rate - daily_visitors * control_rate;

    Some(RevenueProjection {
        control_revenue_per_visitor: control_rate,
        variant_revenue_per_visitor: variant_rate,
        daily_impact,
        annual_revenue: (daily_impact * 365.0).round() as i64,
    })
}
