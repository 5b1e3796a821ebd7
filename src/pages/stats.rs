//! Statistics page
//!
//! Fetches the backend summary for the selected period. All aggregates are
//! computed server side; the page only derives display percentages.

use super::{LoadState, PageContext, PageError};
use crate::models::{Period, StatsSummary, StoolType, TrendMetric, Trends};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionBar {
    pub stool_type: StoolType,
    pub count: u64,
    pub percent: u32,
}

/// Per-type share of the seven Bristol buckets, rounded to whole percent.
/// An empty distribution yields 0% everywhere.
pub fn stool_type_percentages(distribution: &BTreeMap<String, u64>) -> Vec<DistributionBar> {
    let total: u64 = distribution.values().sum();

    StoolType::all()
        .map(|stool_type| {
            let count = distribution
                .get(&stool_type.code().to_string())
                .copied()
                .unwrap_or(0);
            let percent = if total == 0 {
                0
            } else {
                (count as f64 / total as f64 * 100.0).round() as u32
            };
            DistributionBar {
                stool_type,
                count,
                percent,
            }
        })
        .collect()
}

pub fn health_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent"
    } else if score >= 60.0 {
        "Good"
    } else if score >= 40.0 {
        "Fair"
    } else {
        "Needs attention"
    }
}

/// What the stats page should show right now
#[derive(Debug)]
pub enum StatsView<'a> {
    Idle,
    Loading,
    LoginRequired(&'a PageError),
    Failed(&'a PageError),
    /// No records in the period; point the user at the record page
    Empty,
    Ready(&'a StatsSummary),
}

pub struct StatsPage {
    ctx: PageContext,
    period: Period,
    summary: LoadState<StatsSummary>,
    trends: LoadState<Trends>,
}

impl StatsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            period: Period::default(),
            summary: LoadState::Idle,
            trends: LoadState::Idle,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn summary(&self) -> &LoadState<StatsSummary> {
        &self.summary
    }

    pub fn trends(&self) -> &LoadState<Trends> {
        &self.trends
    }

    pub async fn open(&mut self) {
        self.load().await;
    }

    pub async fn select_period(&mut self, period: Period) {
        self.period = period;
        self.load().await;
    }

    pub async fn load(&mut self) {
        self.summary = LoadState::Loading;
        let result = match self.ctx.require_login() {
            Ok(()) => self
                .ctx
                .backend
                .stats_summary(self.period)
                .await
                .map_err(|e| self.ctx.api_error(e)),
            Err(e) => Err(e),
        };
        self.summary = LoadState::from_result(result);
    }

    pub async fn load_trends(&mut self, metric: TrendMetric) {
        self.trends = LoadState::Loading;
        let result = match self.ctx.require_login() {
            Ok(()) => self
                .ctx
                .backend
                .stats_trends(metric, self.period)
                .await
                .map_err(|e| self.ctx.api_error(e)),
            Err(e) => Err(e),
        };
        self.trends = LoadState::from_result(result);
    }

    pub fn view(&self) -> StatsView<'_> {
        match &self.summary {
            LoadState::Idle => StatsView::Idle,
            LoadState::Loading => StatsView::Loading,
            LoadState::Failed(e) if e.needs_login() => StatsView::LoginRequired(e),
            LoadState::Failed(e) => StatsView::Failed(e),
            LoadState::Loaded(summary) if summary.is_empty() => StatsView::Empty,
            LoadState::Loaded(summary) => StatsView::Ready(summary),
        }
    }
}
