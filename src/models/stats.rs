//! Statistics payloads
//!
//! Aggregates are computed by the backend; these types only describe
//! their shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Statistics window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Week => "This week",
            Period::Month => "This month",
            Period::Year => "This year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "w" => Ok(Period::Week),
            "month" | "m" => Ok(Period::Month),
            "year" | "y" => Ok(Period::Year),
            other => Err(format!("Unknown period: {}. Use: week, month, year", other)),
        }
    }
}

/// Metric for `GET /stats/trends`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
    #[default]
    Frequency,
    Duration,
}

impl TrendMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendMetric::Frequency => "frequency",
            TrendMetric::Duration => "duration",
        }
    }
}

impl FromStr for TrendMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frequency" => Ok(TrendMetric::Frequency),
            "duration" => Ok(TrendMetric::Duration),
            other => Err(format!("Unknown metric: {}. Use: frequency, duration", other)),
        }
    }
}

/// Movements per part of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeDistribution {
    #[serde(default)]
    pub morning: u64,
    #[serde(default)]
    pub afternoon: u64,
    #[serde(default)]
    pub evening: u64,
}

/// `GET /stats/summary` payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub avg_frequency_per_day: f64,
    #[serde(default)]
    pub avg_duration_minutes: f64,
    /// Bristol type code (as string key) to count
    #[serde(default)]
    pub stool_type_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub time_distribution: TimeDistribution,
    #[serde(default)]
    pub health_score: f64,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub recorded_days: Option<u32>,
    #[serde(default)]
    pub coverage_rate: Option<f64>,
}

impl StatsSummary {
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

/// One day of a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub is_recorded: bool,
}

/// `GET /stats/trends` payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trends {
    #[serde(default)]
    pub trends: Vec<TrendPoint>,
    #[serde(default)]
    pub metric: String,
}
