//! AI analysis payloads

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Weekly,
    Monthly,
}

impl AnalysisType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::Weekly => "weekly",
            AnalysisType::Monthly => "monthly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisType::Weekly => "Weekly analysis",
            AnalysisType::Monthly => "Monthly analysis",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(AnalysisType::Weekly),
            "monthly" | "month" => Ok(AnalysisType::Monthly),
            other => Err(format!("Unknown analysis type: {}. Use: weekly, monthly", other)),
        }
    }
}

/// Body of `POST /ai/analyze`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub analysis_type: AnalysisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// `POST /ai/analyze` payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub analysis_id: Option<String>,
    #[serde(default)]
    pub health_score: f64,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
    /// Where the analysis came from: "ai_api", "local" or "none"
    #[serde(default)]
    pub analysis_source: Option<String>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.suggestions.is_empty() && self.warnings.is_empty()
    }
}

/// Entry of `GET /ai/analyses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub analysis_id: String,
    #[serde(default)]
    pub analysis_type: String,
    #[serde(default)]
    pub period_start: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
    #[serde(default)]
    pub health_score: f64,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AnalysisHistory {
    #[serde(default)]
    pub analyses: Vec<AnalysisSummary>,
}

/// Short note on where a result came from
pub fn source_label(source: Option<&str>) -> &'static str {
    match source {
        Some("ai_api") => "AI model",
        Some("local") => "Local rules",
        Some("none") => "No data",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_without_records() {
        let json = r#"{
            "analysis_id": null,
            "health_score": 0,
            "insights": [],
            "suggestions": [],
            "warnings": [{"type": "no_data", "message": "No data yet"}],
            "analysis_source": "none"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert!(result.analysis_id.is_none());
        assert!(!result.is_empty());
        assert_eq!(result.warnings[0].kind, "no_data");
        assert_eq!(source_label(result.analysis_source.as_deref()), "No data");
    }

    #[test]
    fn test_analyze_request_body() {
        let body = serde_json::to_value(AnalyzeRequest::new(AnalysisType::Monthly)).unwrap();
        assert_eq!(body, serde_json::json!({"analysis_type": "monthly"}));
    }
}
