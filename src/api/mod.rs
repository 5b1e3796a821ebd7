//! Backend API
//!
//! [`Backend`] is the seam every page talks through. [`ApiClient`] is the
//! HTTP implementation; tests substitute an in-memory one.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiClient, Operation, DEFAULT_API_BASE};
pub use error::{ApiError, ApiResult};

use crate::models::{
    AnalysisResult, AnalysisSummary, AnalyzeRequest, AuthResponse, CreatedRecord, LoginRequest,
    NewRecord, PasswordChange, Period, RecordPage, RecordQuery, RegisterRequest, SettingsUpdate,
    StatsSummary, TrendMetric, Trends, UserSettings,
};
use async_trait::async_trait;

/// Operations offered by the health-record backend
#[async_trait]
pub trait Backend: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    async fn create_record(&self, record: &NewRecord) -> ApiResult<CreatedRecord>;

    async fn list_records(&self, query: &RecordQuery) -> ApiResult<RecordPage>;

    async fn delete_record(&self, record_id: &str) -> ApiResult<()>;

    async fn stats_summary(&self, period: Period) -> ApiResult<StatsSummary>;

    async fn stats_trends(&self, metric: TrendMetric, period: Period) -> ApiResult<Trends>;

    async fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalysisResult>;

    async fn list_analyses(&self) -> ApiResult<Vec<AnalysisSummary>>;

    async fn get_settings(&self) -> ApiResult<UserSettings>;

    async fn update_settings(&self, update: &SettingsUpdate) -> ApiResult<UserSettings>;

    async fn change_password(&self, change: &PasswordChange) -> ApiResult<()>;
}
