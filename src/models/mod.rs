//! Wire types shared by the API client, pages and renderers.

mod analysis;
mod record;
mod stats;
mod user;

pub use analysis::{
    source_label, AnalysisResult, AnalysisSummary, AnalysisType, AnalyzeRequest, Insight,
    Suggestion, Warning,
};
pub(crate) use analysis::AnalysisHistory;
pub use record::{
    Color, CreatedRecord, Feeling, NewRecord, Pagination, Record, RecordPage, RecordQuery,
    SmellLevel, StoolType, Symptom,
};
pub use stats::{Period, StatsSummary, TimeDistribution, TrendMetric, TrendPoint, Trends};
pub use user::{
    redact, AuthResponse, LoginRequest, PasswordChange, RegisterRequest, SettingsUpdate, User,
    UserSettings,
};
