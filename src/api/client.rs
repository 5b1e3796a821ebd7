//! HTTP client for the health-record REST API

use super::{ApiError, ApiResult, Backend};
use crate::models::{
    AnalysisHistory, AnalysisResult, AnalysisSummary, AnalyzeRequest, AuthResponse,
    CreatedRecord, LoginRequest, NewRecord, PasswordChange, Period, RecordPage, RecordQuery,
    RegisterRequest, SettingsUpdate, StatsSummary, TrendMetric, Trends, UserSettings,
};
use crate::session::SessionContext;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Base URL used when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8001/api/v1";

/// Backend operations, used for fallback error messages and log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    CreateRecord,
    ListRecords,
    DeleteRecord,
    StatsSummary,
    StatsTrends,
    Analyze,
    ListAnalyses,
    GetSettings,
    UpdateSettings,
    ChangePassword,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::CreateRecord => "create_record",
            Operation::ListRecords => "list_records",
            Operation::DeleteRecord => "delete_record",
            Operation::StatsSummary => "stats_summary",
            Operation::StatsTrends => "stats_trends",
            Operation::Analyze => "analyze",
            Operation::ListAnalyses => "list_analyses",
            Operation::GetSettings => "get_settings",
            Operation::UpdateSettings => "update_settings",
            Operation::ChangePassword => "change_password",
        }
    }

    /// Message shown when the backend gives no `detail`
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Register => "Registration failed",
            Operation::Login => "Login failed",
            Operation::CreateRecord => "Failed to create record",
            Operation::ListRecords => "Failed to fetch records",
            Operation::DeleteRecord => "Failed to delete record",
            Operation::StatsSummary => "Failed to fetch statistics",
            Operation::StatsTrends => "Failed to fetch trends",
            Operation::Analyze => "Analysis failed",
            Operation::ListAnalyses => "Failed to fetch analysis history",
            Operation::GetSettings => "Failed to load settings",
            Operation::UpdateSettings => "Failed to update settings",
            Operation::ChangePassword => "Failed to change password",
        }
    }
}

/// Error body returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ErrorBody {
    /// `detail` is a string for handled errors and a list of
    /// `{loc, msg, type}` objects for request validation failures.
    fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        }
    }
}

/// Strip the optional `{"data": ...}` envelope from a success body
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// REST client bound to one base URL and one session
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client; a trailing slash on `base_url` is ignored
    pub fn new(base_url: &str, session: SessionContext) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("gutlog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .client
            .request(method, url)
            .header("X-Request-Id", &request_id);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        (builder, request_id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        op: Operation,
        builder: RequestBuilder,
        request_id: String,
    ) -> ApiResult<T> {
        tracing::debug!(op = op.name(), request_id = %request_id, "Sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(op = op.name(), request_id = %request_id, "Request failed: {}", e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message())
                .unwrap_or_else(|| op.fallback_message().to_string());

            tracing::warn!(
                op = op.name(),
                request_id = %request_id,
                status = status.as_u16(),
                "Backend error: {}",
                message
            );
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        tracing::debug!(
            op = op.name(),
            request_id = %request_id,
            status = status.as_u16(),
            "Request completed"
        );

        serde_json::from_value(unwrap_envelope(body)).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, op: Operation, path: &str) -> ApiResult<T> {
        let (builder, request_id) = self.request(Method::GET, path);
        self.send(op, builder, request_id).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        op: Operation,
        path: &str,
        query: &Q,
    ) -> ApiResult<T> {
        let (builder, request_id) = self.request(Method::GET, path);
        self.send(op, builder.query(query), request_id).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        op: Operation,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let (builder, request_id) = self.request(method, path);
        self.send(op, builder.json(body), request_id).await
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.send_json(Operation::Register, Method::POST, "/auth/register", request)
            .await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.send_json(Operation::Login, Method::POST, "/auth/login", request)
            .await
    }

    async fn create_record(&self, record: &NewRecord) -> ApiResult<CreatedRecord> {
        self.send_json(Operation::CreateRecord, Method::POST, "/records", record)
            .await
    }

    async fn list_records(&self, query: &RecordQuery) -> ApiResult<RecordPage> {
        self.get_with_query(Operation::ListRecords, "/records", &query.to_pairs())
            .await
    }

    async fn delete_record(&self, record_id: &str) -> ApiResult<()> {
        let path = format!("/records/{}", urlencoding::encode(record_id));
        let (builder, request_id) = self.request(Method::DELETE, &path);
        let _: IgnoredAny = self
            .send(Operation::DeleteRecord, builder, request_id)
            .await?;
        Ok(())
    }

    async fn stats_summary(&self, period: Period) -> ApiResult<StatsSummary> {
        self.get_with_query(
            Operation::StatsSummary,
            "/stats/summary",
            &[("period", period.as_str())],
        )
        .await
    }

    async fn stats_trends(&self, metric: TrendMetric, period: Period) -> ApiResult<Trends> {
        self.get_with_query(
            Operation::StatsTrends,
            "/stats/trends",
            &[("metric", metric.as_str()), ("period", period.as_str())],
        )
        .await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalysisResult> {
        self.send_json(Operation::Analyze, Method::POST, "/ai/analyze", request)
            .await
    }

    async fn list_analyses(&self) -> ApiResult<Vec<AnalysisSummary>> {
        let history: AnalysisHistory = self.get(Operation::ListAnalyses, "/ai/analyses").await?;
        Ok(history.analyses)
    }

    async fn get_settings(&self) -> ApiResult<UserSettings> {
        self.get(Operation::GetSettings, "/auth/settings").await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> ApiResult<UserSettings> {
        self.send_json(
            Operation::UpdateSettings,
            Method::PUT,
            "/auth/settings",
            update,
        )
        .await
    }

    async fn change_password(&self, change: &PasswordChange) -> ApiResult<()> {
        let _: IgnoredAny = self
            .send_json(
                Operation::ChangePassword,
                Method::PUT,
                "/auth/password",
                change,
            )
            .await?;
        Ok(())
    }
}
