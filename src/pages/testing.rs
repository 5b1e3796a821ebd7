//! In-memory backend for page tests

use super::PageContext;
use crate::api::{ApiError, ApiResult, Backend, Operation};
use crate::models::{
    AnalysisResult, AnalysisSummary, AnalyzeRequest, AuthResponse, CreatedRecord, LoginRequest,
    NewRecord, PasswordChange, Period, Record, RecordPage, RecordQuery, RegisterRequest,
    SettingsUpdate, StatsSummary, TrendMetric, Trends, UserSettings,
};
use crate::session::SessionContext;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct FakeBackend {
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
    pub created: Mutex<Vec<NewRecord>>,
    pub records: Mutex<Vec<Record>>,
    pub summary: Mutex<StatsSummary>,
    pub analysis: Mutex<AnalysisResult>,
    pub settings: Mutex<UserSettings>,
    pub last_query: Mutex<Option<RecordQuery>>,
    pub last_period: Mutex<Option<Period>>,
}

impl FakeBackend {
    /// Make every call to `op` fail with the given status
    pub fn fail(&self, op: Operation, status: u16, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op.name(), (status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.calls().iter().filter(|c| **c == op.name()).count()
    }

    fn enter(&self, op: Operation) -> ApiResult<()> {
        self.calls.lock().unwrap().push(op.name());
        match self.failures.lock().unwrap().get(op.name()) {
            Some((status, message)) => Err(ApiError::from_status(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn auth(email: &str, nickname: Option<String>) -> AuthResponse {
        AuthResponse {
            user_id: "user-1".to_string(),
            email: email.to_string(),
            nickname,
            token: "tok-fake".to_string(),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.enter(Operation::Register)?;
        Ok(Self::auth(&request.email, request.nickname.clone()))
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.enter(Operation::Login)?;
        Ok(Self::auth(&request.email, None))
    }

    async fn create_record(&self, record: &NewRecord) -> ApiResult<CreatedRecord> {
        self.enter(Operation::CreateRecord)?;
        let mut created = self.created.lock().unwrap();
        created.push(record.clone());
        Ok(CreatedRecord {
            record_id: format!("rec-{}", created.len()),
            lid: None,
            created_at: None,
        })
    }

    async fn list_records(&self, query: &RecordQuery) -> ApiResult<RecordPage> {
        self.enter(Operation::ListRecords)?;
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(RecordPage {
            records: self.records.lock().unwrap().clone(),
            pagination: None,
        })
    }

    async fn delete_record(&self, record_id: &str) -> ApiResult<()> {
        self.enter(Operation::DeleteRecord)?;
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.record_id != record_id);
        Ok(())
    }

    async fn stats_summary(&self, period: Period) -> ApiResult<StatsSummary> {
        self.enter(Operation::StatsSummary)?;
        *self.last_period.lock().unwrap() = Some(period);
        Ok(self.summary.lock().unwrap().clone())
    }

    async fn stats_trends(&self, metric: TrendMetric, _period: Period) -> ApiResult<Trends> {
        self.enter(Operation::StatsTrends)?;
        Ok(Trends {
            trends: Vec::new(),
            metric: metric.as_str().to_string(),
        })
    }

    async fn analyze(&self, _request: &AnalyzeRequest) -> ApiResult<AnalysisResult> {
        self.enter(Operation::Analyze)?;
        Ok(self.analysis.lock().unwrap().clone())
    }

    async fn list_analyses(&self) -> ApiResult<Vec<AnalysisSummary>> {
        self.enter(Operation::ListAnalyses)?;
        Ok(Vec::new())
    }

    async fn get_settings(&self) -> ApiResult<UserSettings> {
        self.enter(Operation::GetSettings)?;
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> ApiResult<UserSettings> {
        self.enter(Operation::UpdateSettings)?;
        let mut settings = self.settings.lock().unwrap();
        if let Some(dev_mode) = update.dev_mode {
            settings.dev_mode = dev_mode;
        }
        if let Some(key) = &update.ai_api_key {
            settings.ai_api_key = Some(key.clone());
        }
        if let Some(url) = &update.ai_api_url {
            settings.ai_api_url = Some(url.clone());
        }
        if let Some(model) = &update.ai_model {
            settings.ai_model = Some(model.clone());
        }
        if let Some(auto_title) = update.ai_auto_title {
            settings.ai_auto_title = auto_title;
        }
        Ok(settings.clone())
    }

    async fn change_password(&self, _change: &PasswordChange) -> ApiResult<()> {
        self.enter(Operation::ChangePassword)
    }
}

pub(crate) fn context(backend: FakeBackend) -> (PageContext, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let ctx = PageContext::new(backend.clone(), SessionContext::in_memory());
    (ctx, backend)
}

pub(crate) fn signed_in_context(backend: FakeBackend) -> (PageContext, Arc<FakeBackend>) {
    let (ctx, backend) = context(backend);
    ctx.session
        .sign_in(&FakeBackend::auth("ann@example.com", Some("Ann".to_string())))
        .unwrap();
    (ctx, backend)
}
