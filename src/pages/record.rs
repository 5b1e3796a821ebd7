//! Record capture page
//!
//! Manual entry and the live timer fill the same [`RecordForm`]. Stopping
//! the timer writes the rounded-up minutes and the stop time into it.

use super::{Notice, PageContext, PageError};
use crate::models::{Color, CreatedRecord, Feeling, NewRecord, SmellLevel, StoolType, Symptom};
use crate::timer::{duration_minutes, RecordTimer};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const SAVED_MESSAGE: &str = "Record saved!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMode {
    #[default]
    Manual,
    Timer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    pub record_date: NaiveDate,
    pub record_time: NaiveTime,
    pub duration_minutes: u32,
    pub stool_type: StoolType,
    pub color: Color,
    pub smell_level: SmellLevel,
    pub feeling: Feeling,
    pub symptoms: Vec<Symptom>,
    pub notes: String,
}

/// Drop seconds so the form holds an `HH:MM` time
fn to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

impl RecordForm {
    /// Defaults for a new entry at the current local time
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            record_date: now.date(),
            record_time: to_minute(now.time()),
            duration_minutes: 0,
            stool_type: StoolType::default(),
            color: Color::default(),
            smell_level: SmellLevel::default(),
            feeling: Feeling::default(),
            symptoms: Vec::new(),
            notes: String::new(),
        }
    }

    /// Add the symptom if absent, remove it if present
    pub fn toggle_symptom(&mut self, symptom: Symptom) {
        if let Some(pos) = self.symptoms.iter().position(|s| *s == symptom) {
            self.symptoms.remove(pos);
        } else {
            self.symptoms.push(symptom);
        }
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }

    pub fn to_request(&self) -> NewRecord {
        let notes = self.notes.trim();
        NewRecord {
            record_date: self.record_date.format("%Y-%m-%d").to_string(),
            record_time: self.record_time.format("%H:%M").to_string(),
            duration_minutes: (self.duration_minutes > 0).then_some(self.duration_minutes),
            stool_type: self.stool_type,
            color: self.color,
            smell_level: self.smell_level,
            feeling: self.feeling,
            symptoms: self.symptoms.clone(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }
}

impl Default for RecordForm {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RecordPage {
    ctx: PageContext,
    form: RecordForm,
    mode: EntryMode,
    timer: RecordTimer,
    submitting: bool,
    notice: Option<Notice>,
}

impl RecordPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            form: RecordForm::new(),
            mode: EntryMode::default(),
            timer: RecordTimer::new(),
            submitting: false,
            notice: None,
        }
    }

    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RecordForm {
        &mut self.form
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Switching back to manual entry stops a running timer without
    /// touching the form.
    pub fn set_mode(&mut self, mode: EntryMode) {
        if mode == EntryMode::Manual && self.timer.is_running() {
            self.timer.stop();
        }
        self.mode = mode;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs()
    }

    pub fn start_timer(&mut self) {
        self.mode = EntryMode::Timer;
        self.timer.start();
    }

    /// Stop the timer and fill duration and time of day into the form
    pub fn stop_timer(&mut self) -> u32 {
        self.stop_timer_at(Local::now().naive_local().time())
    }

    pub fn stop_timer_at(&mut self, now: NaiveTime) -> u32 {
        let minutes = duration_minutes(self.timer.stop());
        self.form.duration_minutes = minutes;
        self.form.record_time = to_minute(now);
        minutes
    }

    /// Send the form. Success resets it to fresh defaults.
    pub async fn submit(&mut self) -> Result<CreatedRecord, PageError> {
        self.notice = None;
        self.submitting = true;
        let result = self.try_submit().await;
        self.submitting = false;

        match &result {
            Ok(created) => {
                tracing::info!(record_id = %created.record_id, "Record saved");
                self.form = RecordForm::new();
                self.notice = Some(Notice::success(SAVED_MESSAGE));
            }
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
        result
    }

    async fn try_submit(&self) -> Result<CreatedRecord, PageError> {
        self.ctx.require_login()?;
        let request = self.form.to_request();
        self.ctx
            .backend
            .create_record(&request)
            .await
            .map_err(|e| self.ctx.api_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockServer;
    use crate::api::{ApiClient, Operation};
    use crate::pages::testing::{context, signed_in_context, FakeBackend};
    use crate::session::SessionContext;
    use std::sync::Arc;
    use std::time::Duration;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 15, 42)
            .unwrap()
    }

    #[test]
    fn test_form_defaults() {
        let form = RecordForm::at(morning());
        assert_eq!(form.record_time, NaiveTime::from_hms_opt(8, 15, 0).unwrap());
        assert_eq!(form.stool_type.code(), 4);
        assert_eq!(form.color, Color::Brown);
        assert_eq!(form.smell_level.level(), 2);
        assert_eq!(form.feeling, Feeling::Smooth);
        assert!(form.symptoms.is_empty());
        assert_eq!(form.duration_minutes, 0);
    }

    #[test]
    fn test_toggle_symptom() {
        let mut form = RecordForm::at(morning());
        form.toggle_symptom(Symptom::Bloating);
        form.toggle_symptom(Symptom::Nausea);
        assert!(form.has_symptom(Symptom::Bloating));
        form.toggle_symptom(Symptom::Bloating);
        assert_eq!(form.symptoms, vec![Symptom::Nausea]);
    }

    #[test]
    fn test_request_body() {
        let mut form = RecordForm::at(morning());
        form.notes = "  ".to_string();
        let request = form.to_request();
        assert_eq!(request.record_date, "2024-03-01");
        assert_eq!(request.record_time, "08:15");
        assert!(request.duration_minutes.is_none());
        assert!(request.notes.is_none());

        form.duration_minutes = 5;
        form.notes = "after coffee".to_string();
        let request = form.to_request();
        assert_eq!(request.duration_minutes, Some(5));
        assert_eq!(request.notes.as_deref(), Some("after coffee"));
    }

    #[tokio::test]
    async fn test_submit_requires_login() {
        let (ctx, backend) = context(FakeBackend::default());
        let mut page = RecordPage::new(ctx);

        let err = page.submit().await.unwrap_err();
        assert!(matches!(err, PageError::NotLoggedIn));
        assert_eq!(page.notice(), Some(&Notice::error("Please log in first")));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_resets_form() {
        let (ctx, backend) = signed_in_context(FakeBackend::default());
        let mut page = RecordPage::new(ctx);
        page.form_mut().stool_type = StoolType::new(6).unwrap();
        page.form_mut().toggle_symptom(Symptom::Mucus);

        let created = page.submit().await.unwrap();
        assert_eq!(created.record_id, "rec-1");
        assert_eq!(page.notice(), Some(&Notice::success(SAVED_MESSAGE)));
        assert_eq!(page.form().stool_type, StoolType::default());
        assert!(page.form().symptoms.is_empty());

        let sent = backend.created.lock().unwrap();
        assert_eq!(sent[0].stool_type.code(), 6);
        assert_eq!(sent[0].symptoms, vec![Symptom::Mucus]);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form() {
        let backend = FakeBackend::default();
        backend.fail(Operation::CreateRecord, 422, "Invalid stool type");
        let (ctx, _) = signed_in_context(backend);
        let mut page = RecordPage::new(ctx.clone());
        page.form_mut().notes = "keep me".to_string();

        page.submit().await.unwrap_err();
        assert_eq!(page.form().notes, "keep me");
        assert_eq!(page.notice(), Some(&Notice::error("Invalid stool type")));
        assert!(ctx.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_expired_session_on_submit() {
        let backend = FakeBackend::default();
        backend.fail(Operation::CreateRecord, 401, "Token expired");
        let (ctx, _) = signed_in_context(backend);
        let mut page = RecordPage::new(ctx.clone());

        let err = page.submit().await.unwrap_err();
        assert!(matches!(err, PageError::SessionExpired));
        assert!(!ctx.session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fills_duration() {
        let (ctx, _) = signed_in_context(FakeBackend::default());
        let mut page = RecordPage::new(ctx);

        page.start_timer();
        assert_eq!(page.mode(), EntryMode::Timer);
        tokio::time::sleep(Duration::from_millis(61_500)).await;
        assert_eq!(page.elapsed_secs(), 61);

        let stop_at = NaiveTime::from_hms_opt(9, 40, 12).unwrap();
        assert_eq!(page.stop_timer_at(stop_at), 2);
        assert_eq!(page.form().duration_minutes, 2);
        assert_eq!(page.form().record_time, NaiveTime::from_hms_opt(9, 40, 0).unwrap());
        assert!(!page.is_timer_running());
    }

    #[tokio::test]
    async fn test_manual_record_over_http() {
        let server = MockServer::builder()
            .respond(
                "POST /api/v1/records",
                200,
                serde_json::json!({"code": 200, "data": {"record_id": "r9"}}),
            )
            .spawn()
            .await;
        let session = SessionContext::in_memory();
        session
            .sign_in(&crate::models::AuthResponse {
                user_id: "u1".to_string(),
                email: "ann@example.com".to_string(),
                nickname: None,
                token: "tok".to_string(),
            })
            .unwrap();
        let client = ApiClient::new(&server.base_url(), session.clone()).unwrap();
        let mut page = RecordPage::new(PageContext::new(Arc::new(client), session));

        page.submit().await.unwrap();

        let body = server.requests()[0].json();
        let obj = body.as_object().unwrap();
        assert!(!obj.contains_key("duration_minutes"));
        assert!(!obj.contains_key("symptoms"));
        assert_eq!(body["stool_type"], 4);
        assert_eq!(body["color"], "brown");
        assert_eq!(body["feeling"], "smooth");
        assert_eq!(page.form().duration_minutes, 0);
        assert_eq!(page.notice().map(Notice::message), Some(SAVED_MESSAGE));
    }
}
