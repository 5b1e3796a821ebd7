//! Settings page: developer mode, AI provider, password, test data

use super::{Notice, PageContext, PageError};
use crate::devtools::{clamp_count, generate_records, submit_batch, GenerationReport};
use crate::models::{PasswordChange, SettingsUpdate, UserSettings};
use crate::pages::auth::MIN_PASSWORD_LEN;
use chrono::NaiveDate;
use rand::Rng;

pub struct SettingsPage {
    ctx: PageContext,
    settings: UserSettings,
    loaded: bool,
    saving: bool,
    notice: Option<Notice>,
}

impl SettingsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            settings: UserSettings::default(),
            loaded: false,
            saving: false,
            notice: None,
        }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn dev_mode(&self) -> bool {
        self.settings.dev_mode
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_logged_in(&self) -> bool {
        self.ctx.session.is_authenticated()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Load settings when a session exists. Failures other than an expired
    /// session are logged and leave the defaults in place.
    pub async fn open(&mut self) {
        if !self.is_logged_in() {
            return;
        }

        match self.ctx.backend.get_settings().await {
            Ok(settings) => {
                self.settings = settings;
                self.loaded = true;
            }
            Err(e) if e.is_unauthorized() => {
                let err = self.ctx.api_error(e);
                self.notice = Some(Notice::error(err.to_string()));
            }
            Err(e) => tracing::warn!("Failed to load settings: {}", e),
        }
    }

    /// Flip developer mode immediately; the change is reverted if the
    /// backend rejects it.
    pub async fn toggle_dev_mode(&mut self) -> Result<bool, PageError> {
        if let Err(e) = self.ctx.require_login() {
            self.notice = Some(Notice::error(e.to_string()));
            return Err(e);
        }

        let enabled = !self.settings.dev_mode;
        self.settings.dev_mode = enabled;
        self.saving = true;
        let result = self
            .ctx
            .backend
            .update_settings(&SettingsUpdate::dev_mode(enabled))
            .await;
        self.saving = false;

        match result {
            Ok(_) => {
                tracing::info!(dev_mode = enabled, "Developer mode updated");
                self.notice = None;
                Ok(enabled)
            }
            Err(e) => {
                self.settings.dev_mode = !enabled;
                let err = self.ctx.api_error(e);
                self.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Save AI provider fields; unset fields keep their stored values
    pub async fn update_ai(&mut self, update: SettingsUpdate) -> Result<(), PageError> {
        let result = self.try_update_ai(&update).await;
        match &result {
            Ok(()) => self.notice = Some(Notice::success("Settings saved")),
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
        result
    }

    async fn try_update_ai(&mut self, update: &SettingsUpdate) -> Result<(), PageError> {
        self.ctx.require_login()?;
        if update.is_empty() {
            return Err(PageError::validation("Nothing to update"));
        }

        self.saving = true;
        let result = self.ctx.backend.update_settings(update).await;
        self.saving = false;

        let settings = result.map_err(|e| self.ctx.api_error(e))?;
        self.settings = settings;
        Ok(())
    }

    pub async fn change_password(
        &mut self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), PageError> {
        let result = self.try_change_password(current, new, confirm).await;
        match &result {
            Ok(()) => self.notice = Some(Notice::success("Password changed")),
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
        result
    }

    async fn try_change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), PageError> {
        self.ctx.require_login()?;
        if new != confirm {
            return Err(PageError::validation("Passwords don't match"));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(PageError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let change = PasswordChange {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        self.ctx
            .backend
            .change_password(&change)
            .await
            .map_err(|e| self.ctx.api_error(e))
    }

    /// Generate `count` (clamped to 1-30) daily records from `start` and
    /// submit them one by one. Requires developer mode.
    pub async fn generate_test_data<R: Rng>(
        &mut self,
        count: u32,
        start: NaiveDate,
        rng: &mut R,
    ) -> Result<GenerationReport, PageError> {
        if let Err(e) = self.ctx.require_login() {
            self.notice = Some(Notice::error(e.to_string()));
            return Err(e);
        }
        if !self.settings.dev_mode {
            let err = PageError::DevModeDisabled;
            self.notice = Some(Notice::error(err.to_string()));
            return Err(err);
        }

        let requested = clamp_count(count);
        let records = generate_records(requested, start, rng);
        let report = submit_batch(self.ctx.backend.as_ref(), &records, requested).await;
        self.notice = Some(Notice::success(report.message()));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Operation;
    use crate::pages::testing::{context, signed_in_context, FakeBackend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_open_loads_settings() {
        let backend = FakeBackend::default();
        backend.settings.lock().unwrap().dev_mode = true;
        let (ctx, _) = signed_in_context(backend);
        let mut page = SettingsPage::new(ctx);

        page.open().await;
        assert!(page.is_loaded());
        assert!(page.dev_mode());
    }

    #[tokio::test]
    async fn test_open_as_guest_skips_request() {
        let (ctx, backend) = context(FakeBackend::default());
        let mut page = SettingsPage::new(ctx);
        page.open().await;
        assert!(!page.is_loaded());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let (ctx, backend) = signed_in_context(FakeBackend::default());
        let mut page = SettingsPage::new(ctx);

        assert!(page.toggle_dev_mode().await.unwrap());
        assert!(page.dev_mode());
        assert!(backend.settings.lock().unwrap().dev_mode);
    }

    #[tokio::test]
    async fn test_toggle_reverts_on_failure() {
        let backend = FakeBackend::default();
        backend.fail(Operation::UpdateSettings, 500, "Failed to update settings");
        let (ctx, _) = signed_in_context(backend);
        let mut page = SettingsPage::new(ctx);

        page.toggle_dev_mode().await.unwrap_err();
        assert!(!page.dev_mode());
        assert_eq!(page.notice(), Some(&Notice::error("Failed to update settings")));
    }

    #[tokio::test]
    async fn test_generate_requires_dev_mode() {
        let (ctx, backend) = signed_in_context(FakeBackend::default());
        let mut page = SettingsPage::new(ctx);

        let err = page
            .generate_test_data(5, start(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::DevModeDisabled));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generate_reports_progress() {
        let backend = FakeBackend::default();
        backend.settings.lock().unwrap().dev_mode = true;
        let (ctx, backend) = signed_in_context(backend);
        let mut page = SettingsPage::new(ctx);
        page.open().await;

        let report = page
            .generate_test_data(50, start(), &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();
        assert_eq!(report.requested, 30);
        assert_eq!(report.succeeded, 30);
        assert_eq!(page.notice(), Some(&Notice::success("Generated 30/30 test records")));
        assert_eq!(backend.created.lock().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn test_password_validation() {
        let (ctx, backend) = signed_in_context(FakeBackend::default());
        let mut page = SettingsPage::new(ctx);

        let err = page.change_password("old", "abc", "abc").await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
        let err = page.change_password("old", "abcdef", "abcdeg").await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords don't match");
        assert!(backend.calls().is_empty());

        page.change_password("old", "abcdef", "abcdef").await.unwrap();
        assert_eq!(backend.call_count(Operation::ChangePassword), 1);
    }

    #[tokio::test]
    async fn test_update_ai_settings() {
        let (ctx, _) = signed_in_context(FakeBackend::default());
        let mut page = SettingsPage::new(ctx);

        let err = page.update_ai(SettingsUpdate::default()).await.unwrap_err();
        assert!(matches!(err, PageError::Validation(_)));

        page.update_ai(SettingsUpdate {
            ai_model: Some("gpt-4o-mini".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(page.settings().ai_model.as_deref(), Some("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_expired_session_on_open() {
        let backend = FakeBackend::default();
        backend.fail(Operation::GetSettings, 401, "Invalid token");
        let (ctx, _) = signed_in_context(backend);
        let mut page = SettingsPage::new(ctx.clone());

        page.open().await;
        assert!(!ctx.session.is_authenticated());
        assert_eq!(
            page.notice().map(Notice::message),
            Some("Session expired, please log in again")
        );
    }
}
