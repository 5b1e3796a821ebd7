//! AI analysis requests and past reports

use super::{LoadState, PageContext, PageError};
use crate::models::{AnalysisResult, AnalysisSummary, AnalysisType, AnalyzeRequest};

pub const DISCLAIMER: &str = "This analysis is for reference only and is not medical advice. \
If you have persistent symptoms, please consult a doctor.";

/// One-shot AI analysis request plus the list of past analyses
pub struct AnalysisPage {
    ctx: PageContext,
    analysis_type: AnalysisType,
    result: LoadState<AnalysisResult>,
    history: LoadState<Vec<AnalysisSummary>>,
}

impl AnalysisPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            analysis_type: AnalysisType::default(),
            result: LoadState::Idle,
            history: LoadState::Idle,
        }
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn select_type(&mut self, analysis_type: AnalysisType) {
        self.analysis_type = analysis_type;
    }

    pub fn result(&self) -> &LoadState<AnalysisResult> {
        &self.result
    }

    pub fn history(&self) -> &LoadState<Vec<AnalysisSummary>> {
        &self.history
    }

    /// The disclaimer accompanies every non-empty result
    pub fn shows_disclaimer(&self) -> bool {
        self.result.loaded().is_some_and(|r| !r.is_empty())
    }

    pub async fn analyze(&mut self) {
        self.result = LoadState::Loading;
        let result = self.request().await;
        if let Ok(r) = &result {
            tracing::info!(
                analysis_type = %self.analysis_type,
                health_score = r.health_score,
                "Analysis completed"
            );
        }
        self.result = LoadState::from_result(result);
    }

    async fn request(&self) -> Result<AnalysisResult, PageError> {
        self.ctx.require_login()?;
        let request = AnalyzeRequest::new(self.analysis_type);
        self.ctx
            .backend
            .analyze(&request)
            .await
            .map_err(|e| self.ctx.api_error(e))
    }

    pub async fn load_history(&mut self) {
        self.history = LoadState::Loading;
        let result = match self.ctx.require_login() {
            Ok(()) => self
                .ctx
                .backend
                .list_analyses()
                .await
                .map_err(|e| self.ctx.api_error(e)),
            Err(e) => Err(e),
        };
        self.history = LoadState::from_result(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Operation;
    use crate::models::{Insight, Warning};
    use crate::pages::testing::{context, signed_in_context, FakeBackend};

    #[tokio::test]
    async fn test_result_with_disclaimer() {
        let backend = FakeBackend::default();
        {
            let mut analysis = backend.analysis.lock().unwrap();
            analysis.health_score = 78.0;
            analysis.insights.push(Insight {
                kind: "pattern".to_string(),
                title: "Regular rhythm".to_string(),
                description: "Most movements happen in the morning".to_string(),
            });
        }
        let (ctx, backend) = signed_in_context(backend);
        let mut page = AnalysisPage::new(ctx);
        page.select_type(AnalysisType::Monthly);

        page.analyze().await;
        assert_eq!(page.result().loaded().map(|r| r.health_score), Some(78.0));
        assert!(page.shows_disclaimer());
        assert_eq!(backend.call_count(Operation::Analyze), 1);
    }

    #[tokio::test]
    async fn test_empty_result_has_no_disclaimer() {
        let (ctx, _) = signed_in_context(FakeBackend::default());
        let mut page = AnalysisPage::new(ctx);
        page.analyze().await;
        assert!(page.result().loaded().is_some());
        assert!(!page.shows_disclaimer());
    }

    #[tokio::test]
    async fn test_warning_only_result_shows_disclaimer() {
        let backend = FakeBackend::default();
        backend.analysis.lock().unwrap().warnings.push(Warning {
            kind: "no_data".to_string(),
            message: "No records in this period".to_string(),
        });
        let (ctx, _) = signed_in_context(backend);
        let mut page = AnalysisPage::new(ctx);
        page.analyze().await;
        assert!(page.shows_disclaimer());
    }

    #[tokio::test]
    async fn test_guest_cannot_analyze() {
        let (ctx, backend) = context(FakeBackend::default());
        let mut page = AnalysisPage::new(ctx);
        page.analyze().await;
        page.load_history().await;
        assert!(page.result().error().is_some_and(PageError::needs_login));
        assert!(page.history().error().is_some_and(PageError::needs_login));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_message() {
        let backend = FakeBackend::default();
        backend.fail(Operation::Analyze, 502, "AI service unavailable");
        let (ctx, _) = signed_in_context(backend);
        let mut page = AnalysisPage::new(ctx);
        page.analyze().await;
        assert_eq!(
            page.result().error().map(|e| e.to_string()).as_deref(),
            Some("AI service unavailable")
        );
    }
}
