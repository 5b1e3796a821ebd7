//! Past records, filtered by date range and paged

use super::{LoadState, Notice, PageContext, PageError};
use crate::models::{Record, RecordPage, RecordQuery};
use chrono::NaiveDate;

/// Paged list of past records with deletion
pub struct HistoryPage {
    ctx: PageContext,
    query: RecordQuery,
    records: LoadState<RecordPage>,
    notice: Option<Notice>,
}

impl HistoryPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            query: RecordQuery::default(),
            records: LoadState::Idle,
            notice: None,
        }
    }

    pub fn query(&self) -> &RecordQuery {
        &self.query
    }

    pub fn records(&self) -> &LoadState<RecordPage> {
        &self.records
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Restrict to a date range; resets to the first page
    pub fn set_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.query.start_date = start;
        self.query.end_date = end;
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: u32, limit: u32) {
        self.query.page = page.max(1);
        self.query.limit = limit.max(1);
    }

    pub async fn load(&mut self) {
        self.records = LoadState::Loading;
        self.records = LoadState::from_result(self.fetch().await);
    }

    async fn fetch(&self) -> Result<RecordPage, PageError> {
        self.ctx.require_login()?;
        self.ctx
            .backend
            .list_records(&self.query)
            .await
            .map_err(|e| self.ctx.api_error(e))
    }

    /// Delete one record and drop it from the loaded page
    pub async fn delete(&mut self, record_id: &str) -> Result<(), PageError> {
        let result = self.try_delete(record_id).await;
        match &result {
            Ok(()) => {
                if let Some(page) = self.records.loaded_mut() {
                    page.records.retain(|r: &Record| r.record_id != record_id);
                }
                self.notice = Some(Notice::success("Record deleted"));
            }
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
        result
    }

    async fn try_delete(&self, record_id: &str) -> Result<(), PageError> {
        self.ctx.require_login()?;
        self.ctx
            .backend
            .delete_record(record_id)
            .await
            .map_err(|e| self.ctx.api_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Operation;
    use crate::pages::testing::{context, signed_in_context, FakeBackend};

    fn record(id: &str) -> Record {
        Record {
            record_id: id.to_string(),
            lid: None,
            record_date: "2024-03-01".to_string(),
            record_time: Some("08:00".to_string()),
            duration_minutes: Some(5),
            stool_type: Some(4),
            color: Some("brown".to_string()),
            smell_level: Some(2),
            feeling: Some("smooth".to_string()),
            symptoms: None,
            notes: None,
            is_no_bowel: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_load_and_delete() {
        let backend = FakeBackend::default();
        *backend.records.lock().unwrap() = vec![record("a"), record("b")];
        let (ctx, backend) = signed_in_context(backend);
        let mut page = HistoryPage::new(ctx);

        page.set_range(NaiveDate::from_ymd_opt(2024, 3, 1), None);
        page.load().await;
        assert_eq!(page.records().loaded().map(|p| p.records.len()), Some(2));
        assert_eq!(
            backend.last_query.lock().unwrap().as_ref().and_then(|q| q.start_date),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );

        page.delete("a").await.unwrap();
        let ids: Vec<_> = page
            .records()
            .loaded()
            .unwrap()
            .records
            .iter()
            .map(|r| r.record_id.clone())
            .collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(page.notice(), Some(&Notice::success("Record deleted")));
    }

    #[tokio::test]
    async fn test_guest_is_prompted() {
        let (ctx, backend) = context(FakeBackend::default());
        let mut page = HistoryPage::new(ctx);
        page.load().await;
        assert!(page.records().error().is_some_and(|e| e.needs_login()));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_is_reported() {
        let backend = FakeBackend::default();
        backend.fail(Operation::DeleteRecord, 404, "Record not found");
        let (ctx, _) = signed_in_context(backend);
        let mut page = HistoryPage::new(ctx);

        let err = page.delete("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Record not found");
        assert!(page.notice().is_some_and(Notice::is_error));
    }

    #[test]
    fn test_page_bounds() {
        let (ctx, _) = context(FakeBackend::default());
        let mut page = HistoryPage::new(ctx);
        page.set_page(0, 0);
        assert_eq!(page.query().page, 1);
        assert_eq!(page.query().limit, 1);
    }
}
