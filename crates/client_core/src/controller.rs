//! Drives a [`QueueViewModel`] against a [`TriageApi`].

use std::sync::Arc;

use shared::{
    domain::{Document, DocumentId, DocumentType},
    protocol::{DocumentQuery, StatsSummary},
};
use tracing::{info, warn};

use crate::{
    error::ClientError,
    filter::{FilterState, StatFilterKey, StatusFilter},
    sort::{Column, SortKey},
    upload::{select_pdfs, UploadFile, UploadOutcome},
    view_model::{DocumentAction, FetchTicket, QueueViewModel, RefreshOutcome},
    TriageApi,
};

/// Fetches the global summary and the filtered page together. Either failing
/// fails the whole snapshot.
pub async fn fetch_snapshot(
    api: &dyn TriageApi,
    query: &DocumentQuery,
) -> Result<(StatsSummary, Vec<Document>), ClientError> {
    tokio::try_join!(api.fetch_stats(), api.fetch_documents(query))
}

/// Uploads the PDFs in `files`. Returns `None` without contacting the server
/// when the batch has no PDFs.
pub async fn upload_batch(
    api: &dyn TriageApi,
    files: Vec<UploadFile>,
) -> Result<Option<UploadOutcome>, ClientError> {
    let selection = select_pdfs(files);
    if selection.is_empty() {
        info!(skipped = selection.skipped.len(), "upload: nothing to send");
        return Ok(None);
    }
    let outcome = api.upload_documents(selection.files).await?;
    info!(
        uploaded = outcome.uploaded,
        failed = outcome.failed,
        "upload: batch finished"
    );
    Ok(Some(outcome))
}

pub struct QueueController {
    api: Arc<dyn TriageApi>,
    view: QueueViewModel,
    reviewer: String,
}

impl QueueController {
    pub fn new(api: Arc<dyn TriageApi>, reviewer: impl Into<String>) -> Self {
        Self::with_view(api, QueueViewModel::new(), reviewer)
    }

    pub fn with_view(
        api: Arc<dyn TriageApi>,
        view: QueueViewModel,
        reviewer: impl Into<String>,
    ) -> Self {
        Self {
            api,
            view,
            reviewer: reviewer.into(),
        }
    }

    pub fn view(&self) -> &QueueViewModel {
        &self.view
    }

    pub fn reviewer(&self) -> &str {
        &self.reviewer
    }

    pub async fn refresh(&mut self) -> RefreshOutcome {
        let ticket = self.view.begin_refresh();
        self.run(ticket).await
    }

    pub async fn select_stat_card(&mut self, key: StatFilterKey) -> RefreshOutcome {
        let ticket = self.view.select_stat_card(key);
        self.run(ticket).await
    }

    pub async fn change_filters(&mut self, filters: FilterState) -> RefreshOutcome {
        let ticket = self.view.change_filters(filters);
        self.run(ticket).await
    }

    pub async fn set_status_filter(&mut self, status: Option<StatusFilter>) -> RefreshOutcome {
        let ticket = self.view.set_status_filter(status);
        self.run(ticket).await
    }

    pub async fn set_document_type(&mut self, document_type: Option<DocumentType>) -> RefreshOutcome {
        let ticket = self.view.set_document_type(document_type);
        self.run(ticket).await
    }

    pub async fn clear_filters(&mut self) -> RefreshOutcome {
        let ticket = self.view.clear_filters();
        self.run(ticket).await
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.view.toggle_sort(key);
    }

    pub fn click_column(&mut self, column: Column) -> bool {
        self.view.click_column(column)
    }

    pub fn select_document(&mut self, id: DocumentId) {
        self.view.select_document(id);
    }

    pub fn close_detail(&mut self) {
        self.view.close_detail();
    }

    /// Writes the status change, then closes the detail and refetches. On a
    /// failed write the view is left untouched.
    pub async fn apply_action(
        &mut self,
        id: DocumentId,
        action: DocumentAction,
    ) -> Result<RefreshOutcome, ClientError> {
        let patch = self.view.action_patch(id, action, &self.reviewer);
        if let Err(err) = self.api.update_document(id, &patch).await {
            warn!(document_id = id.0, ?action, error = %err, "queue: action failed");
            return Err(err);
        }
        info!(document_id = id.0, ?action, "queue: action applied");
        let ticket = self.view.finish_action();
        Ok(self.run(ticket).await)
    }

    /// Uploads the PDFs of a dropped batch. Any completed batch refetches,
    /// including one where every file failed.
    pub async fn upload(
        &mut self,
        files: Vec<UploadFile>,
    ) -> Result<Option<UploadOutcome>, ClientError> {
        let outcome = upload_batch(self.api.as_ref(), files).await?;
        if outcome.is_some() {
            self.refresh().await;
        }
        Ok(outcome)
    }

    pub fn document_pdf_url(&self, id: DocumentId) -> String {
        self.api.document_pdf_url(id)
    }

    async fn run(&mut self, ticket: FetchTicket) -> RefreshOutcome {
        let result = fetch_snapshot(self.api.as_ref(), &ticket.query).await;
        self.view.complete_refresh(&ticket, result)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
