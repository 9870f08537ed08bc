//! Queue view state: filters, sort, selection and the last settled fetch.
//!
//! Every filter change hands back a [`FetchTicket`]. The caller runs the
//! coordinated fetch and reports back through
//! [`QueueViewModel::complete_refresh`]; only the newest ticket may update the
//! view, so a slow response for an older filter is dropped.

use shared::{
    domain::{Document, DocumentId, DocumentStatus, DocumentType},
    protocol::{DocumentPatch, DocumentQuery, StatsSummary},
};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    filter::{self, FilterState, StatFilterKey, StatusFilter},
    sort::{self, Column, SortKey, SortState},
    stats::{self, StatCard},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: DocumentQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { documents: usize },
    Failed,
    /// A newer fetch was started after this one; nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueError {
    pub message: String,
    /// Server unreachable; the whole view is blocked until a retry succeeds.
    pub unreachable: bool,
}

impl From<&ClientError> for QueueError {
    fn from(err: &ClientError) -> Self {
        Self {
            message: err.to_string(),
            unreachable: err.is_transport(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentAction {
    Review,
    Flag,
    Dismiss,
}

impl DocumentAction {
    pub fn target_status(self) -> DocumentStatus {
        match self {
            Self::Review => DocumentStatus::Reviewed,
            Self::Flag => DocumentStatus::Flagged,
            Self::Dismiss => DocumentStatus::Dismissed,
        }
    }

    pub fn patch(self, reviewer: &str) -> DocumentPatch {
        let mut patch = DocumentPatch::status(self.target_status());
        if self == Self::Review {
            patch.reviewed_by = Some(reviewer.to_string());
        }
        patch
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueueViewModel {
    filters: FilterState,
    stat_filter: Option<StatFilterKey>,
    sort: SortState,
    selected: Option<DocumentId>,
    loading: bool,
    error: Option<QueueError>,
    documents: Vec<Document>,
    stats: Option<StatsSummary>,
    generation: u64,
    page_limit: Option<u32>,
}

impl QueueViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    pub fn filters(&self) -> FilterState {
        self.filters
    }

    pub fn stat_filter(&self) -> Option<StatFilterKey> {
        self.stat_filter
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn selected_id(&self) -> Option<DocumentId> {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&QueueError> {
        self.error.as_ref()
    }

    pub fn stats(&self) -> Option<&StatsSummary> {
        self.stats.as_ref()
    }

    /// Documents in fetch order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn query(&self) -> DocumentQuery {
        DocumentQuery {
            limit: self.page_limit,
            ..filter::reconcile(&self.filters, self.stat_filter)
        }
    }

    /// Starts a fetch for the current filters. Earlier tickets become stale.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        let ticket = FetchTicket {
            generation: self.generation,
            query: self.query(),
        };
        debug!(generation = ticket.generation, query = ?ticket.query, "queue: refresh started");
        ticket
    }

    /// Clicking the active card switches it off; any other card replaces the
    /// dropdown filters entirely.
    pub fn select_stat_card(&mut self, key: StatFilterKey) -> FetchTicket {
        if self.stat_filter == Some(key) {
            self.stat_filter = None;
        } else {
            self.stat_filter = Some(key);
            self.filters = FilterState::empty();
        }
        self.selected = None;
        self.begin_refresh()
    }

    pub fn change_filters(&mut self, filters: FilterState) -> FetchTicket {
        self.filters = filters;
        self.stat_filter = None;
        self.selected = None;
        self.begin_refresh()
    }

    pub fn set_status_filter(&mut self, status: Option<StatusFilter>) -> FetchTicket {
        self.change_filters(FilterState {
            status,
            ..self.filters
        })
    }

    pub fn set_document_type(&mut self, document_type: Option<DocumentType>) -> FetchTicket {
        self.change_filters(FilterState {
            document_type,
            ..self.filters
        })
    }

    /// Back to the documented default (unreviewed, all types).
    pub fn clear_filters(&mut self) -> FetchTicket {
        self.change_filters(FilterState::default())
    }

    pub fn can_clear_filters(&self) -> bool {
        !self.filters.is_default()
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
    }

    /// Returns false for columns that are not sortable.
    pub fn click_column(&mut self, column: Column) -> bool {
        match column.sort_key() {
            Some(key) => {
                self.toggle_sort(key);
                true
            }
            None => false,
        }
    }

    /// Selecting the selected row deselects it.
    pub fn select_document(&mut self, id: DocumentId) {
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn complete_refresh(
        &mut self,
        ticket: &FetchTicket,
        result: Result<(StatsSummary, Vec<Document>), ClientError>,
    ) -> RefreshOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "queue: dropping stale refresh"
            );
            return RefreshOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok((stats, documents)) => {
                let count = documents.len();
                if let Some(selected) = self.selected {
                    if !documents.iter().any(|doc| doc.id == selected) {
                        self.selected = None;
                    }
                }
                self.stats = Some(stats);
                self.documents = documents;
                info!(generation = ticket.generation, documents = count, "queue: refresh applied");
                RefreshOutcome::Applied { documents: count }
            }
            Err(err) => {
                warn!(generation = ticket.generation, error = %err, "queue: refresh failed");
                self.error = Some(QueueError::from(&err));
                RefreshOutcome::Failed
            }
        }
    }

    /// Patch to send for an operator action. The server decides legality.
    pub fn action_patch(&self, id: DocumentId, action: DocumentAction, reviewer: &str) -> DocumentPatch {
        let target = action.target_status();
        if let Some(current) = self.find(id).map(|doc| doc.status) {
            if !current.is_forward_transition(target) {
                debug!(
                    document_id = id.0,
                    from = %current,
                    to = %target,
                    "queue: status change outside the usual triage flow"
                );
            }
        }
        action.patch(reviewer)
    }

    /// After a successful write the detail closes and the list is refetched.
    pub fn finish_action(&mut self) -> FetchTicket {
        self.selected = None;
        self.begin_refresh()
    }

    pub fn visible_documents(&self) -> Vec<Document> {
        sort::sort_documents(&self.documents, self.sort)
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.and_then(|id| self.find(id))
    }

    pub fn active_card(&self) -> Option<StatFilterKey> {
        filter::active_card(&self.filters, self.stat_filter)
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        stats::aggregate(self.stats.as_ref(), self.active_card())
    }

    pub fn document_count_label(&self) -> String {
        match self.documents.len() {
            1 => "1 document".to_string(),
            n => format!("{n} documents"),
        }
    }

    fn find(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
