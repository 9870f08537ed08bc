use async_trait::async_trait;
use shared::{
    domain::{Document, DocumentId},
    protocol::{DocumentPatch, DocumentQuery, StatsSummary},
};

pub mod controller;
pub mod error;
pub mod filter;
pub mod sort;
pub mod stats;
pub mod transport;
pub mod upload;
pub mod view_model;

pub use controller::QueueController;
pub use error::ClientError;
pub use filter::{FilterState, QuerySource, StatFilterKey, StatusFilter};
pub use sort::{Column, SortKey, SortOrder, SortState};
pub use stats::{CardKind, ConfidenceBand, StatCard};
pub use transport::HttpTriageClient;
pub use upload::{UploadFile, UploadOutcome};
pub use view_model::{DocumentAction, FetchTicket, QueueError, QueueViewModel, RefreshOutcome};

/// Backend operations the queue depends on.
#[async_trait]
pub trait TriageApi: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSummary, ClientError>;
    async fn fetch_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, ClientError>;
    async fn update_document(
        &self,
        id: DocumentId,
        patch: &DocumentPatch,
    ) -> Result<Document, ClientError>;
    /// `files` must already be narrowed to PDFs.
    async fn upload_documents(&self, files: Vec<UploadFile>) -> Result<UploadOutcome, ClientError>;
    fn document_pdf_url(&self, id: DocumentId) -> String;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
