//! reqwest implementation of [`TriageApi`](crate::TriageApi).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use shared::{
    domain::{Document, DocumentId},
    error::ApiError,
    protocol::{BatchUploadResponse, DocumentListResponse, DocumentPatch, DocumentQuery, StatsSummary},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::ClientError,
    upload::{UploadFile, UploadOutcome, PDF_MIME},
    TriageApi,
};

/// Older servers answer `/documents` with a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentsBody {
    Page(DocumentListResponse),
    Bare(Vec<Document>),
}

impl DocumentsBody {
    fn into_documents(self) -> Vec<Document> {
        match self {
            Self::Page(page) => page.documents,
            Self::Bare(documents) => documents,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTriageClient {
    http: Client,
    base_url: Url,
}

impl HttpTriageClient {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_http_client(http, base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: err.to_string(),
            })
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    // `Url::join` drops the last path segment unless it ends with a slash.
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|err| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: "not a base url".to_string(),
        });
    }
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let message = match response.json::<ApiError>().await {
            Ok(body) => body.message_or_status(code),
            Err(_) => format!("HTTP {code}"),
        };
        warn!(status = code, %message, "triage api: request failed");
        return Err(ClientError::RequestFailed {
            status: code,
            message,
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

#[async_trait]
impl TriageApi for HttpTriageClient {
    async fn fetch_stats(&self) -> Result<StatsSummary, ClientError> {
        let url = self.endpoint("stats/summary")?;
        debug!(%url, "triage api: fetching stats");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn fetch_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, ClientError> {
        let url = self.endpoint("documents")?;
        let pairs = query.to_query_pairs();
        debug!(%url, ?pairs, "triage api: fetching documents");
        let response = self.http.get(url).query(&pairs).send().await?;
        let body: DocumentsBody = read_json(response).await?;
        Ok(body.into_documents())
    }

    async fn update_document(
        &self,
        id: DocumentId,
        patch: &DocumentPatch,
    ) -> Result<Document, ClientError> {
        let url = self.endpoint(&format!("documents/{id}"))?;
        info!(document_id = id.0, status = ?patch.status, "triage api: updating document");
        let response = self.http.patch(url).json(patch).send().await?;
        read_json(response).await
    }

    async fn upload_documents(&self, files: Vec<UploadFile>) -> Result<UploadOutcome, ClientError> {
        let url = self.endpoint("documents/upload")?;
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str(PDF_MIME)?;
            form = form.part("files", part);
        }
        info!(files = count, "triage api: uploading batch");
        let response = self.http.post(url).multipart(form).send().await?;
        let body: BatchUploadResponse = read_json(response).await?;
        for failure in &body.errors {
            debug!(filename = %failure.filename, error = %failure.error, "triage api: upload item failed");
        }
        Ok(UploadOutcome {
            uploaded: body.uploaded,
            failed: body.failed,
        })
    }

    fn document_pdf_url(&self, id: DocumentId) -> String {
        match self.endpoint(&format!("documents/{id}/pdf")) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}documents/{id}/pdf", self.base_url),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
