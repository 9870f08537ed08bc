use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Document, DocumentStatus, DocumentType, Priority};

/// Predicates for `GET /documents`. Every predicate that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub status: Option<DocumentStatus>,
    pub document_type: Option<DocumentType>,
    /// Any-of; sent as a single comma-joined value.
    pub priority: Vec<Priority>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DocumentQuery {
    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priorities(mut self, priorities: &[Priority]) -> Self {
        self.priority = priorities.to_vec();
        self
    }

    pub fn with_document_type(mut self, document_type: Option<DocumentType>) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.status.is_none() && self.document_type.is_none() && self.priority.is_empty()
    }

    /// Query-string pairs. Unset predicates are left out entirely.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(document_type) = self.document_type {
            pairs.push(("document_type", document_type.as_str().to_string()));
        }
        if !self.priority.is_empty() {
            let joined = self
                .priority
                .iter()
                .map(|priority| priority.as_str())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("priority", joined));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// Partial update for `PATCH /documents/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
}

impl DocumentPatch {
    pub fn status(status: DocumentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_documents: u64,
    #[serde(default)]
    pub counts_by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub counts_by_priority: BTreeMap<String, u64>,
    #[serde(default)]
    pub counts_by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub documents_today: u64,
    #[serde(default)]
    pub flagged_count: u64,
    #[serde(default)]
    pub avg_confidence: Option<f64>,
    #[serde(default)]
    pub avg_processing_time_ms: Option<f64>,
}

impl StatsSummary {
    pub fn status_count(&self, status: DocumentStatus) -> u64 {
        self.counts_by_status
            .get(status.as_str())
            .copied()
            .unwrap_or(0)
    }

    pub fn priority_count(&self, priority: Priority) -> u64 {
        self.counts_by_priority
            .get(priority.as_str())
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub uploaded: u32,
    pub failed: u32,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub errors: Vec<UploadFailure>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
