//! Client-side ordering of the fetched document page.

use std::{cmp::Ordering, fmt, str::FromStr};

use shared::{domain::Document, error::UnknownVariant};

/// Rank given to documents with no priority, or one this client does not know.
const UNRANKED_PRIORITY: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Priority,
    DocumentType,
    PatientName,
    SendingFacility,
    Confidence,
    UploadTime,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Priority,
        SortKey::DocumentType,
        SortKey::PatientName,
        SortKey::SendingFacility,
        SortKey::Confidence,
        SortKey::UploadTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::DocumentType => "document_type",
            Self::PatientName => "patient_name",
            Self::SendingFacility => "sending_facility",
            Self::Confidence => "confidence",
            Self::UploadTime => "upload_time",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant::new("sort key", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Queue table columns in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Priority,
    DocumentType,
    Flags,
    PatientName,
    SendingFacility,
    Confidence,
    UploadTime,
    Status,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Priority,
        Column::DocumentType,
        Column::Flags,
        Column::PatientName,
        Column::SendingFacility,
        Column::Confidence,
        Column::UploadTime,
        Column::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Priority => "",
            Self::DocumentType => "Type",
            Self::Flags => "Flags",
            Self::PatientName => "Patient",
            Self::SendingFacility => "From",
            Self::Confidence => "Conf.",
            Self::UploadTime => "Received",
            Self::Status => "Status",
        }
    }

    /// `None` for columns that cannot be sorted on.
    pub fn sort_key(self) -> Option<SortKey> {
        match self {
            Self::Priority => Some(SortKey::Priority),
            Self::DocumentType => Some(SortKey::DocumentType),
            Self::PatientName => Some(SortKey::PatientName),
            Self::SendingFacility => Some(SortKey::SendingFacility),
            Self::Confidence => Some(SortKey::Confidence),
            Self::UploadTime => Some(SortKey::UploadTime),
            Self::Flags | Self::Status => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Priority,
            order: SortOrder::Asc,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Header click: the active key flips direction, any other key starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.order.flipped())
        } else {
            Self::new(key, SortOrder::Asc)
        }
    }
}

pub fn compare(a: &Document, b: &Document, sort: SortState) -> Ordering {
    let ordering = match sort.key {
        SortKey::Priority => priority_rank(a).cmp(&priority_rank(b)),
        SortKey::DocumentType => {
            compare_text(a.document_type.as_deref(), b.document_type.as_deref())
        }
        SortKey::PatientName => compare_text(a.patient_name(), b.patient_name()),
        SortKey::SendingFacility => compare_text(a.sending_facility(), b.sending_facility()),
        SortKey::Confidence => a
            .confidence()
            .unwrap_or(0.0)
            .total_cmp(&b.confidence().unwrap_or(0.0)),
        // Unparseable timestamps are `None`, which orders first.
        SortKey::UploadTime => a.uploaded_at().cmp(&b.uploaded_at()),
    };
    sort.order.apply(ordering)
}

/// Stable sort into a new vector; equal keys keep their input order in
/// either direction.
pub fn sort_documents(documents: &[Document], sort: SortState) -> Vec<Document> {
    let mut sorted = documents.to_vec();
    sorted.sort_by(|a, b| compare(a, b, sort));
    sorted
}

fn priority_rank(document: &Document) -> u8 {
    document
        .priority
        .map(|priority| priority.rank())
        .unwrap_or(UNRANKED_PRIORITY)
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or_default().to_lowercase();
    let b = b.unwrap_or_default().to_lowercase();
    a.cmp(&b)
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
