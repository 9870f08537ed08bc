use shared::{
    domain::{Document, DocumentId, DocumentStatus, DocumentType, ExtractedFields, Priority},
    protocol::StatsSummary,
};

pub(crate) fn document(id: i64) -> Document {
    Document {
        id: DocumentId(id),
        filename: format!("fax-{id}.pdf"),
        file_path: None,
        upload_time: "2025-01-15T09:00:00".to_string(),
        page_count: Some(1),
        status: DocumentStatus::Classified,
        document_type: Some(DocumentType::Other.as_str().to_string()),
        confidence: Some(0.9),
        priority: Some(Priority::Medium),
        extracted_fields: None,
        flags: Vec::new(),
        processing_time_ms: Some(1200),
        notes: None,
        reviewed_by: None,
        reviewed_at: None,
    }
}

pub(crate) trait DocumentFixture: Sized {
    fn with_status(self, status: DocumentStatus) -> Self;
    fn with_priority(self, priority: Option<Priority>) -> Self;
    fn with_type(self, document_type: Option<DocumentType>) -> Self;
    fn with_raw_type(self, label: &str) -> Self;
    fn with_patient(self, name: &str) -> Self;
    fn with_facility(self, name: &str) -> Self;
    fn with_confidence(self, confidence: Option<f64>) -> Self;
    fn with_upload_time(self, upload_time: &str) -> Self;
}

impl DocumentFixture for Document {
    fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    fn with_type(mut self, document_type: Option<DocumentType>) -> Self {
        self.document_type = document_type.map(|document_type| document_type.as_str().to_string());
        self
    }

    fn with_raw_type(mut self, label: &str) -> Self {
        self.document_type = Some(label.to_string());
        self
    }

    fn with_patient(mut self, name: &str) -> Self {
        self.extracted_fields
            .get_or_insert_with(ExtractedFields::default)
            .patient_name = Some(name.to_string());
        self
    }

    fn with_facility(mut self, name: &str) -> Self {
        self.extracted_fields
            .get_or_insert_with(ExtractedFields::default)
            .sending_facility = Some(name.to_string());
        self
    }

    fn with_confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }

    fn with_upload_time(mut self, upload_time: &str) -> Self {
        self.upload_time = upload_time.to_string();
        self
    }
}

pub(crate) fn ids(documents: &[Document]) -> Vec<i64> {
    documents.iter().map(|doc| doc.id.0).collect()
}

pub(crate) fn stats(total: u64) -> StatsSummary {
    StatsSummary {
        total_documents: total,
        ..StatsSummary::default()
    }
}
