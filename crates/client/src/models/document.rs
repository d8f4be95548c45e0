//! Document and collection response models.

use cms_schema::{FieldMap, FieldValue, resolve_path};
use serde::{Deserialize, Serialize};

/// A CMS document: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub FieldMap);

impl Document {
    /// The document id rendered as a string (numeric ids lose no precision).
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            FieldValue::Null => None,
            FieldValue::String(s) if s.is_empty() => None,
            value @ (FieldValue::String(_) | FieldValue::Number(_)) => Some(value.to_string()),
            _ => None,
        }
    }

    /// The id, or a placeholder for documents without one.
    pub fn display_id(&self) -> String {
        self.id().unwrap_or_else(|| "<no id>".to_string())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Resolve a dot-separated path such as `hero.image.url`.
    pub fn resolve(&self, path: &str) -> Option<&FieldValue> {
        resolve_path(&self.0, path)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.0
    }

    pub fn into_fields(self) -> FieldMap {
        self.0
    }
}

impl From<FieldMap> for Document {
    fn from(fields: FieldMap) -> Self {
        Self(fields)
    }
}

/// Paginated response from `GET /api/{collection}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub docs: Vec<Document>,
    #[serde(default)]
    pub total_docs: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Response from `GET /api/{collection}/count`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub total_docs: u64,
}

/// Response from create, update and delete: the affected document.
#[derive(Debug, Clone, Deserialize)]
pub struct DocResponse {
    pub doc: Document,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by Payload on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadErrors {
    pub errors: Vec<PayloadErrorMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadErrorMessage {
    pub message: String,
}

impl PayloadErrors {
    pub fn joined(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_forms() {
        let doc: Document = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(doc.id().as_deref(), Some("42"));

        let doc: Document = serde_json::from_str(r#"{"id": "65f0c2a1"}"#).unwrap();
        assert_eq!(doc.id().as_deref(), Some("65f0c2a1"));

        let doc: Document = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(doc.id(), None);
        assert_eq!(doc.display_id(), "<no id>");
    }

    #[test]
    fn test_page_deserialize() {
        let page: DocumentPage = serde_json::from_str(
            r#"{"docs": [{"id": 1}], "totalDocs": 1, "limit": 10, "page": 1,
                "totalPages": 1, "hasNextPage": false, "pagingCounter": 1}"#,
        )
        .unwrap();
        assert_eq!(page.docs.len(), 1);
        assert_eq!(page.total_docs, 1);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_payload_errors_joined() {
        let errors: PayloadErrors = serde_json::from_str(
            r#"{"errors": [{"message": "first"}, {"message": "second"}]}"#,
        )
        .unwrap();
        assert_eq!(errors.joined(), "first; second");
    }
}
