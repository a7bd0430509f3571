use serde::{Deserialize, Serialize};

/// One entry of the fetched document list. Opaque to the view: fields are
/// passed through to the table untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    #[serde(rename = "documentId")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub source_type: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub other_type_name: Option<String>,
}

/// Backend payload for the document-list call.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub list: Vec<DocumentSummary>,
    #[serde(default)]
    pub count: Option<u64>,
}
