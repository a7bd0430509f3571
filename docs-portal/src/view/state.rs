use crate::models::{ApiSummary, DocumentSummary};

/// Progress of one backend fetch. No retries: `Failed` is terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    NotStarted,
    Pending,
    Succeeded,
    Failed,
}

/// Transient state owned exclusively by the document list view.
///
/// Populated only from fetch-completion handlers; torn down with the view.
#[derive(Debug, Default)]
pub struct ViewState {
    pub api: Option<ApiSummary>,
    pub documents: Option<Vec<DocumentSummary>>,
    pub not_found: bool,
    pub is_adding: bool,
    pub is_updating: bool,
    pub api_fetch: FetchState,
    pub documents_fetch: FetchState,
}
