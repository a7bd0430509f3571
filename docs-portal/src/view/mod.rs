//! The document list view: fetch orchestration and render model.
//!
//! Mounting starts two independent fetches (API summary and document list);
//! each completion handler checks a liveness token before touching state, so
//! results arriving after unmount are ignored.

pub mod state;

pub use state::{FetchState, ViewState};

use crate::models::{ApiSummary, DocumentSummary};
use crate::notify::Notifier;
use crate::services::api_client::ClientError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The slice of the backend client the view depends on.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    async fn get_api(&self, api_id: &str) -> Result<ApiSummary, ClientError>;
    async fn get_documents(&self, api_id: &str) -> Result<Vec<DocumentSummary>, ClientError>;
}

/// What the view renders to.
#[derive(Debug)]
pub enum Rendered {
    /// The API summary has not resolved yet (also while `not_found` is set).
    Loading,
    Page(DocumentsPage),
}

#[derive(Debug)]
pub struct DocumentsPage {
    pub api: ApiSummary,
    /// Add/edit placeholder region is visible.
    pub editor_open: bool,
    /// The fetched list, untouched and in backend order; absent until the
    /// list fetch succeeds.
    pub documents: Option<Vec<DocumentSummary>>,
}

/// Handles for the two mount fetches.
pub struct MountHandles {
    parent: JoinHandle<()>,
    documents: JoinHandle<()>,
}

impl MountHandles {
    /// Wait until both fetches have resolved (either way).
    pub async fn settled(self) {
        let _ = self.parent.await;
        let _ = self.documents.await;
    }
}

pub struct DocumentListView {
    api_id: String,
    client: Arc<dyn DocumentCatalog>,
    notifier: Arc<dyn Notifier>,
    state: Arc<RwLock<ViewState>>,
    liveness: CancellationToken,
}

impl DocumentListView {
    pub fn new(
        api_id: impl Into<String>,
        client: Arc<dyn DocumentCatalog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api_id: api_id.into(),
            client,
            notifier,
            state: Arc::new(RwLock::new(ViewState::default())),
            liveness: CancellationToken::new(),
        }
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    /// Start the two mount fetches. They run concurrently and resolve in any
    /// order; call at most once.
    pub async fn mount(&self) -> MountHandles {
        {
            let mut state = self.state.write().await;
            state.api_fetch = FetchState::Pending;
            state.documents_fetch = FetchState::Pending;
        }

        let parent = {
            let state = Arc::clone(&self.state);
            let client = Arc::clone(&self.client);
            let liveness = self.liveness.clone();
            let api_id = self.api_id.clone();

            tokio::spawn(async move {
                let result = client.get_api(&api_id).await;
                if liveness.is_cancelled() {
                    return;
                }
                let mut state = state.write().await;
                match result {
                    Ok(api) => {
                        state.api = Some(api);
                        state.api_fetch = FetchState::Succeeded;
                    }
                    Err(ClientError::NotFound) => {
                        state.not_found = true;
                        state.api_fetch = FetchState::Failed;
                    }
                    Err(err) => {
                        tracing::error!(api_id = %api_id, error = %err, "failed to fetch API");
                        state.api_fetch = FetchState::Failed;
                    }
                }
            })
        };

        let documents = {
            let state = Arc::clone(&self.state);
            let client = Arc::clone(&self.client);
            let notifier = Arc::clone(&self.notifier);
            let liveness = self.liveness.clone();
            let api_id = self.api_id.clone();

            tokio::spawn(async move {
                let result = client.get_documents(&api_id).await;
                if liveness.is_cancelled() {
                    return;
                }
                let mut state = state.write().await;
                match result {
                    Ok(list) => {
                        state.documents = Some(list);
                        state.documents_fetch = FetchState::Succeeded;
                    }
                    Err(err) => {
                        tracing::error!(
                            api_id = %api_id,
                            error = %err,
                            "failed to fetch document list"
                        );
                        notifier.notify_error("Error in fetching documents list of the API");
                        state.documents_fetch = FetchState::Failed;
                    }
                }
            })
        };

        MountHandles { parent, documents }
    }

    /// Tear the view down; late fetch completions become no-ops.
    pub fn unmount(&self) {
        self.liveness.cancel();
    }

    pub async fn not_found(&self) -> bool {
        self.state.read().await.not_found
    }

    pub async fn set_adding(&self, adding: bool) {
        self.state.write().await.is_adding = adding;
    }

    pub async fn set_updating(&self, updating: bool) {
        self.state.write().await.is_updating = updating;
    }

    pub async fn render(&self) -> Rendered {
        let state = self.state.read().await;

        let Some(api) = state.api.clone() else {
            return Rendered::Loading;
        };

        Rendered::Page(DocumentsPage {
            api,
            editor_open: state.is_adding || state.is_updating,
            documents: state.documents.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn api_summary(id: &str) -> ApiSummary {
        ApiSummary {
            id: id.to_string(),
            name: "PizzaShack".to_string(),
            version: "1.0.0".to_string(),
            provider: "admin".to_string(),
            context: None,
            description: None,
            life_cycle_status: None,
        }
    }

    fn document(id: &str, name: &str) -> DocumentSummary {
        DocumentSummary {
            id: id.to_string(),
            name: name.to_string(),
            doc_type: "HOWTO".to_string(),
            summary: None,
            source_type: "INLINE".to_string(),
            source_url: None,
            other_type_name: None,
        }
    }

    #[derive(Default)]
    struct StubCatalog {
        api: Mutex<Option<Result<ApiSummary, ClientError>>>,
        documents: Mutex<Option<Result<Vec<DocumentSummary>, ClientError>>>,
        api_calls: AtomicUsize,
        document_calls: AtomicUsize,
        seen_ids: Mutex<Vec<String>>,
        /// When set, both fetches block on a permit before responding.
        gate: Option<Arc<Semaphore>>,
    }

    impl StubCatalog {
        fn with_results(
            api: Result<ApiSummary, ClientError>,
            documents: Result<Vec<DocumentSummary>, ClientError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                api: Mutex::new(Some(api)),
                documents: Mutex::new(Some(documents)),
                ..Self::default()
            })
        }
    }

    #[async_trait]
    impl DocumentCatalog for StubCatalog {
        async fn get_api(&self, api_id: &str) -> Result<ApiSummary, ClientError> {
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await;
            }
            self.api_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_ids.lock().unwrap().push(api_id.to_string());
            self.api.lock().unwrap().take().expect("api result consumed")
        }

        async fn get_documents(&self, api_id: &str) -> Result<Vec<DocumentSummary>, ClientError> {
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await;
            }
            self.document_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_ids.lock().unwrap().push(api_id.to_string());
            self.documents
                .lock()
                .unwrap()
                .take()
                .expect("documents result consumed")
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for CountingNotifier {
        fn notify_error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn view_with(
        catalog: Arc<StubCatalog>,
        notifier: Arc<CountingNotifier>,
    ) -> DocumentListView {
        DocumentListView::new("api-1", catalog, notifier)
    }

    #[tokio::test]
    async fn mount_issues_one_fetch_each_with_the_view_id() {
        let catalog = StubCatalog::with_results(Ok(api_summary("api-1")), Ok(vec![]));
        let view = view_with(catalog.clone(), Arc::new(CountingNotifier::default()));

        view.mount().await.settled().await;

        assert_eq!(catalog.api_calls.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.document_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *catalog.seen_ids.lock().unwrap(),
            vec!["api-1".to_string(), "api-1".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_list_renders_page_without_table_rows() {
        let catalog = StubCatalog::with_results(Ok(api_summary("api-1")), Ok(vec![]));
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        view.mount().await.settled().await;

        match view.render().await {
            Rendered::Page(page) => {
                assert_eq!(page.documents, Some(vec![]));
                assert!(!page.editor_open);
            }
            Rendered::Loading => panic!("expected a page render"),
        }
    }

    #[tokio::test]
    async fn document_list_passes_through_in_backend_order() {
        let docs = vec![document("d2", "zeta"), document("d1", "alpha")];
        let catalog = StubCatalog::with_results(Ok(api_summary("api-1")), Ok(docs.clone()));
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        view.mount().await.settled().await;

        match view.render().await {
            Rendered::Page(page) => assert_eq!(page.documents, Some(docs)),
            Rendered::Loading => panic!("expected a page render"),
        }
    }

    #[tokio::test]
    async fn parent_404_sets_not_found_and_keeps_loading() {
        let catalog = StubCatalog::with_results(Err(ClientError::NotFound), Ok(vec![]));
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        view.mount().await.settled().await;

        assert!(view.not_found().await);
        assert!(matches!(view.render().await, Rendered::Loading));
    }

    #[tokio::test]
    async fn parent_failure_other_than_404_keeps_loading_without_flag() {
        let catalog = StubCatalog::with_results(
            Err(ClientError::Unexpected {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            }),
            Ok(vec![]),
        );
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        view.mount().await.settled().await;

        assert!(!view.not_found().await);
        assert!(matches!(view.render().await, Rendered::Loading));
    }

    #[tokio::test]
    async fn list_failure_raises_exactly_one_toast() {
        let catalog = StubCatalog::with_results(
            Ok(api_summary("api-1")),
            Err(ClientError::Api {
                code: 900967,
                description: "Internal error".to_string(),
                message: "Error while retrieving documents".to_string(),
            }),
        );
        let notifier = Arc::new(CountingNotifier::default());
        let view = view_with(catalog, notifier.clone());

        view.mount().await.settled().await;

        assert_eq!(
            *notifier.messages.lock().unwrap(),
            vec!["Error in fetching documents list of the API".to_string()]
        );
        match view.render().await {
            Rendered::Page(page) => assert_eq!(page.documents, None),
            Rendered::Loading => panic!("expected a page render"),
        }
    }

    #[tokio::test]
    async fn fetch_states_progress_from_pending_to_terminal() {
        let gate = Arc::new(Semaphore::new(0));
        let catalog = Arc::new(StubCatalog {
            api: Mutex::new(Some(Ok(api_summary("api-1")))),
            documents: Mutex::new(Some(Err(ClientError::NotFound))),
            gate: Some(gate.clone()),
            ..StubCatalog::default()
        });
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        {
            let state = view.state.read().await;
            assert_eq!(state.api_fetch, FetchState::NotStarted);
            assert_eq!(state.documents_fetch, FetchState::NotStarted);
        }

        let handles = view.mount().await;
        {
            let state = view.state.read().await;
            assert_eq!(state.api_fetch, FetchState::Pending);
            assert_eq!(state.documents_fetch, FetchState::Pending);
        }

        gate.add_permits(2);
        handles.settled().await;

        let state = view.state.read().await;
        assert_eq!(state.api_fetch, FetchState::Succeeded);
        assert_eq!(state.documents_fetch, FetchState::Failed);
    }

    #[tokio::test]
    async fn late_completions_after_unmount_are_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let catalog = Arc::new(StubCatalog {
            api: Mutex::new(Some(Ok(api_summary("api-1")))),
            documents: Mutex::new(Some(Ok(vec![document("d1", "alpha")]))),
            gate: Some(gate.clone()),
            ..StubCatalog::default()
        });
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        let handles = view.mount().await;
        view.unmount();
        gate.add_permits(2);
        handles.settled().await;

        assert!(matches!(view.render().await, Rendered::Loading));
        assert!(!view.not_found().await);
    }

    #[tokio::test]
    async fn editor_placeholder_gates_on_adding_or_updating() {
        let catalog = StubCatalog::with_results(Ok(api_summary("api-1")), Ok(vec![]));
        let view = view_with(catalog, Arc::new(CountingNotifier::default()));

        view.mount().await.settled().await;
        view.set_adding(true).await;

        match view.render().await {
            Rendered::Page(page) => assert!(page.editor_open),
            Rendered::Loading => panic!("expected a page render"),
        }
    }
}
