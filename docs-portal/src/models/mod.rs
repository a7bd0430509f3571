pub mod api;
pub mod document;

pub use api::ApiSummary;
pub use document::{DocumentListResponse, DocumentSummary};
