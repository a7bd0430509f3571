pub mod app;
pub mod documents;
pub mod download;
pub mod metrics;
