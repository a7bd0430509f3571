use serde::{Deserialize, Serialize};

/// Summary of the API the documents belong to, as returned by the backend.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub provider: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub life_cycle_status: Option<String>,
}
