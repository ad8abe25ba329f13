//! Port interfaces for the crew backend
//!
//! These traits define the boundary between the schedule use cases and the
//! authenticated HTTP session that implements them.

use async_trait::async_trait;
use crewconnect_domain::Result;
use serde_json::Value;
use url::Url;

/// Query string as ordered key/value pairs
pub type QueryParams = [(String, String)];

/// Authenticated read access to the crew backend
#[async_trait]
pub trait CrewApi: Send + Sync {
    /// Crew code of the signed-in user, used in endpoint paths
    fn user_id(&self) -> String;

    /// Backend host that relative paths are resolved against
    fn base_url(&self) -> Url;

    /// GET `path_or_url` and decode the JSON body
    ///
    /// Relative paths are resolved against the backend host; absolute URLs
    /// (pagination links) are used as-is.
    async fn get_json(&self, path_or_url: &str, query: &QueryParams) -> Result<Value>;
}
