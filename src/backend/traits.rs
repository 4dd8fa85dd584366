use crate::error::Result;
use crate::logic::Record;
use crate::model::{CanonicalId, IdKind, Subselection};
use serde_json::Value;

/// HTTP boundary. Implementations issue the request and hand back parsed
/// JSON; any failure to get a successful response is a `TransportError`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value>;
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// One way of fetching root entities (GraphQL or REST).
#[async_trait::async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch a root entity, flattened to a plain record
    async fn fetch(&self, kind: IdKind, id: &CanonicalId) -> Result<Record>;

    /// Fetch a sub-selection payload (`{<subselection>: [...]}`)
    async fn fetch_subselection(
        &self,
        kind: IdKind,
        id: &CanonicalId,
        subselection: Subselection,
    ) -> Result<Record>;

    fn supports_subselection(&self) -> bool;
}
