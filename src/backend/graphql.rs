use crate::backend::cache::{CacheKey, ResponseCache};
use crate::backend::traits::{EntitySource, Transport};
use crate::error::{ImdbError, Result};
use crate::logic::{flatten_record, root_field, Constructor, QueryBuilder, Record};
use crate::model::{CanonicalId, IdKind, SchemaRegistry, Subselection};
use log::{debug, warn};
use serde_json::{json, Value};
use std::sync::Arc;

/// Fetches root entities through the GraphQL endpoint. Responses are
/// validated against the schema before they are flattened.
pub struct GraphQlSource<T: Transport> {
    transport: T,
    registry: Arc<SchemaRegistry>,
    endpoint: String,
    cache: Option<ResponseCache>,
}

impl<T: Transport> GraphQlSource<T> {
    pub fn new(transport: T, registry: Arc<SchemaRegistry>, endpoint: &str) -> Self {
        Self {
            transport,
            registry,
            endpoint: endpoint.to_string(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Pull `data.<root>` out of a GraphQL response body
    fn extract_root<'v>(kind: IdKind, id: &CanonicalId, body: &'v Value) -> Result<&'v Value> {
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                warn!("GraphQL query for {} returned {} error(s)", id, errors.len());
                return Err(ImdbError::RemoteQueryError(errors.clone()));
            }
        }

        let data = body
            .get("data")
            .filter(|data| data.is_object())
            .ok_or_else(|| {
                ImdbError::MalformedResponse("GraphQL response has no data".to_string())
            })?;

        match data.get(root_field(kind)) {
            None | Some(Value::Null) => {
                warn!("{} {} not found", kind, id);
                Err(ImdbError::NotFound(id.to_string()))
            }
            Some(root) => Ok(root),
        }
    }
}

#[async_trait::async_trait]
impl<T: Transport> EntitySource for GraphQlSource<T> {
    async fn fetch(&self, kind: IdKind, id: &CanonicalId) -> Result<Record> {
        let key = CacheKey::new(kind, id, None);
        if let Some(cache) = &self.cache {
            if let Some(record) = cache.get(&key).await {
                debug!("cache hit for {} {}", kind, id);
                return Ok(record);
            }
        }

        let query = QueryBuilder::new(&self.registry).root_query(kind, id)?;
        debug!("GraphQL query: {}", query);

        let body = self
            .transport
            .post_json(&self.endpoint, &json!({ "query": query }))
            .await?;
        let raw = Self::extract_root(kind, id, &body)?;

        let entity = Constructor::new(&self.registry).construct_kind(kind.descriptor_name(), raw)?;
        let record = flatten_record(&entity)?;

        if let Some(cache) = &self.cache {
            cache.put(key, record.clone()).await;
        }
        Ok(record)
    }

    async fn fetch_subselection(
        &self,
        _kind: IdKind,
        _id: &CanonicalId,
        subselection: Subselection,
    ) -> Result<Record> {
        Err(ImdbError::UnsupportedOperation(format!(
            "sub-selection '{}' is not available on the GraphQL backend",
            subselection
        )))
    }

    fn supports_subselection(&self) -> bool {
        false
    }
}
