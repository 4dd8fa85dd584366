use crate::backend::cache::{CacheKey, ResponseCache};
use crate::backend::traits::{EntitySource, Transport};
use crate::error::{json_kind, ImdbError, Result};
use crate::logic::{flatten_record, Record};
use crate::model::{CanonicalId, IdKind, Subselection};
use log::{debug, warn};
use serde_json::Value;

/// Fetches records and sub-selections from the REST API. REST payloads are
/// passed through the flattener without schema validation.
pub struct RestSource<T: Transport> {
    transport: T,
    base_url: String,
    cache: Option<ResponseCache>,
}

impl<T: Transport> RestSource<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// `<base>/v2/{titles|names}/<id>[/<subselection>]`
    pub fn url(&self, kind: IdKind, id: &CanonicalId, subselection: Option<Subselection>) -> String {
        let collection = match kind {
            IdKind::Title => "titles",
            IdKind::Name => "names",
        };
        match subselection {
            Some(sub) => format!("{}/v2/{}/{}/{}", self.base_url, collection, id, sub),
            None => format!("{}/v2/{}/{}", self.base_url, collection, id),
        }
    }

    async fn get(
        &self,
        kind: IdKind,
        id: &CanonicalId,
        subselection: Option<Subselection>,
    ) -> Result<Record> {
        let key = CacheKey::new(kind, id, subselection);
        if let Some(cache) = &self.cache {
            if let Some(record) = cache.get(&key).await {
                debug!("cache hit for {} {}", kind, id);
                return Ok(record);
            }
        }

        let body = self.transport.get_json(&self.url(kind, id, subselection)).await?;
        let body = match body {
            Value::Object(map) => map,
            other => {
                return Err(ImdbError::MalformedResponse(format!(
                    "expected an object from the REST API, got {}",
                    json_kind(&other)
                )))
            }
        };

        // Unknown names come back as 200 with `{}` or just the echoed id
        if kind == IdKind::Name && is_empty_person(&body, id) {
            warn!("{} {} not found", kind, id);
            return Err(ImdbError::NotFound(id.to_string()));
        }

        let record = flatten_record(&body)?;
        if let Some(cache) = &self.cache {
            cache.put(key, record.clone()).await;
        }
        Ok(record)
    }
}

fn is_empty_person(body: &Record, id: &CanonicalId) -> bool {
    match body.len() {
        0 => true,
        1 => body.get("id").and_then(Value::as_str) == Some(id.as_str()),
        _ => false,
    }
}

#[async_trait::async_trait]
impl<T: Transport> EntitySource for RestSource<T> {
    async fn fetch(&self, kind: IdKind, id: &CanonicalId) -> Result<Record> {
        self.get(kind, id, None).await
    }

    async fn fetch_subselection(
        &self,
        kind: IdKind,
        id: &CanonicalId,
        subselection: Subselection,
    ) -> Result<Record> {
        self.get(kind, id, Some(subselection)).await
    }

    fn supports_subselection(&self) -> bool {
        true
    }
}
