use crate::backend::{EntitySource, GraphQlSource, HttpTransport, ResponseCache, RestSource};
use crate::config::AppConfig;
use crate::error::{ImdbError, Result};
use crate::logic::{flatten, flatten_record, Record};
use crate::model::{build_registry, normalize, IdInput, IdKind, Subselection};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Which remote API answers lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Backend {
    GraphQl,
    Rest,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Backend::GraphQl => write!(f, "graphql"),
            Backend::Rest => write!(f, "rest"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "graphql" => Ok(Backend::GraphQl),
            "rest" => Ok(Backend::Rest),
            _ => Err(format!(
                "Invalid backend: {}. Must be one of: graphql, rest",
                s
            )),
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Entry point for movie and person lookups.
///
/// Every operation returns a flattened [`Record`]. Sub-selections and
/// updates need a backend that serves sub-selections (REST); asking any
/// other backend fails with `UnsupportedOperation` before the identifier or
/// the network is touched.
pub struct ImdbApi {
    backend: Backend,
    source: Arc<dyn EntitySource>,
}

impl ImdbApi {
    pub fn new(backend: Backend, source: Arc<dyn EntitySource>) -> Self {
        Self { backend, source }
    }

    /// Wire up the configured backend over HTTP
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        let cache = config.cache_ttl().map(ResponseCache::new);

        let source: Arc<dyn EntitySource> = match config.client.backend {
            Backend::GraphQl => {
                let registry = Arc::new(build_registry()?);
                let source =
                    GraphQlSource::new(transport, registry, &config.api.graphql_endpoint);
                match cache {
                    Some(cache) => Arc::new(source.with_cache(cache)),
                    None => Arc::new(source),
                }
            }
            Backend::Rest => {
                let source = RestSource::new(transport, &config.api.rest_base_url);
                match cache {
                    Some(cache) => Arc::new(source.with_cache(cache)),
                    None => Arc::new(source),
                }
            }
        };

        Ok(Self::new(config.client.backend, source))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub async fn get_movie(
        &self,
        id: impl Into<IdInput>,
        subselection: Option<&str>,
    ) -> Result<Record> {
        self.get(IdKind::Title, id.into(), subselection).await
    }

    pub async fn get_person(
        &self,
        id: impl Into<IdInput>,
        subselection: Option<&str>,
    ) -> Result<Record> {
        self.get(IdKind::Name, id.into(), subselection).await
    }

    /// Fetch `subselection` for the movie in `record` and store it under the
    /// same key. On error `record` is left untouched.
    pub async fn update_movie(&self, record: &mut Record, subselection: &str) -> Result<()> {
        self.update(IdKind::Title, record, subselection).await
    }

    /// Fetch `subselection` for the person in `record` and store it under the
    /// same key. On error `record` is left untouched.
    pub async fn update_person(&self, record: &mut Record, subselection: &str) -> Result<()> {
        self.update(IdKind::Name, record, subselection).await
    }

    async fn get(
        &self,
        kind: IdKind,
        id: IdInput,
        subselection: Option<&str>,
    ) -> Result<Record> {
        let subselection = subselection.filter(|s| !s.is_empty());
        if let Some(requested) = subselection {
            self.require_subselections(&format!("sub-selection '{}'", requested))?;
        }

        let id = normalize(id, kind)?;
        let record = match subselection {
            Some(requested) => {
                let subselection = Subselection::parse_for(requested, kind)?;
                self.source.fetch_subselection(kind, &id, subselection).await?
            }
            None => self.source.fetch(kind, &id).await?,
        };

        flatten_record(&record)
    }

    async fn update(&self, kind: IdKind, record: &mut Record, subselection: &str) -> Result<()> {
        self.require_subselections(&format!("updating a {}", kind))?;

        let id = match record.get("id") {
            Some(value) => IdInput::try_from(value)?,
            None => IdInput::Text(String::new()),
        };
        let id = normalize(id, kind)?;
        let subselection = Subselection::parse_for(subselection, kind)?;

        let mut response = self.source.fetch_subselection(kind, &id, subselection).await?;
        let payload = response.remove(subselection.as_str()).ok_or_else(|| {
            ImdbError::MalformedResponse(format!(
                "response for {} has no '{}' key",
                id, subselection
            ))
        })?;
        debug!("merging {} into {} {}", subselection, kind, id);

        record.insert(subselection.as_str().to_string(), flatten(&payload));
        Ok(())
    }

    fn require_subselections(&self, what: &str) -> Result<()> {
        if self.source.supports_subselection() {
            Ok(())
        } else {
            Err(ImdbError::UnsupportedOperation(format!(
                "{} is only possible via the REST API ({} backend in use)",
                what, self.backend
            )))
        }
    }
}
