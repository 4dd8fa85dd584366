use crate::backend::traits::Transport;
use crate::config::ApiConfig;
use crate::error::{ImdbError, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// `simple-imdb (<version>)`, sent with every request
pub fn user_agent() -> String {
    format!("{} ({})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&user_agent()).map_err(|e| {
            ImdbError::TransportError {
                status: None,
                message: format!("invalid user agent: {}", e),
            }
        })?;
        headers.insert(USER_AGENT, agent);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http })
    }

    async fn read_json(url: &str, response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImdbError::TransportError {
                status: Some(status.as_u16()),
                message: format!(
                    "{} returned {}: {}",
                    url,
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        Self::read_json(url, response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        debug!("POST {}", url);
        let response = self.http.post(url).json(body).send().await?;
        Self::read_json(url, response).await
    }
}
