use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

use crate::lib::error::{ConfigError, QueryError, Result};
use crate::lib::query::{CostTransport, QueryParams};

/// Reaches the cost backend directly over HTTP
pub struct EndpointTransport {
    client: Client,
    endpoint: Url,
}

impl EndpointTransport {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    fn url_for(&self, path: &str, params: &QueryParams) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path(&format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        ));
        url.set_query(None);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        url
    }
}

impl CostTransport for EndpointTransport {
    async fn get(&self, path: &str, params: &QueryParams) -> std::result::Result<String, QueryError> {
        let url = self.url_for(path, params);
        debug!("GET {url}");

        let transport_error = |reason: String| QueryError::Transport {
            path: path.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        if !status.is_success() {
            return Err(QueryError::Backend {
                code: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
