use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::lib::allocation::{Allocation, AllocationSet};
use crate::lib::config::BackendOptions;
use crate::lib::error::QueryError;

/// Ordered key-value request parameters, passed through to the backend as-is
pub type QueryParams = Vec<(String, String)>;

/// A read-only channel to the cost backend.
///
/// Implementations issue one GET per call and return the raw response body.
/// They do not retry or cache.
#[allow(async_fn_in_trait)]
pub trait CostTransport {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<String, QueryError>;
}

/// Envelope shared by the backend's JSON endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: Option<u16>,
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<Option<T>, QueryError> {
        match self.code {
            Some(code) if code != 200 => Err(QueryError::Backend {
                code,
                message: self.message.unwrap_or_default(),
            }),
            _ => Ok(self.data),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendConfig {
    #[serde(default)]
    currency_code: String,
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<Envelope<T>, QueryError> {
    serde_json::from_str(body).map_err(|e| QueryError::InvalidResponse {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Fetch the currency code configured in the backend
pub async fn query_currency_code<T: CostTransport>(
    transport: &T,
    backend: &BackendOptions,
) -> Result<String, QueryError> {
    let body = transport.get(&backend.currency_path, &Vec::new()).await?;
    let config: Option<BackendConfig> = decode(&backend.currency_path, &body)?.into_data()?;
    Ok(config.unwrap_or_default().currency_code)
}

/// Best-effort currency lookup. Failures are logged and yield an empty code.
pub async fn currency_code_or_default<T: CostTransport>(
    transport: &T,
    backend: &BackendOptions,
) -> String {
    match query_currency_code(transport, backend).await {
        Ok(code) => code,
        Err(e) => {
            debug!("failed to get currency code, displaying as empty string: {e}");
            String::new()
        }
    }
}

/// Build allocation request parameters. The series is always accumulated.
pub fn allocation_params(
    window: &str,
    aggregation: &[&str],
    filter_namespace: Option<&str>,
) -> QueryParams {
    let mut params = vec![
        ("window".to_string(), window.to_string()),
        ("aggregate".to_string(), aggregation.join(",")),
        ("accumulate".to_string(), "true".to_string()),
    ];
    if let Some(namespace) = filter_namespace {
        params.push(("filterNamespaces".to_string(), namespace.to_string()));
    }
    params
}

/// Query the allocation API. One set is returned per accumulated window.
pub async fn query_allocation<T: CostTransport>(
    transport: &T,
    params: &QueryParams,
    backend: &BackendOptions,
) -> Result<Vec<AllocationSet>, QueryError> {
    let path = backend.allocation_path.as_str();
    let body = transport.get(path, params).await?;
    let sets: Vec<Map<String, Value>> = decode(path, &body)?.into_data()?.unwrap_or_default();

    let sets = sets
        .into_iter()
        .map(|set| {
            set.into_iter()
                .map(|(name, value)| {
                    let mut alloc: Allocation =
                        serde_json::from_value(value).map_err(|e| QueryError::InvalidResponse {
                            path: path.to_string(),
                            reason: format!("allocation {name:?}: {e}"),
                        })?;
                    if alloc.name.is_empty() {
                        alloc.name = name;
                    }
                    Ok(alloc)
                })
                .collect::<Result<AllocationSet, QueryError>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("allocation API returned {} set(s)", sets.len());
    Ok(sets)
}

/// Required accumulated lookup. Any failure is wrapped as an allocation API error.
pub async fn query_accumulated_allocation<T: CostTransport>(
    transport: &T,
    params: &QueryParams,
    backend: &BackendOptions,
) -> Result<AllocationSet, QueryError> {
    query_allocation(transport, params, backend)
        .await
        .and_then(|sets| sets.into_iter().next().ok_or(QueryError::EmptyResponse))
        .map_err(|e| QueryError::Allocation(Box::new(e)))
}
