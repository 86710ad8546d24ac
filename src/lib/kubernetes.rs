use std::path::Path;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use log::{debug, info};

use crate::lib::config::BackendOptions;
use crate::lib::error::{ConfigError, KubernetesError, QueryError, Result};
use crate::lib::query::{CostTransport, QueryParams};

/// Resolve cluster connection parameters from kubeconfig or the in-cluster environment
pub async fn resolve_config(context: Option<&str>, kubeconfig: Option<&Path>) -> Result<Config> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let config = match kubeconfig {
        Some(path) => {
            debug!("Loading kubeconfig from {}", path.display());
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| ConfigError::Kubeconfig {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| ConfigError::NoContext(e.to_string()))?
        }
        None if context.is_some() => {
            debug!("Using custom context for Kubeconfig");
            Config::from_kubeconfig(&options)
                .await
                .map_err(|e| ConfigError::NoContext(e.to_string()))?
        }
        None => {
            debug!("Inferring Kubernetes config from the environment");
            Config::infer()
                .await
                .map_err(|e| ConfigError::NoContext(e.to_string()))?
        }
    };

    info!("Resolved cluster endpoint {}", config.cluster_url);
    Ok(config)
}

/// Reaches the cost backend through the API server's service proxy
pub struct ServiceProxyTransport {
    client: Client,
    proxy_base: String,
}

impl ServiceProxyTransport {
    pub fn new(config: Config, backend: &BackendOptions) -> Result<Self> {
        debug!("Creating a Kubernetes client for the service proxy");
        let client =
            Client::try_from(config).map_err(|e| KubernetesError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            proxy_base: proxy_base(backend),
        })
    }
}

/// API server path prefix that proxies to the backend service
pub fn proxy_base(backend: &BackendOptions) -> String {
    format!(
        "/api/v1/namespaces/{}/services/http:{}:{}/proxy",
        urlencoding::encode(&backend.service_namespace),
        urlencoding::encode(&backend.service_name),
        backend.service_port
    )
}

fn encode_params(params: &QueryParams) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

impl CostTransport for ServiceProxyTransport {
    async fn get(&self, path: &str, params: &QueryParams) -> std::result::Result<String, QueryError> {
        let mut uri = format!("{}{}", self.proxy_base, path);
        if !params.is_empty() {
            uri.push('?');
            uri.push_str(&encode_params(params));
        }
        debug!("GET {uri}");

        let transport_error = |reason: String| QueryError::Transport {
            path: path.to_string(),
            reason,
        };
        let request = http::Request::get(uri.as_str())
            .body(Vec::new())
            .map_err(|e| transport_error(e.to_string()))?;

        self.client
            .request_text(request)
            .await
            .map_err(|e| transport_error(e.to_string()))
    }
}
