use url::Url;

use crate::lib::window::Window;

/// Where the cost backend is reached
#[derive(Clone)]
pub enum Connection {
    /// Through the Kubernetes API server service proxy
    Cluster(kube::Config),
    /// Directly over HTTP, e.g. via a port-forward
    Direct(Url),
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connection::Cluster(config) => f
                .debug_tuple("Cluster")
                .field(&config.cluster_url.to_string())
                .finish(),
            Connection::Direct(url) => f.debug_tuple("Direct").field(&url.as_str()).finish(),
        }
    }
}

/// Location of the cost backend service and its endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOptions {
    pub service_namespace: String,
    pub service_name: String,
    pub service_port: u16,
    pub allocation_path: String,
    pub currency_path: String,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            service_namespace: "kubecost".to_string(),
            service_name: "kubecost-cost-analyzer".to_string(),
            service_port: 9090,
            allocation_path: "/model/allocation".to_string(),
            currency_path: "/model/getConfigs".to_string(),
        }
    }
}

/// Optional table columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_cpu: bool,
    pub show_memory: bool,
    pub show_gpu: bool,
    pub show_pv: bool,
    pub show_network: bool,
    pub show_efficiency: bool,
}

/// Output format for query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// JSON document
    Json,
}

/// Validated cost query, built once every option phase has succeeded
#[derive(Debug, Clone)]
pub struct CostQuery {
    pub window_expr: String,
    pub window: Window,
    pub filter_namespace: Option<String>,
    pub display: DisplayOptions,
    pub historical: bool,
    pub output: OutputFormat,
    pub backend: BackendOptions,
}

impl CostQuery {
    /// Non-historical queries are shown as a projected monthly rate
    pub fn is_projected(&self) -> bool {
        !self.historical
    }
}
