use thiserror::Error;

/// Main error type for the cost plugin
#[derive(Error, Debug)]
pub enum CostError {
    /// Cluster configuration could not be resolved
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Flag or argument values rejected before any request is made
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Kubernetes client errors
    #[error("Kubernetes error: {0}")]
    Kubernetes(#[from] KubernetesError),

    /// Cost backend query errors
    #[error("{0}")]
    Query(#[from] QueryError),

    /// Flag values that could not be read back from parsed matches
    #[error("{0}")]
    Cli(#[from] clap::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invocation without a usable subcommand
    #[error("{0}")]
    Usage(String),
}

/// Configuration-resolution errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No kubeconfig context could be selected
    #[error("no context is currently set, use \"kubectl config use-context <context>\" to select a new one ({0})")]
    NoContext(String),

    /// Kubeconfig file could not be read
    #[error("failed to read kubeconfig {path}: {reason}")]
    Kubeconfig { path: String, reason: String },

    /// Invalid configuration value
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Client-side validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// More than one positional argument
    #[error("either one or no arguments are allowed")]
    TooManyArguments,

    /// Window expression that does not match the window grammar
    #[error("failed to parse window {input:?}: {reason}")]
    InvalidWindow { input: String, reason: String },
}

/// Kubernetes-specific errors
#[derive(Error, Debug)]
pub enum KubernetesError {
    /// Client could not be built from the resolved config
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Cost backend errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Transport-level failure reaching the backend
    #[error("request to {path} failed: {reason}")]
    Transport { path: String, reason: String },

    /// Backend answered with a non-success status
    #[error("backend returned {code}: {message}")]
    Backend { code: u16, message: String },

    /// Response body could not be decoded
    #[error("invalid response from {path}: {reason}")]
    InvalidResponse { path: String, reason: String },

    /// Response decoded but carried no allocation sets
    #[error("allocation response contained no data")]
    EmptyResponse,

    /// Allocation query failed; fatal for the command
    #[error("failed to query allocation API: {0}")]
    Allocation(Box<QueryError>),
}

/// Helper type alias for Results
pub type Result<T> = std::result::Result<T, CostError>;
