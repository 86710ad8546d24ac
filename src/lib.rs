//! kubectl cost plugin library
//!
//! This library queries a cluster's cost-model backend for allocation data
//! aggregated by namespace, deployment, controller or pod, and renders the
//! result as a table or JSON document.

pub mod lib {
    pub mod allocation;
    pub mod cli;
    pub mod command;
    pub mod config;
    pub mod endpoint;
    pub mod error;
    pub mod kubernetes;
    pub mod logger;
    pub mod options;
    pub mod output;
    pub mod query;
    pub mod table;
    pub mod window;
}

// Re-export commonly used types at the root level for convenience
pub use lib::allocation::{Allocation, AllocationSet};
pub use lib::cli::{
    AGGREGATED_COMMANDS, AggregatedCommand, GlobalArgs, build_aggregated_command,
    build_root_command,
};
pub use lib::command::{dispatch, run_aggregated_allocation};
pub use lib::config::{
    BackendOptions, Connection, CostQuery, DisplayOptions, OutputFormat,
};
pub use lib::endpoint::EndpointTransport;
pub use lib::error::{
    ConfigError, CostError, KubernetesError, QueryError, Result, ValidationError,
};
pub use lib::kubernetes::{ServiceProxyTransport, resolve_config};
pub use lib::logger::init_logger;
pub use lib::options::{CompletedKubeOptions, CostOptions, KubeOptions};
pub use lib::output::CostReport;
pub use lib::query::{
    CostTransport, QueryParams, allocation_params, currency_code_or_default, query_allocation,
    query_accumulated_allocation, query_currency_code,
};
pub use lib::table::write_allocation_table;
pub use lib::window::Window;
