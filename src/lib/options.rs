//! Option lifecycles for the aggregated commands.
//!
//! Both option sets move through the same phases: populate from parsed
//! flags, `complete` to fill in derived values, then `validate` to check
//! cross-field invariants. Each phase consumes its input and `validate`
//! yields an immutable value, so a command can only reach the backend
//! with options that passed every phase.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgMatches, FromArgMatches};
use log::debug;
use url::Url;

use crate::lib::cli::{CostArgs, KubeArgs};
use crate::lib::config::{
    BackendOptions, Connection, CostQuery, DisplayOptions, OutputFormat,
};
use crate::lib::error::{CostError, Result, ValidationError};
use crate::lib::kubernetes::resolve_config;
use crate::lib::window::Window;

/// Cluster connection options as populated from flags
#[derive(Debug, Clone, Default)]
pub struct KubeOptions {
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub endpoint: Option<Url>,
}

impl KubeOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let args = KubeArgs::from_arg_matches(matches).map_err(CostError::Cli)?;
        Ok(Self {
            context: args.context,
            kubeconfig: args.kubeconfig,
            endpoint: args.endpoint,
        })
    }

    /// Resolve the connection target. A direct endpoint skips kubeconfig entirely.
    pub async fn complete(self, args: Vec<String>) -> Result<CompletedKubeOptions> {
        let connection = match self.endpoint {
            Some(url) => {
                debug!("Using cost backend endpoint {url}");
                Connection::Direct(url)
            }
            None => Connection::Cluster(
                resolve_config(self.context.as_deref(), self.kubeconfig.as_deref()).await?,
            ),
        };
        Ok(CompletedKubeOptions { connection, args })
    }
}

/// Connection options after configuration has been resolved
#[derive(Debug, Clone)]
pub struct CompletedKubeOptions {
    connection: Connection,
    args: Vec<String>,
}

impl CompletedKubeOptions {
    pub fn new(connection: Connection, args: Vec<String>) -> Self {
        Self { connection, args }
    }

    pub fn validate(self) -> Result<Connection> {
        if self.args.len() > 1 {
            return Err(ValidationError::TooManyArguments.into());
        }
        Ok(self.connection)
    }
}

/// Cost query options as populated from flags
#[derive(Debug, Clone)]
pub struct CostOptions {
    pub window: String,
    pub filter_namespace: Option<String>,
    pub display: DisplayOptions,
    pub show_all_resources: bool,
    pub historical: bool,
    pub output: OutputFormat,
    pub backend: BackendOptions,
}

impl Default for CostOptions {
    fn default() -> Self {
        Self {
            window: "1d".to_string(),
            filter_namespace: None,
            display: DisplayOptions::default(),
            show_all_resources: false,
            historical: false,
            output: OutputFormat::Table,
            backend: BackendOptions::default(),
        }
    }
}

impl CostOptions {
    /// Populate from a subcommand's matches. `-n` is read only where it was registered.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let args = CostArgs::from_arg_matches(matches).map_err(CostError::Cli)?;
        let filter_namespace = matches
            .try_get_one::<String>("namespace")
            .ok()
            .flatten()
            .cloned();

        Ok(Self {
            window: args.window,
            filter_namespace,
            display: DisplayOptions {
                show_cpu: args.show_cpu,
                show_memory: args.show_memory,
                show_gpu: args.show_gpu,
                show_pv: args.show_pv,
                show_network: args.show_network,
                show_efficiency: args.show_efficiency,
            },
            show_all_resources: args.show_all_resources,
            historical: args.historical,
            output: args.output,
            backend: args.backend.into(),
        })
    }

    pub fn complete(mut self) -> Self {
        if self.show_all_resources {
            self.display = DisplayOptions {
                show_cpu: true,
                show_memory: true,
                show_gpu: true,
                show_pv: true,
                show_network: true,
                show_efficiency: true,
            };
        }
        self.window = self.window.trim().to_string();
        self.filter_namespace = self.filter_namespace.filter(|ns| !ns.is_empty());
        self
    }

    /// Check the window parses against `now` and freeze the query
    pub fn validate(self, now: DateTime<Utc>) -> Result<CostQuery> {
        let window = Window::parse(&self.window, now)?;
        debug!(
            "Window {:?} resolves to {} .. {}",
            self.window, window.start, window.end
        );

        Ok(CostQuery {
            window_expr: self.window,
            window,
            filter_namespace: self.filter_namespace,
            display: self.display,
            historical: self.historical,
            output: self.output,
            backend: self.backend,
        })
    }
}

/// Positional arguments passed to a subcommand
pub fn positional_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::lib::cli::{build_aggregated_command, find_command};

    fn direct() -> Connection {
        Connection::Direct(Url::parse("http://localhost:9090").unwrap())
    }

    fn matches_for(command: &str, argv: &[&str]) -> ArgMatches {
        let cmd = build_aggregated_command(find_command(command).unwrap());
        cmd.try_get_matches_from(std::iter::once(command).chain(argv.iter().copied()))
            .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_positional_argument_limit() {
        for count in 0..=1 {
            let args = vec!["x".to_string(); count];
            assert!(CompletedKubeOptions::new(direct(), args).validate().is_ok());
        }
        for count in 2..=4 {
            let args = vec!["x".to_string(); count];
            let err = CompletedKubeOptions::new(direct(), args).validate().unwrap_err();
            assert!(matches!(
                err,
                CostError::Validation(ValidationError::TooManyArguments)
            ));
        }
    }

    #[test]
    fn test_positional_args_collected() {
        let matches = matches_for("namespace", &["one", "two"]);
        assert_eq!(positional_args(&matches), vec!["one", "two"]);
        assert!(positional_args(&matches_for("namespace", &[])).is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_skips_kubeconfig() {
        let matches = matches_for(
            "namespace",
            &["--endpoint", "http://localhost:9090", "--kubeconfig", "/nonexistent"],
        );
        let completed = KubeOptions::from_matches(&matches)
            .unwrap()
            .complete(Vec::new())
            .await
            .unwrap();
        assert!(matches!(completed.validate().unwrap(), Connection::Direct(_)));
    }

    #[test]
    fn test_valid_windows() {
        for window in ["5d", "12h", "30m", "2w", "today", "month", "lastweek", "1d offset 1d"] {
            let options = CostOptions {
                window: window.to_string(),
                ..Default::default()
            };
            let query = options.complete().validate(now()).unwrap();
            assert_eq!(query.window_expr, window);
        }
    }

    #[test]
    fn test_invalid_window_names_input() {
        let options = CostOptions {
            window: "5 days".to_string(),
            ..Default::default()
        };
        let err = options.complete().validate(now()).unwrap_err();
        assert!(err.to_string().contains("\"5 days\""));
    }

    #[test]
    fn test_window_case_matches_backend() {
        for window in ["Yesterday", "5D", "MONTH"] {
            let options = CostOptions {
                window: window.to_string(),
                ..Default::default()
            };
            assert!(options.complete().validate(now()).is_err(), "{window} accepted");
        }
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let options = CostOptions {
            window: "100000000d".to_string(),
            ..Default::default()
        };
        let err = options.complete().validate(now()).unwrap_err();
        assert!(err.to_string().contains("window is out of range"));
    }

    #[test]
    fn test_namespace_filter_passthrough() {
        let options = CostOptions::from_matches(&matches_for("deployment", &["-n", "foo"]))
            .unwrap()
            .complete();
        assert_eq!(options.filter_namespace.as_deref(), Some("foo"));

        let options = CostOptions::from_matches(&matches_for("deployment", &["-n", ""]))
            .unwrap()
            .complete();
        assert_eq!(options.filter_namespace, None);

        let options = CostOptions::from_matches(&matches_for("namespace", &[]))
            .unwrap()
            .complete();
        assert_eq!(options.filter_namespace, None);
    }

    #[test]
    fn test_display_flags() {
        let options = CostOptions::from_matches(&matches_for(
            "namespace",
            &["--show-cpu", "--show-efficiency", "--historical"],
        ))
        .unwrap()
        .complete();
        assert!(options.display.show_cpu);
        assert!(options.display.show_efficiency);
        assert!(!options.display.show_memory);
        assert!(options.historical);

        let options = CostOptions::from_matches(&matches_for("namespace", &["-A"]))
            .unwrap()
            .complete();
        assert!(options.display.show_network && options.display.show_gpu);
    }

    #[test]
    fn test_backend_flags() {
        let options = CostOptions::from_matches(&matches_for(
            "pod",
            &["--cost-namespace", "opencost", "--service-port", "9003"],
        ))
        .unwrap();
        assert_eq!(options.backend.service_namespace, "opencost");
        assert_eq!(options.backend.service_port, 9003);
        assert_eq!(options.backend.service_name, "kubecost-cost-analyzer");
    }
}
