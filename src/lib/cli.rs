use std::path::PathBuf;

use clap::{Arg, ArgAction, Args, Command};
use url::Url;

use crate::lib::config::{BackendOptions, OutputFormat};

const COST_EXAMPLE: &str = "\
Examples:
    # Show the projected monthly rate for each namespace based on the last 5 days of activity.
    kubectl cost namespace --window 5d

    # Show how much each namespace cost over the past 5 days with additional CPU and memory cost and efficiency breakdown.
    kubectl cost namespace --historical --window 5d --show-cpu --show-memory --show-efficiency

    # Show the projected monthly rate for each deployment based on the last month of activity with CPU, memory, GPU, PV, and network cost breakdown.
    kubectl cost deployment --window month --show-cpu --show-memory --show-gpu --show-pv --show-network";

/// Declarative description of one aggregated subcommand
#[derive(Debug, Clone, Copy)]
pub struct AggregatedCommand {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub aggregation: &'static [&'static str],
    /// Whether `-n/--namespace` is meaningful for this aggregation
    pub namespace_filter: bool,
}

pub const AGGREGATED_COMMANDS: &[AggregatedCommand] = &[
    AggregatedCommand {
        name: "namespace",
        aliases: &["ns"],
        aggregation: &["namespace"],
        namespace_filter: false,
    },
    AggregatedCommand {
        name: "deployment",
        aliases: &["deploy"],
        aggregation: &["namespace", "deployment"],
        namespace_filter: true,
    },
    AggregatedCommand {
        name: "controller",
        aliases: &[],
        aggregation: &["namespace", "controller"],
        namespace_filter: true,
    },
    AggregatedCommand {
        name: "pod",
        aliases: &["pods"],
        aggregation: &["namespace", "pod"],
        namespace_filter: true,
    },
];

pub fn find_command(name: &str) -> Option<&'static AggregatedCommand> {
    AGGREGATED_COMMANDS.iter().find(|c| c.name == name)
}

/// Flags shared by every invocation
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Cluster connection flags
#[derive(Args, Debug, Clone, Default)]
pub struct KubeArgs {
    /// Kubeconfig context to use
    ///
    /// Use if you have multiple clusters in your kubeconfig
    #[arg(long)]
    pub context: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Query the cost backend directly at this URL instead of through the API server proxy
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<Url>,
}

/// Cost query and display flags
#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    /// The window of data to query, e.g. 5d, 12h, month, lastweek, 1d offset 1d
    #[arg(long, default_value = "1d")]
    pub window: String,

    /// Show the total cost incurred over the window instead of a projected monthly rate
    #[arg(long)]
    pub historical: bool,

    /// Show data for CPU cost
    #[arg(long)]
    pub show_cpu: bool,

    /// Show data for memory cost
    #[arg(long)]
    pub show_memory: bool,

    /// Show data for GPU cost
    #[arg(long)]
    pub show_gpu: bool,

    /// Show data for persistent volume cost
    #[arg(long)]
    pub show_pv: bool,

    /// Show data for network cost
    #[arg(long)]
    pub show_network: bool,

    /// Show efficiency of cost alongside CPU and memory cost
    #[arg(long)]
    pub show_efficiency: bool,

    /// Show all resource costs and efficiencies
    #[arg(short = 'A', long)]
    pub show_all_resources: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Location of the cost backend inside the cluster
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Namespace the cost backend is installed in
    #[arg(long, default_value = "kubecost")]
    pub cost_namespace: String,

    /// Name of the cost backend service
    #[arg(long, default_value = "kubecost-cost-analyzer")]
    pub service_name: String,

    /// Port of the cost backend service
    #[arg(long, default_value_t = 9090)]
    pub service_port: u16,

    /// Path of the allocation API
    #[arg(long, default_value = "/model/allocation")]
    pub allocation_path: String,

    /// Path of the backend configuration API that reports the currency code
    #[arg(long, default_value = "/model/getConfigs")]
    pub currency_path: String,
}

impl From<BackendArgs> for BackendOptions {
    fn from(args: BackendArgs) -> Self {
        Self {
            service_namespace: args.cost_namespace,
            service_name: args.service_name,
            service_port: args.service_port,
            allocation_path: args.allocation_path,
            currency_path: args.currency_path,
        }
    }
}

/// Build the subcommand for one aggregation dimension
pub fn build_aggregated_command(command: &AggregatedCommand) -> Command {
    let mut cmd = Command::new(command.name)
        .visible_aliases(command.aliases.iter().copied())
        .about(format!(
            "view cost information aggregated by {}",
            command.aggregation.join(", ")
        ))
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .num_args(1..)
                .action(ArgAction::Append)
                .hide(true),
        );

    if command.namespace_filter {
        cmd = cmd.arg(
            Arg::new("namespace")
                .short('n')
                .long("namespace")
                .value_name("NAMESPACE")
                .help("Limit results to only one namespace. Defaults to all namespaces."),
        );
    }

    let cmd = CostArgs::augment_args(cmd);
    KubeArgs::augment_args(cmd)
}

/// Build the `cost` root command with one subcommand per aggregation dimension
pub fn build_root_command() -> Command {
    let root = Command::new("cost")
        .bin_name("kubectl cost")
        .about("View cluster cost information.")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(COST_EXAMPLE)
        .styles(get_styles());

    AGGREGATED_COMMANDS
        .iter()
        .fold(GlobalArgs::augment_args(root), |root, command| {
            root.subcommand(build_aggregated_command(command))
        })
}

/// Set color and variants for help description
fn get_styles() -> clap::builder::Styles {
    use anstyle::{AnsiColor, Color, Style};

    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
