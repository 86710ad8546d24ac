use std::io::Write;

use chrono::Utc;
use clap::ArgMatches;
use log::{debug, info};

use crate::lib::cli::{AggregatedCommand, find_command};
use crate::lib::config::{Connection, CostQuery, OutputFormat};
use crate::lib::endpoint::EndpointTransport;
use crate::lib::error::{CostError, Result};
use crate::lib::kubernetes::ServiceProxyTransport;
use crate::lib::options::{CostOptions, KubeOptions, positional_args};
use crate::lib::output::CostReport;
use crate::lib::query::{
    CostTransport, allocation_params, currency_code_or_default, query_accumulated_allocation,
};
use crate::lib::table::write_allocation_table;

/// Run the subcommand selected in `matches`, writing results to `out`
pub async fn dispatch<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<()> {
    let Some((name, sub_matches)) = matches.subcommand() else {
        return Err(CostError::Usage("please use a subcommand".to_string()));
    };
    let command = find_command(name)
        .ok_or_else(|| CostError::Usage(format!("unknown subcommand {name:?}")))?;

    run_command(command, sub_matches, out).await
}

async fn run_command<W: Write>(
    command: &AggregatedCommand,
    matches: &ArgMatches,
    out: &mut W,
) -> Result<()> {
    let connection = KubeOptions::from_matches(matches)?
        .complete(positional_args(matches))
        .await?
        .validate()?;

    let query = CostOptions::from_matches(matches)?
        .complete()
        .validate(Utc::now())?;

    debug!("Running {} with {:?}", command.name, connection);
    match connection {
        Connection::Cluster(config) => {
            let transport = ServiceProxyTransport::new(config, &query.backend)?;
            run_aggregated_allocation(&transport, &query, command.aggregation, out).await
        }
        Connection::Direct(url) => {
            let transport = EndpointTransport::new(url)?;
            run_aggregated_allocation(&transport, &query, command.aggregation, out).await
        }
    }
}

/// Look up the currency code, query accumulated allocations and render them
pub async fn run_aggregated_allocation<T: CostTransport, W: Write>(
    transport: &T,
    query: &CostQuery,
    aggregation: &[&str],
    out: &mut W,
) -> Result<()> {
    let currency_code = currency_code_or_default(transport, &query.backend).await;

    let params = allocation_params(
        &query.window_expr,
        aggregation,
        query.filter_namespace.as_deref(),
    );
    let allocations = query_accumulated_allocation(transport, &params, &query.backend).await?;
    info!(
        "Retrieved {} allocations aggregated by {}",
        allocations.len(),
        aggregation.join(",")
    );

    match query.output {
        OutputFormat::Table => write_allocation_table(
            out,
            aggregation,
            &allocations,
            &query.display,
            &currency_code,
            query.is_projected(),
        )?,
        OutputFormat::Json => {
            CostReport::new(query, aggregation, &currency_code, &allocations.allocations)
                .write(out)?
        }
    }

    Ok(())
}
