use std::io::{self, Write};

use serde::Serialize;

use crate::lib::allocation::Allocation;
use crate::lib::config::CostQuery;

/// Top-level JSON document for `--output json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport<'a> {
    pub metadata: ReportMetadata<'a>,
    pub allocations: &'a [Allocation],
}

/// Query context the allocations were produced for
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata<'a> {
    pub timestamp: String,
    pub window: &'a str,
    pub window_start: String,
    pub window_end: String,
    pub aggregation: &'a [&'a str],
    pub namespace: Option<&'a str>,
    pub currency_code: &'a str,
    pub projected: bool,
}

impl<'a> CostReport<'a> {
    pub fn new(
        query: &'a CostQuery,
        aggregation: &'a [&'a str],
        currency_code: &'a str,
        allocations: &'a [Allocation],
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: chrono::Utc::now().to_rfc3339(),
                window: &query.window_expr,
                window_start: query.window.start.to_rfc3339(),
                window_end: query.window.end.to_rfc3339(),
                aggregation,
                namespace: query.filter_namespace.as_deref(),
                currency_code,
                projected: query.is_projected(),
            },
            allocations,
        }
    }

    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}
