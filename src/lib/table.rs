use std::io::{self, Write};

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets};

use crate::lib::allocation::{Allocation, AllocationSet};
use crate::lib::config::DisplayOptions;

/// A rendered column of the allocation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column<'a> {
    Key(usize, &'a str),
    Cpu,
    CpuEfficiency,
    Memory,
    MemoryEfficiency,
    Gpu,
    Pv,
    Network,
    TotalEfficiency,
    Total,
}

impl Column<'_> {
    fn header(&self, currency_code: &str, projected: bool) -> String {
        match self {
            Column::Key(_, key) => title_case(key),
            Column::Cpu => "CPU".to_string(),
            Column::CpuEfficiency => "CPU Eff.".to_string(),
            Column::Memory => "Memory".to_string(),
            Column::MemoryEfficiency => "Memory Eff.".to_string(),
            Column::Gpu => "GPU".to_string(),
            Column::Pv => "PV".to_string(),
            Column::Network => "Network".to_string(),
            Column::TotalEfficiency => "Total Eff.".to_string(),
            Column::Total => {
                let label = if projected {
                    "Projected Monthly Rate"
                } else {
                    "Total Cost"
                };
                if currency_code.is_empty() {
                    label.to_string()
                } else {
                    format!("{label} ({currency_code})")
                }
            }
        }
    }

    fn value(&self, alloc: &Allocation, keys: &[&str]) -> String {
        match self {
            Column::Key(i, _) => keys.get(*i).copied().unwrap_or_default().to_string(),
            Column::Cpu => cost(alloc.cpu_cost),
            Column::CpuEfficiency => efficiency(alloc.cpu_efficiency),
            Column::Memory => cost(alloc.ram_cost),
            Column::MemoryEfficiency => efficiency(alloc.ram_efficiency),
            Column::Gpu => cost(alloc.gpu_cost),
            Column::Pv => cost(alloc.pv_cost),
            Column::Network => cost(alloc.network_cost),
            Column::TotalEfficiency => efficiency(alloc.total_efficiency),
            Column::Total => cost(alloc.total_cost),
        }
    }
}

fn columns<'a>(aggregation: &[&'a str], display: &DisplayOptions) -> Vec<Column<'a>> {
    let mut columns: Vec<Column> = aggregation
        .iter()
        .enumerate()
        .map(|(i, key)| Column::Key(i, *key))
        .collect();

    if display.show_cpu {
        columns.push(Column::Cpu);
        if display.show_efficiency {
            columns.push(Column::CpuEfficiency);
        }
    }
    if display.show_memory {
        columns.push(Column::Memory);
        if display.show_efficiency {
            columns.push(Column::MemoryEfficiency);
        }
    }
    if display.show_gpu {
        columns.push(Column::Gpu);
    }
    if display.show_pv {
        columns.push(Column::Pv);
    }
    if display.show_network {
        columns.push(Column::Network);
    }
    if display.show_efficiency {
        columns.push(Column::TotalEfficiency);
    }
    columns.push(Column::Total);
    columns
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn cost(value: f64) -> String {
    format!("{value:.2}")
}

fn efficiency(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Render allocations as an aligned table, one row per record in backend order.
///
/// When `projected` is set the total column is labelled as a monthly rate;
/// the numbers themselves are printed as returned by the backend.
pub fn write_allocation_table<W: Write>(
    out: &mut W,
    aggregation: &[&str],
    allocations: &AllocationSet,
    display: &DisplayOptions,
    currency_code: &str,
    projected: bool,
) -> io::Result<()> {
    let columns = columns(aggregation, display);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(
            columns
                .iter()
                .map(|c| Cell::new(c.header(currency_code, projected))),
        );

    for alloc in allocations.iter() {
        let keys = alloc.key_values(aggregation.len());
        table.add_row(columns.iter().map(|c| Cell::new(c.value(alloc, &keys))));
    }

    for (i, column) in columns.iter().enumerate() {
        if !matches!(column, Column::Key(..)) {
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(CellAlignment::Right);
            }
        }
    }

    writeln!(out, "{table}")
}
