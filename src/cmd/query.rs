//! Read-only aggregate reports over a loaded store.
//!
//! These are the queries the dashboard consumes. A store whose schema has
//! not been provisioned yet yields empty results, not an error.

use crate::config::EtlConfig;
use crate::report::{OutputFormat, Report};
use crate::store::{self, OrderStore, Target};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Available aggregate reports.
#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportKind {
    /// Order count, total revenue, and average revenue
    Kpis,
    /// Revenue per order date
    Daily,
    /// Revenue per region, highest first
    Region,
    /// Revenue per product, highest first
    Product,
}

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  order-etl query kpis
  order-etl query daily --format json
  order-etl query region --target networked -o revenue.csv --format csv")]
pub struct QueryArgs {
    /// Report to run
    #[arg(value_enum)]
    pub report: ReportKind,

    /// Output format: table, json, csv
    #[arg(short = 'f', long, default_value = "table")]
    pub format: String,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Target store: embedded (DuckDB) or networked (PostgreSQL)
    #[arg(short, long, value_name = "TARGET")]
    pub target: Option<Target>,

    /// Directory holding the embedded store
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// YAML config file (overridden by env vars and flags)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: QueryArgs) -> Result<()> {
    let format: OutputFormat = args.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let mut cfg = EtlConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        cfg.data_dir = dir;
    }
    let target = args.target.unwrap_or(cfg.target);

    let mut store = store::open(target, &cfg)?;
    let report = build_report(args.report, store.as_mut())?;

    match args.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Cannot create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            report.write(format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = std::io::stdout();
            report.write(format, &mut stdout)?;
        }
    }
    Ok(())
}

fn build_report(kind: ReportKind, store: &mut dyn OrderStore) -> Result<Report> {
    let report = match kind {
        ReportKind::Kpis => {
            let kpis = store.kpis()?;
            let mut report = Report::new(vec!["orders", "total_revenue", "avg_revenue"]);
            report.push_row(vec![
                kpis.orders.to_string(),
                kpis.total_revenue.to_string(),
                format!("{:.2}", kpis.avg_revenue),
            ]);
            report
        }
        ReportKind::Daily => {
            let mut report = Report::new(vec!["order_date", "revenue"]);
            for row in store.revenue_by_day()? {
                report.push_row(vec![
                    row.order_date.format("%Y-%m-%d").to_string(),
                    row.revenue.to_string(),
                ]);
            }
            report
        }
        ReportKind::Region => grouped_report("region", store.revenue_by_region()?),
        ReportKind::Product => grouped_report("product", store.revenue_by_product()?),
    };
    Ok(report)
}

fn grouped_report(column: &str, rows: Vec<store::GroupRevenue>) -> Report {
    let mut report = Report::new(vec![column, "revenue"]);
    for row in rows {
        report.push_row(vec![row.name, row.revenue.to_string()]);
    }
    report
}
