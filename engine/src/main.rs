// bel-report: command-line view of the BEL / ALM workbook
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::alm::{AlmRowExt, AlmTableExt, ReferenceRow};
use engine::config::EngineSettings;
use engine::data::filter::PeriodRange;
use engine::data::periods;
use engine::services::{DashboardService, TableKind};
use shared::models::{RangeStrategy, Table};
use shared::utils::{format_percent, format_value};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bel-report", version, about = "BEL and ALM duration tables from the reporting workbook")]
struct Cli {
    /// Workbook to read (defaults to the configured path)
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// JSON settings file overriding the built-in layout
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print extracted tables
    Tables {
        #[arg(long, value_enum)]
        table: Option<TableKind>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Print the (period, metric, value) records of a filtered slice as JSON
    Chart {
        #[arg(long, value_enum)]
        table: TableKind,
        /// Metric to include; repeat for several. Defaults to the configured preset.
        #[arg(long = "row")]
        rows: Vec<String>,
        /// First period: a date or a column label
        #[arg(long)]
        from: Option<String>,
        /// Last period: a date or a column label
        #[arg(long)]
        to: Option<String>,
    },
    /// Optimal asset duration for a reference row of the ALM table
    Alm {
        /// "last", a zero-based row index, or a reporting date
        #[arg(long, default_value = "last")]
        reference: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("bel-report failed: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => EngineSettings::load_from_path(path)?,
        None => EngineSettings::load_default()?,
    };
    let workbook = cli.workbook.clone().unwrap_or_else(|| settings.workbook_path.clone());
    info!(workbook = %workbook.display(), "Starting bel-report");

    let mut service = DashboardService::new(settings);
    let dashboard = service
        .dashboard(&workbook)
        .with_context(|| format!("loading '{}'", workbook.display()))?;

    match cli.command {
        Command::Tables { table, format } => {
            let kinds: Vec<TableKind> = match table {
                Some(kind) => vec![kind],
                None => TableKind::ALL.to_vec(),
            };
            for kind in kinds {
                print_table(&dashboard.table(kind), format)?;
            }
        }
        Command::Chart { table, rows, from, to } => {
            let source = dashboard.table(table);
            let rows = if rows.is_empty() { service.default_rows(table, &source) } else { rows };
            let range = parse_range(&source, from.as_deref(), to.as_deref())?;
            let view = service.chart(&workbook, table, &rows, &range)?;
            if let Some(message) = view.message() {
                eprintln!("{}", message);
            }
            println!("{}", serde_json::to_string_pretty(&view.records)?);
        }
        Command::Alm { reference, from, to } => {
            let alm = match (from.as_deref(), to.as_deref()) {
                (None, None) => dashboard.alm.clone(),
                (start, end) => {
                    let start = start.map(parse_cli_date).transpose()?;
                    let end = end.map(parse_cli_date).transpose()?;
                    // A missing bound means the table's own first or last date.
                    let first = dashboard.alm.rows.first().map(|r| r.date);
                    let last = dashboard.alm.rows.last().map(|r| r.date);
                    match (start.or(first), end.or(last)) {
                        (Some(s), Some(e)) => dashboard.alm.filter_dates(s, e),
                        _ => dashboard.alm.clone(),
                    }
                }
            };
            let reference = parse_reference(&reference)?;
            let Some(row) = alm.reference_row(reference) else {
                eprintln!("{}", engine::services::NO_DATA_MESSAGE);
                return Ok(());
            };
            let target = row
                .duration_target()
                .ok_or_else(|| anyhow!("row {} lacks Duration Liabilities or Surplus Asset %", row.date))?;
            println!("reference date:          {}", target.date);
            println!("duration liabilities:    {}", format_value(Some(target.duration_liabilities), 4));
            println!("surplus asset %:         {}", format_percent(Some(target.surplus_asset_pct), 2));
            println!("duration asset:          {}", format_value(target.duration_asset, 4));
            println!("optimal asset duration:  {}", format_value(Some(target.optimal_asset_duration), 4));
            println!("gap (asset - optimal):   {}", format_value(target.gap(), 4));
        }
    }
    Ok(())
}

fn print_table(table: &Table, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table)?);
        }
        OutputFormat::Csv => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "# {}", table.name)?;
            let mut wtr = csv::Writer::from_writer(&mut out);
            let mut header = vec!["metric".to_string()];
            header.extend(table.column_texts());
            wtr.write_record(&header)?;
            for (label, cells) in table.row_labels.iter().zip(&table.cells) {
                let mut record = vec![label.clone()];
                record.extend(cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
                wtr.write_record(&record)?;
            }
            wtr.flush()?;
            drop(wtr);
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Dates when the table is dated and both ends parse; column labels otherwise.
fn parse_range(table: &Table, from: Option<&str>, to: Option<&str>) -> Result<PeriodRange> {
    if from.is_none() && to.is_none() {
        return Ok(PeriodRange::All);
    }
    let full = PeriodRange::full(table);
    if table.strategy == RangeStrategy::Dates {
        if let PeriodRange::Dates { start, end } = full {
            let resolve = |s: Option<&str>, default| match s {
                None => Some(default),
                Some(s) => periods::parse_date(s).or_else(|| periods::parse_month_token(s)),
            };
            if let (Some(start), Some(end)) = (resolve(from, start), resolve(to, end)) {
                return Ok(PeriodRange::Dates { start, end });
            }
        }
    }
    let (first, last) = match &full {
        PeriodRange::Labels { start, end } => (start.clone(), end.clone()),
        _ => {
            let first = table.columns.first().map(|c| c.text.clone()).unwrap_or_default();
            let last = table.columns.last().map(|c| c.text.clone()).unwrap_or_default();
            (first, last)
        }
    };
    Ok(PeriodRange::Labels {
        start: from.map(str::to_string).unwrap_or(first),
        end: to.map(str::to_string).unwrap_or(last),
    })
}

fn parse_cli_date(s: &str) -> Result<chrono::NaiveDate> {
    periods::parse_date(s)
        .or_else(|| periods::parse_month_token(s))
        .ok_or_else(|| anyhow!("cannot parse date '{}'", s))
}

fn parse_reference(s: &str) -> Result<ReferenceRow> {
    if s.eq_ignore_ascii_case("last") {
        return Ok(ReferenceRow::Last);
    }
    if let Ok(index) = s.parse::<usize>() {
        return Ok(ReferenceRow::Index(index));
    }
    Ok(ReferenceRow::Date(parse_cli_date(s)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::PeriodLabel;

    fn dated() -> Table {
        Table {
            name: "BEL".into(),
            row_labels: vec!["BEL Discounted".into()],
            columns: vec![
                PeriodLabel::new("Jan '25", NaiveDate::from_ymd_opt(2025, 1, 31)),
                PeriodLabel::new("Feb '25", NaiveDate::from_ymd_opt(2025, 2, 28)),
            ],
            cells: vec![vec![Some(1.0), Some(2.0)]],
            strategy: RangeStrategy::Dates,
        }
    }

    #[test]
    fn test_parse_range_dates() {
        let range = parse_range(&dated(), Some("2025-02-01"), None).unwrap();
        assert_eq!(
            range,
            PeriodRange::Dates {
                start: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_range_labels_fallback() {
        let mut table = dated();
        table.strategy = RangeStrategy::Positions;
        let range = parse_range(&table, None, Some("Jan '25")).unwrap();
        assert_eq!(range, PeriodRange::Labels { start: "Jan '25".into(), end: "Jan '25".into() });
        assert_eq!(parse_range(&table, None, None).unwrap(), PeriodRange::All);
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("LAST").unwrap(), ReferenceRow::Last);
        assert_eq!(parse_reference("2").unwrap(), ReferenceRow::Index(2));
        assert_eq!(
            parse_reference("2025-03-31").unwrap(),
            ReferenceRow::Date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())
        );
        assert!(parse_reference("soon").is_err());
    }
}
