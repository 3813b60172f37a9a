use std::io::Write;
use std::path::Path;

use eyre::{bail, WrapErr};
use serde::Serialize;

use rollbook_core::record::check_bounds;
use rollbook_core::{load, save, LoadReport, Record, RecordStore, SortOrder, Statistics, Status};

use crate::cli::{Cli, Command};

// ==============================================================================
// Dispatch
// ==============================================================================

/// Run one subcommand against the data file, writing user-facing output to
/// `out`. The file is rewritten only when the command changed the roll.
pub fn run(cli: Cli, out: &mut impl Write) -> eyre::Result<()> {
    let (mut store, report) = open_store(&cli.file)?;

    match cli.command {
        Command::List { sort, json } => {
            let mut rows: Vec<&Record> = store.iter().collect();
            if let Some(order) = sort {
                let order = SortOrder::from(order);
                rows.sort_by(|a, b| order.compare(a, b));
            }
            if json {
                let rows: Vec<RecordRow> = rows.into_iter().map(RecordRow::from).collect();
                print_json(out, &rows)?;
            } else {
                print_table(out, &rows)?;
            }
        }
        Command::Show { key } => {
            let record = store.find_by_key(key)?;
            print_table(out, &[record])?;
        }
        Command::Add { key, name, score } => {
            let (key, score) = check_bounds(key, score)?;
            store.insert(Record::new(key, &name, score)?)?;
            writeln!(out, "added roll number {key}")?;
        }
        Command::Update {
            key,
            new_key,
            name,
            score,
        } => {
            let index = store.find_index_by_key(key)?;
            let current = &store.records()[index];
            let (new_key, new_score) = check_bounds(
                new_key.unwrap_or(i64::from(current.key)),
                score.unwrap_or(i64::from(current.score)),
            )?;
            let new_name = name.unwrap_or_else(|| current.name.clone());
            store.update(index, new_key, &new_name, new_score)?;
            writeln!(out, "updated roll number {key}")?;
        }
        Command::Remove { key } => {
            let removed = store.remove_by_key(key)?;
            writeln!(out, "removed roll number {} ({})", removed.key, removed.name)?;
        }
        Command::Stats { json } => match Statistics::from_records(store.records()) {
            Some(stats) if json => print_json(out, &stats)?,
            Some(stats) => print_stats(out, &stats)?,
            None if json => writeln!(out, "null")?,
            None => writeln!(out, "no records")?,
        },
        Command::Sort { order } => {
            store.sort(order.into());
            writeln!(out, "sorted {} records", store.len())?;
        }
        Command::Check => {
            let Some(report) = report else {
                bail!("data file `{}` does not exist", cli.file.display());
            };
            for issue in &report.skipped {
                writeln!(out, "line {}: {}: {}", issue.line, issue.kind, issue.message)?;
            }
            writeln!(
                out,
                "{} records loaded, {} lines skipped",
                report.loaded,
                report.skipped.len()
            )?;
        }
    }

    if store.is_dirty() {
        save(&mut store, &cli.file).context("save data file")?;
        tracing::info!(path = %cli.file.display(), records = store.len(), "saved roll");
    }
    Ok(())
}

/// Load the data file, or start an empty roll when it does not exist yet.
fn open_store(path: &Path) -> eyre::Result<(RecordStore, Option<LoadReport>)> {
    let mut store = RecordStore::new();
    if !path.exists() {
        tracing::info!(path = %path.display(), "data file not found, starting empty roll");
        return Ok((store, None));
    }

    let report = load(&mut store, path).wrap_err("load data file")?;
    if !report.skipped.is_empty() {
        tracing::warn!(
            path = %path.display(),
            skipped = report.skipped.len(),
            "some lines of the data file were skipped"
        );
    }
    Ok((store, Some(report)))
}

// ==============================================================================
// Output
// ==============================================================================

#[derive(Serialize)]
struct RecordRow<'a> {
    #[serde(flatten)]
    record: &'a Record,
    status: Status,
}

impl<'a> From<&'a Record> for RecordRow<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            record,
            status: record.status(),
        }
    }
}

fn print_table(out: &mut impl Write, records: &[&Record]) -> eyre::Result<()> {
    writeln!(out, "{:>6}  {:<30}  {:>5}  STATUS", "ROLL", "NAME", "SCORE")?;
    for record in records {
        writeln!(
            out,
            "{:>6}  {:<30}  {:>5}  {}",
            record.key,
            record.name,
            record.score,
            record.status()
        )?;
    }
    Ok(())
}

fn print_stats(out: &mut impl Write, stats: &Statistics) -> eyre::Result<()> {
    writeln!(out, "Total:     {}", stats.total)?;
    writeln!(out, "Average:   {:.2}", stats.average)?;
    writeln!(out, "Highest:   {}", stats.highest)?;
    writeln!(out, "Lowest:    {}", stats.lowest)?;
    writeln!(out, "Passed:    {} ({:.1}%)", stats.passed, stats.pass_rate)?;
    writeln!(out, "Failed:    {}", stats.failed)?;
    Ok(())
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> eyre::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serialize JSON output")?;
    writeln!(out)?;
    Ok(())
}
