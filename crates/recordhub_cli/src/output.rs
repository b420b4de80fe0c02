//! Terminal tables and export file writers.

use anyhow::Context;
use clap::ValueEnum;
use recordhub_core::ExportTable;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Writes `table` to `path`, or to stdout when no path is given.
pub fn write_export(
    table: &ExportTable,
    format: ExportFormat,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        ExportFormat::Csv => write_csv(table, sink),
        ExportFormat::Json => write_json(table, sink),
    }
}

fn write_csv(table: &ExportTable, sink: impl Write) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// One JSON object per row, keyed by the header names.
fn write_json(table: &ExportTable, mut sink: impl Write) -> anyhow::Result<()> {
    let objects: Vec<Map<String, Value>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .header
                .iter()
                .cloned()
                .zip(row.iter().cloned().map(Value::String))
                .collect()
        })
        .collect();
    serde_json::to_writer_pretty(&mut sink, &objects)?;
    writeln!(sink)?;
    sink.flush()?;
    Ok(())
}

/// Prints left-aligned columns sized to the widest cell.
pub fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|title| title.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    println!("{}", render(header.to_vec()));
    for row in rows {
        println!("{}", render(row.iter().map(String::as_str).collect()));
    }
}
