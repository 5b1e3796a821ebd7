//! Record list output in table, JSON or CSV form

use super::RenderError;
use crate::models::Record;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown format: {}. Use: table, json, csv", other)),
        }
    }
}

pub fn write_records<W: Write>(
    mut writer: W,
    records: &[Record],
    format: OutputFormat,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Table => write_table(&mut writer, records),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
            Ok(())
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for record in records {
                csv.serialize(record)?;
            }
            csv.flush()?;
            Ok(())
        }
    }
}

fn write_table<W: Write>(writer: &mut W, records: &[Record]) -> Result<(), RenderError> {
    if records.is_empty() {
        writeln!(writer, "No records yet")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<10} | {:<5} | {:<4} | {:<11} | {:<10} | {:>3} | {:<24} | {}",
        "Date", "Time", "Type", "Color", "Feeling", "Min", "Symptoms", "ID"
    )?;
    writeln!(writer, "{}", "-".repeat(100))?;

    for record in records {
        let dash = || "-".to_string();
        writeln!(
            writer,
            "{:<10} | {:<5} | {:<4} | {:<11} | {:<10} | {:>3} | {:<24} | {}",
            record.record_date,
            record.record_time.clone().unwrap_or_else(dash),
            record.stool_type.map(|t| t.to_string()).unwrap_or_else(dash),
            record.color.clone().unwrap_or_else(dash),
            record.feeling.clone().unwrap_or_else(dash),
            record
                .duration_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(dash),
            record.symptom_list().join(", "),
            record.lid.as_deref().unwrap_or(&record.record_id),
        )?;
    }

    Ok(())
}
