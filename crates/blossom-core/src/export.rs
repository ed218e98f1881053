//! CSV and JSON projections of the symptom log.
//!
//! Both formats carry the same six fields per entry and can be read back.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::cycle::Phase;
use crate::error::ExportError;
use crate::symptoms::{Intensity, Symptom, SymptomEntry};

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 6] = ["date", "cycle_day", "phase", "symptom", "intensity", "notes"];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Suggested download file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "blossom_symptom_log.csv",
            ExportFormat::Json => "blossom_symptom_log.json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serializes entries in the given format.
pub fn export(entries: &[SymptomEntry], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => Ok(to_csv(entries)),
        ExportFormat::Json => to_json(entries),
    }
}

/// Parses entries in the given format.
pub fn import(input: &str, format: ExportFormat) -> Result<Vec<SymptomEntry>, ExportError> {
    match format {
        ExportFormat::Csv => from_csv(input),
        ExportFormat::Json => from_json(input),
    }
}

/// Pretty JSON array, two-space indent.
pub fn to_json(entries: &[SymptomEntry]) -> Result<String, ExportError> {
    serde_json::to_string_pretty(entries).map_err(|e| ExportError::Serialize(e.to_string()))
}

pub fn from_json(input: &str) -> Result<Vec<SymptomEntry>, ExportError> {
    serde_json::from_str(input).map_err(|e| ExportError::BadRecord {
        line: e.line(),
        message: e.to_string(),
    })
}

/// CSV with a header row; unknown cycle days are empty cells.
pub fn to_csv(entries: &[SymptomEntry]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for entry in entries {
        let cycle_day = entry.cycle_day.map(|d| d.to_string()).unwrap_or_default();
        let fields = [
            entry.date.format("%Y-%m-%d").to_string(),
            cycle_day,
            entry.phase.label().to_string(),
            entry.symptom.name().to_string(),
            entry.intensity.to_string(),
            entry.notes.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

pub fn from_csv(input: &str) -> Result<Vec<SymptomEntry>, ExportError> {
    let mut records = parse_records(input)?.into_iter();

    let Some((_, header)) = records.next() else {
        return Ok(Vec::new());
    };
    if header.iter().map(String::as_str).ne(CSV_HEADER.iter().copied()) {
        return Err(ExportError::BadHeader(header.join(",")));
    }

    records
        .filter(|(_, fields)| !(fields.len() == 1 && fields[0].is_empty()))
        .map(|(line, fields)| parse_entry(line, &fields))
        .collect()
}

fn parse_entry(line: usize, fields: &[String]) -> Result<SymptomEntry, ExportError> {
    let bad = |message: String| ExportError::BadRecord { line, message };

    let [date, cycle_day, phase, symptom, intensity, notes] = fields else {
        return Err(bad(format!("expected {} fields, found {}", CSV_HEADER.len(), fields.len())));
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| bad(format!("date: {e}")))?;
    let cycle_day = if cycle_day.is_empty() {
        None
    } else {
        Some(cycle_day.parse::<u32>().map_err(|e| bad(format!("cycle_day: {e}")))?)
    };
    let phase = phase.parse::<Phase>().map_err(|e| bad(e.to_string()))?;
    let intensity = intensity
        .parse::<i64>()
        .map_err(|e| bad(format!("intensity: {e}")))
        .and_then(|v| Intensity::new(v).map_err(|e| bad(e.to_string())))?;

    Ok(SymptomEntry {
        date,
        cycle_day,
        phase,
        symptom: Symptom::from_name(symptom),
        intensity,
        notes: notes.clone(),
    })
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits CSV text into records, tracking the line each record starts on.
fn parse_records(input: &str) -> Result<Vec<(usize, Vec<String>)>, ExportError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ExportError::BadRecord {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}
