//! Output formatting for aggregate reports.

use std::io::Write;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON array format
    Json,
    /// CSV format
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Valid: table, json, csv", s)),
        }
    }
}

/// A tabular report ready for formatting.
#[derive(Debug, Clone)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: Vec<S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Format the report to a string
    pub fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.format_table(),
            OutputFormat::Json => self.format_json(),
            OutputFormat::Csv => self.format_csv(),
        }
    }

    /// Write the formatted report to a writer
    pub fn write<W: Write>(&self, format: OutputFormat, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.format(format).as_bytes())
    }

    fn format_table(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (i, val) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(val.chars().count());
                }
            }
        }

        let mut output = String::new();
        let separator = |out: &mut String| {
            out.push('+');
            for width in &widths {
                out.push_str(&"-".repeat(width + 2));
                out.push('+');
            }
            out.push('\n');
        };

        separator(&mut output);
        output.push('|');
        for (i, col) in self.columns.iter().enumerate() {
            output.push_str(&format!(" {:width$} |", col, width = widths[i]));
        }
        output.push('\n');
        separator(&mut output);

        for row in &self.rows {
            output.push('|');
            for (i, val) in row.iter().enumerate() {
                output.push_str(&format!(" {:width$} |", val, width = widths[i]));
            }
            output.push('\n');
        }
        separator(&mut output);
        output
    }

    fn format_json(&self) -> String {
        let objects: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let map: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(col, val)| (col.clone(), json_value(val)))
                    .collect();
                serde_json::Value::Object(map)
            })
            .collect();
        serde_json::Value::Array(objects).to_string()
    }

    fn format_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(&csv_row(&self.columns));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&csv_row(row));
            output.push('\n');
        }
        output
    }
}

/// Preserve numbers as JSON numbers, everything else as strings.
fn json_value(value: &str) -> serde_json::Value {
    if let Ok(n) = value.parse::<i64>() {
        return serde_json::Value::from(n);
    }
    if let Ok(f) = value.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return serde_json::Value::Number(n);
        }
    }
    serde_json::Value::from(value)
}

fn csv_row(values: &[String]) -> String {
    values
        .iter()
        .map(|v| {
            if v.contains(',') || v.contains('"') || v.contains('\n') {
                format!("\"{}\"", v.replace('"', "\"\""))
            } else {
                v.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut report = Report::new(vec!["region", "revenue"]);
        report.push_row(vec!["서울", "120000"]);
        report.push_row(vec!["부산", "80000"]);
        report
    }

    #[test]
    fn test_csv_output_has_header_and_rows() {
        let csv = sample().format(OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "region,revenue");
        assert_eq!(lines[1], "서울,120000");
    }

    #[test]
    fn test_json_output_preserves_numbers() {
        let json = sample().format(OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["region"], "서울");
        assert_eq!(parsed[0]["revenue"], 120000);
    }

    #[test]
    fn test_table_output_pads_columns() {
        let table = sample().format(OutputFormat::Table);
        assert!(table.contains("| region"));
        assert!(table.contains("120000"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
