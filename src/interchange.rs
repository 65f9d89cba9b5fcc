//! Interchange file handling (generator output / transformer input).
//!
//! One UTF-8 CSV per calendar day of execution, named `orders_YYYYMMDD.csv`,
//! with a fixed header. The file is written once per run (overwriting any
//! same-day file) and read back exactly once by the transform+load step; it
//! then remains on disk as an audit artifact.

use crate::error::{EtlError, Result};
use crate::generator::RawOrder;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column order of the interchange file, fixed by contract.
pub const COLUMNS: [&str; 6] = [
    "order_id",
    "order_date",
    "product",
    "unit_price",
    "quantity",
    "region",
];

/// Path of the interchange file for a given execution date.
pub fn interchange_path(data_dir: &Path, date: NaiveDate) -> PathBuf {
    data_dir.join(format!("orders_{}.csv", date.format("%Y%m%d")))
}

/// Write the batch to `path`, creating the parent directory if absent and
/// overwriting any existing file.
pub fn write_orders(path: &Path, orders: &[RawOrder]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| EtlError::InputIo {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let io_err = |source| EtlError::InputIo {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", COLUMNS.join(",")).map_err(io_err)?;
    for o in orders {
        let unit_price = o.unit_price.to_string();
        let quantity = o.quantity.to_string();
        let fields = [
            o.order_id.as_str(),
            o.order_date.as_str(),
            o.product.as_str(),
            unit_price.as_str(),
            quantity.as_str(),
            o.region.as_str(),
        ];
        let line = fields.map(csv_escape).join(",");
        writeln!(writer, "{line}").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Read a previously written interchange file.
///
/// Fails with `InputNotFound` before opening anything when the file is
/// absent, and with `InputMalformed` on header or row-shape mismatches.
pub fn read_orders(path: &Path) -> Result<Vec<RawOrder>> {
    if !path.exists() {
        return Err(EtlError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| EtlError::InputIo {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = content.lines().enumerate();
    match lines.next() {
        Some((_, header)) if header == COLUMNS.join(",") => {}
        Some((_, header)) => {
            return Err(EtlError::InputMalformed {
                line: 1,
                reason: format!("unexpected header '{header}'"),
            })
        }
        None => {
            return Err(EtlError::InputMalformed {
                line: 1,
                reason: "empty file".to_string(),
            })
        }
    }

    let mut orders = Vec::new();
    for (idx, line) in lines {
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = csv_split(line);
        if fields.len() != COLUMNS.len() {
            return Err(EtlError::InputMalformed {
                line: line_no,
                reason: format!("expected {} fields, found {}", COLUMNS.len(), fields.len()),
            });
        }

        let int_field = |name: &str, value: &str| -> Result<i32> {
            value.parse().map_err(|_| EtlError::InputMalformed {
                line: line_no,
                reason: format!("{name} '{value}' is not an integer"),
            })
        };

        orders.push(RawOrder {
            order_id: fields[0].clone(),
            order_date: fields[1].clone(),
            product: fields[2].clone(),
            unit_price: int_field("unit_price", &fields[3])?,
            quantity: int_field("quantity", &fields[4])?,
            region: fields[5].clone(),
        });
    }
    Ok(orders)
}

/// Quote a CSV field if it contains a comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split a CSV line into fields, honoring quoted fields with doubled quotes.
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
