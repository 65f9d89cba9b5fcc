//! Star-schema transformation.
//!
//! Pure, deterministic split of the raw order batch into a date dimension
//! and an order fact table joined on a surrogate integer date key. No I/O
//! happens here; bad rows reject the whole batch rather than being coerced.

use crate::error::{EtlError, Result};
use crate::generator::{RawOrder, PRODUCTS, REGIONS};
use chrono::{Datelike, NaiveDate};

/// One row of the date dimension, one per distinct order date in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DateDimRow {
    pub order_date: NaiveDate,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub date_key: i32,
}

/// One row of the order fact table, one per surviving raw order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFactRow {
    pub order_id: String,
    pub date_key: i32,
    pub product: String,
    pub region: String,
    pub unit_price: i32,
    pub quantity: i32,
    pub revenue: i64,
}

/// `YYYYMMDD` surrogate key for a calendar date. Pure and injective over
/// valid dates: no two distinct dates share a key.
pub fn date_key(date: NaiveDate) -> i32 {
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

/// Inverse of [`date_key`]. Returns `None` for keys that do not encode a
/// valid calendar date.
pub fn date_from_key(key: i32) -> Option<NaiveDate> {
    let year = key / 10_000;
    let month = (key / 100 % 100) as u32;
    let day = (key % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Transform the raw batch into `(dimension rows, fact rows)`.
///
/// Dates are parsed strictly as ISO calendar dates and product/region
/// values are checked against the fixed catalogs; the first offending row
/// fails the whole batch. Revenue is `unit_price * quantity` in integer
/// arithmetic, computed once here and never recomputed downstream.
pub fn transform(raw: &[RawOrder]) -> Result<(Vec<DateDimRow>, Vec<OrderFactRow>)> {
    let mut dims: Vec<DateDimRow> = Vec::new();
    let mut facts = Vec::with_capacity(raw.len());

    for row in raw {
        let date = NaiveDate::parse_from_str(&row.order_date, "%Y-%m-%d").map_err(|source| {
            EtlError::DateParse {
                value: row.order_date.clone(),
                source,
            }
        })?;
        if !PRODUCTS.contains(&row.product.as_str()) {
            return Err(EtlError::UnknownCatalogValue {
                field: "product",
                value: row.product.clone(),
            });
        }
        if !REGIONS.contains(&row.region.as_str()) {
            return Err(EtlError::UnknownCatalogValue {
                field: "region",
                value: row.region.clone(),
            });
        }

        let key = date_key(date);
        if !dims.iter().any(|d| d.date_key == key) {
            dims.push(DateDimRow {
                order_date: date,
                year: date.year(),
                month: date.month() as i32,
                day: date.day() as i32,
                date_key: key,
            });
        }

        facts.push(OrderFactRow {
            order_id: row.order_id.clone(),
            date_key: key,
            product: row.product.clone(),
            region: row.region.clone(),
            unit_price: row.unit_price,
            quantity: row.quantity,
            revenue: i64::from(row.unit_price) * i64::from(row.quantity),
        });
    }

    Ok((dims, facts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, date: &str, price: i32, qty: i32) -> RawOrder {
        RawOrder {
            order_id: id.to_string(),
            order_date: date.to_string(),
            product: PRODUCTS[1].to_string(),
            region: REGIONS[2].to_string(),
            unit_price: price,
            quantity: qty,
        }
    }

    #[test]
    fn test_revenue_is_integer_product() {
        let (_, facts) = transform(&[raw("O100001", "2024-06-01", 300_000, 5)]).unwrap();
        assert_eq!(facts[0].revenue, 1_500_000);
    }

    #[test]
    fn test_dimension_holds_one_row_per_distinct_date() {
        let rows = vec![
            raw("O100001", "2024-06-01", 10_000, 1),
            raw("O100002", "2024-06-01", 20_000, 2),
            raw("O100003", "2024-06-02", 30_000, 3),
        ];
        let (dims, facts) = transform(&rows).unwrap();
        assert_eq!(dims.len(), 2);
        assert_eq!(facts.len(), 3);
        assert_eq!(dims[0].date_key, 20240601);
        assert_eq!(dims[0].year, 2024);
        assert_eq!(dims[0].month, 6);
        assert_eq!(dims[0].day, 1);
    }

    #[test]
    fn test_every_fact_references_a_dimension_row() {
        let rows = vec![
            raw("O100001", "2024-05-30", 10_000, 1),
            raw("O100002", "2024-06-02", 20_000, 2),
        ];
        let (dims, facts) = transform(&rows).unwrap();
        for fact in &facts {
            assert!(dims.iter().any(|d| d.date_key == fact.date_key));
        }
    }

    #[test]
    fn test_malformed_date_rejects_whole_batch() {
        let rows = vec![
            raw("O100001", "2024-06-01", 10_000, 1),
            raw("O100002", "not-a-date", 20_000, 2),
        ];
        let err = transform(&rows).unwrap_err();
        assert!(matches!(err, EtlError::DateParse { .. }));
    }

    #[test]
    fn test_out_of_catalog_product_is_rejected() {
        let mut bad = raw("O100001", "2024-06-01", 10_000, 1);
        bad.product = "플로피 디스크".to_string();
        let err = transform(&[bad]).unwrap_err();
        assert!(matches!(
            err,
            EtlError::UnknownCatalogValue {
                field: "product",
                ..
            }
        ));
    }

    #[test]
    fn test_date_key_round_trips_over_trailing_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        for offset in 0..=30 {
            let date = today - chrono::Duration::days(offset);
            assert_eq!(date_from_key(date_key(date)), Some(date));
        }
    }

    #[test]
    fn test_date_from_key_rejects_invalid_encodings() {
        assert_eq!(date_from_key(20241332), None);
        assert_eq!(date_from_key(20240230), None);
    }
}
