//! Store-level tests for the embedded DuckDB backend.

use chrono::NaiveDate;
use order_etl::store::{DuckStore, OrderStore};
use order_etl::transform::{date_key, DateDimRow, OrderFactRow};
use tempfile::TempDir;

fn dim(date: &str) -> DateDimRow {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    use chrono::Datelike;
    DateDimRow {
        order_date: d,
        year: d.year(),
        month: d.month() as i32,
        day: d.day() as i32,
        date_key: date_key(d),
    }
}

fn fact(id: &str, date: &str, region: &str, price: i32, qty: i32) -> OrderFactRow {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    OrderFactRow {
        order_id: id.to_string(),
        date_key: date_key(d),
        product: "키보드".to_string(),
        region: region.to_string(),
        unit_price: price,
        quantity: qty,
        revenue: i64::from(price) * i64::from(qty),
    }
}

#[test]
fn test_reads_on_unprovisioned_store_return_empty() {
    let mut store = DuckStore::open_in_memory().unwrap();

    let kpis = store.kpis().unwrap();
    assert_eq!(kpis.orders, 0);
    assert_eq!(kpis.total_revenue, 0);
    assert_eq!(kpis.avg_revenue, 0.0);

    assert!(store.revenue_by_day().unwrap().is_empty());
    assert!(store.revenue_by_region().unwrap().is_empty());
    assert!(store.revenue_by_product().unwrap().is_empty());
    assert_eq!(store.row_counts().unwrap(), (0, 0));
}

#[test]
fn test_ensure_schema_is_idempotent() {
    let mut store = DuckStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    store.ensure_schema().unwrap();
    assert_eq!(store.row_counts().unwrap(), (0, 0));
}

#[test]
fn test_replace_batch_is_full_replace() {
    let mut store = DuckStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();

    let dims = vec![dim("2024-06-01"), dim("2024-06-02")];
    let facts = vec![
        fact("O100001", "2024-06-01", "서울", 10_000, 2),
        fact("O100002", "2024-06-02", "부산", 20_000, 1),
        fact("O100003", "2024-06-02", "서울", 30_000, 3),
    ];
    store.replace_batch(&dims, &facts).unwrap();
    assert_eq!(store.row_counts().unwrap(), (2, 3));

    // Second batch fully replaces the first, never accumulates.
    let dims2 = vec![dim("2024-06-03")];
    let facts2 = vec![fact("O200001", "2024-06-03", "대구", 5_000, 1)];
    store.replace_batch(&dims2, &facts2).unwrap();
    assert_eq!(store.row_counts().unwrap(), (1, 1));

    let kpis = store.kpis().unwrap();
    assert_eq!(kpis.orders, 1);
    assert_eq!(kpis.total_revenue, 5_000);
}

#[test]
fn test_grouped_revenue_sorted_highest_first() {
    let mut store = DuckStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();

    let dims = vec![dim("2024-06-01")];
    let facts = vec![
        fact("O100001", "2024-06-01", "서울", 10_000, 1),
        fact("O100002", "2024-06-01", "부산", 50_000, 2),
        fact("O100003", "2024-06-01", "서울", 20_000, 1),
    ];
    store.replace_batch(&dims, &facts).unwrap();

    let by_region = store.revenue_by_region().unwrap();
    assert_eq!(by_region.len(), 2);
    assert_eq!(by_region[0].name, "부산");
    assert_eq!(by_region[0].revenue, 100_000);
    assert_eq!(by_region[1].name, "서울");
    assert_eq!(by_region[1].revenue, 30_000);
}

#[test]
fn test_daily_revenue_ordered_by_date() {
    let mut store = DuckStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();

    let dims = vec![dim("2024-06-02"), dim("2024-06-01")];
    let facts = vec![
        fact("O100001", "2024-06-02", "서울", 10_000, 1),
        fact("O100002", "2024-06-01", "부산", 20_000, 1),
    ];
    store.replace_batch(&dims, &facts).unwrap();

    let daily = store.revenue_by_day().unwrap();
    assert_eq!(daily.len(), 2);
    assert!(daily[0].order_date < daily[1].order_date);
}

#[test]
fn test_store_persists_across_reopens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("warehouse.duckdb");

    {
        let mut store = DuckStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        store
            .replace_batch(
                &[dim("2024-06-01")],
                &[fact("O100001", "2024-06-01", "서울", 10_000, 1)],
            )
            .unwrap();
    }

    let mut reopened = DuckStore::open(&path).unwrap();
    assert_eq!(reopened.row_counts().unwrap(), (1, 1));
}
