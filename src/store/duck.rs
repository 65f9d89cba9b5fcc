//! Embedded DuckDB store.
//!
//! Keeps the warehouse in a single database file next to the interchange
//! files. Batch replace drops and recreates both tables inside one
//! transaction, so a failed run never leaves the file half-replaced.

use super::{parse_day, DailyRevenue, GroupRevenue, Kpis, OrderStore, Target};
use crate::error::Result;
use crate::transform::{DateDimRow, OrderFactRow};
use duckdb::{params, Connection};
use std::path::Path;

const DIM_DATE_DDL: &str = "CREATE TABLE IF NOT EXISTS dim_date (
    order_date TIMESTAMP,
    year INTEGER,
    month INTEGER,
    day INTEGER,
    date_key INTEGER PRIMARY KEY
)";

const FACT_ORDERS_DDL: &str = "CREATE TABLE IF NOT EXISTS fact_orders (
    order_id TEXT PRIMARY KEY,
    date_key INTEGER REFERENCES dim_date(date_key),
    product TEXT,
    region TEXT,
    unit_price INTEGER,
    quantity INTEGER,
    revenue BIGINT
)";

/// Embedded store backed by a DuckDB database file.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open (or create) the database file, creating its parent directory
    /// if absent.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| crate::error::EtlError::StoreIo {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn grouped_revenue(&mut self, column: &str) -> Result<Vec<GroupRevenue>> {
        if !self.table_exists("fact_orders")? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {column}, CAST(SUM(revenue) AS BIGINT)
             FROM fact_orders
             GROUP BY 1
             ORDER BY 2 DESC"
        ))?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(GroupRevenue {
                name: row.get(0)?,
                revenue: row.get(1)?,
            });
        }
        Ok(out)
    }
}

impl OrderStore for DuckStore {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn target(&self) -> Target {
        Target::Embedded
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(DIM_DATE_DDL)?;
        self.conn.execute_batch(FACT_ORDERS_DDL)?;
        Ok(())
    }

    fn replace_batch(&mut self, dims: &[DateDimRow], facts: &[OrderFactRow]) -> Result<()> {
        let tx = self.conn.transaction()?;

        // Replace-table semantics, child table first because of the FK.
        tx.execute_batch("DROP TABLE IF EXISTS fact_orders")?;
        tx.execute_batch("DROP TABLE IF EXISTS dim_date")?;
        tx.execute_batch(DIM_DATE_DDL)?;
        tx.execute_batch(FACT_ORDERS_DDL)?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO dim_date (order_date, year, month, day, date_key)
                 VALUES (CAST(? AS TIMESTAMP), ?, ?, ?, ?)",
            )?;
            for d in dims {
                stmt.execute(params![
                    d.order_date.format("%Y-%m-%d").to_string(),
                    d.year,
                    d.month,
                    d.day,
                    d.date_key,
                ])?;
            }
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO fact_orders
                 (order_id, date_key, product, region, unit_price, quantity, revenue)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for f in facts {
                stmt.execute(params![
                    f.order_id,
                    f.date_key,
                    f.product,
                    f.region,
                    f.unit_price,
                    f.quantity,
                    f.revenue,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn kpis(&mut self) -> Result<Kpis> {
        if !self.table_exists("fact_orders")? {
            return Ok(Kpis::default());
        }
        let kpis = self.conn.query_row(
            "SELECT COUNT(DISTINCT order_id),
                    CAST(COALESCE(SUM(revenue), 0) AS BIGINT),
                    CAST(COALESCE(AVG(revenue), 0) AS DOUBLE)
             FROM fact_orders",
            [],
            |row| {
                Ok(Kpis {
                    orders: row.get(0)?,
                    total_revenue: row.get(1)?,
                    avg_revenue: row.get(2)?,
                })
            },
        )?;
        Ok(kpis)
    }

    fn revenue_by_day(&mut self) -> Result<Vec<DailyRevenue>> {
        if !self.table_exists("fact_orders")? || !self.table_exists("dim_date")? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT strftime(d.order_date, '%Y-%m-%d'),
                    CAST(SUM(f.revenue) AS BIGINT)
             FROM fact_orders f
             JOIN dim_date d ON d.date_key = f.date_key
             GROUP BY 1
             ORDER BY 1",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let day: String = row.get(0)?;
            let revenue: i64 = row.get(1)?;
            out.push(DailyRevenue {
                order_date: parse_day(&day)?,
                revenue,
            });
        }
        Ok(out)
    }

    fn revenue_by_region(&mut self) -> Result<Vec<GroupRevenue>> {
        self.grouped_revenue("region")
    }

    fn revenue_by_product(&mut self) -> Result<Vec<GroupRevenue>> {
        self.grouped_revenue("product")
    }

    fn row_counts(&mut self) -> Result<(i64, i64)> {
        let count = |conn: &Connection, table: &str| -> Result<i64> {
            let n = conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(n)
        };
        let dims = if self.table_exists("dim_date")? {
            count(&self.conn, "dim_date")?
        } else {
            0
        };
        let facts = if self.table_exists("fact_orders")? {
            count(&self.conn, "fact_orders")?
        } else {
            0
        };
        Ok((dims, facts))
    }
}
