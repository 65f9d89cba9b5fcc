//! Networked PostgreSQL store.
//!
//! Schema is declared idempotently at connect time via
//! `CREATE TABLE IF NOT EXISTS`; batch replace is one transaction that
//! truncates both tables and inserts the new batch parent-first, so
//! concurrent readers only ever observe the prior commit or the new batch.

use super::{parse_day, DailyRevenue, GroupRevenue, Kpis, OrderStore, Target};
use crate::config::PgConfig;
use crate::error::Result;
use crate::transform::{DateDimRow, OrderFactRow};
use chrono::NaiveTime;
use postgres::{Client, NoTls};

const DIM_DATE_DDL: &str = "CREATE TABLE IF NOT EXISTS dim_date (
    order_date TIMESTAMP,
    year INT,
    month INT,
    day INT,
    date_key INT PRIMARY KEY
)";

const FACT_ORDERS_DDL: &str = "CREATE TABLE IF NOT EXISTS fact_orders (
    order_id TEXT PRIMARY KEY,
    date_key INT REFERENCES dim_date(date_key) ON DELETE CASCADE,
    product TEXT,
    region TEXT,
    unit_price INT,
    quantity INT,
    revenue BIGINT
)";

/// Networked store backed by a PostgreSQL client connection.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    /// Connect using the given parameters.
    pub fn connect(cfg: &PgConfig) -> Result<Self> {
        let mut config = postgres::Config::new();
        config
            .host(&cfg.host)
            .port(cfg.port)
            .user(&cfg.user)
            .password(&cfg.password)
            .dbname(&cfg.dbname);
        let client = config.connect(NoTls)?;
        Ok(Self { client })
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let row = self.client.query_one(
            "SELECT EXISTS (
                 SELECT 1 FROM information_schema.tables
                 WHERE table_schema = 'public' AND table_name = $1
             )",
            &[&table],
        )?;
        Ok(row.get(0))
    }

    fn grouped_revenue(&mut self, column: &str) -> Result<Vec<GroupRevenue>> {
        if !self.table_exists("fact_orders")? {
            return Ok(Vec::new());
        }
        let rows = self.client.query(
            &format!(
                "SELECT {column}, SUM(revenue)::BIGINT
                 FROM fact_orders
                 GROUP BY 1
                 ORDER BY 2 DESC"
            ),
            &[],
        )?;
        Ok(rows
            .iter()
            .map(|row| GroupRevenue {
                name: row.get(0),
                revenue: row.get(1),
            })
            .collect())
    }
}

impl OrderStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn target(&self) -> Target {
        Target::Networked
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.client.batch_execute(DIM_DATE_DDL)?;
        self.client.batch_execute(FACT_ORDERS_DDL)?;
        Ok(())
    }

    fn replace_batch(&mut self, dims: &[DateDimRow], facts: &[OrderFactRow]) -> Result<()> {
        let mut tx = self.client.transaction()?;

        tx.batch_execute("TRUNCATE fact_orders, dim_date")?;

        let dim_stmt = tx.prepare(
            "INSERT INTO dim_date (order_date, year, month, day, date_key)
             VALUES ($1, $2, $3, $4, $5)",
        )?;
        for d in dims {
            let midnight = d.order_date.and_time(NaiveTime::MIN);
            tx.execute(
                &dim_stmt,
                &[&midnight, &d.year, &d.month, &d.day, &d.date_key],
            )?;
        }

        let fact_stmt = tx.prepare(
            "INSERT INTO fact_orders
             (order_id, date_key, product, region, unit_price, quantity, revenue)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )?;
        for f in facts {
            tx.execute(
                &fact_stmt,
                &[
                    &f.order_id,
                    &f.date_key,
                    &f.product,
                    &f.region,
                    &f.unit_price,
                    &f.quantity,
                    &f.revenue,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn kpis(&mut self) -> Result<Kpis> {
        if !self.table_exists("fact_orders")? {
            return Ok(Kpis::default());
        }
        let row = self.client.query_one(
            "SELECT COUNT(DISTINCT order_id),
                    COALESCE(SUM(revenue), 0)::BIGINT,
                    COALESCE(AVG(revenue), 0)::DOUBLE PRECISION
             FROM fact_orders",
            &[],
        )?;
        Ok(Kpis {
            orders: row.get(0),
            total_revenue: row.get(1),
            avg_revenue: row.get(2),
        })
    }

    fn revenue_by_day(&mut self) -> Result<Vec<DailyRevenue>> {
        if !self.table_exists("fact_orders")? || !self.table_exists("dim_date")? {
            return Ok(Vec::new());
        }
        let rows = self.client.query(
            "SELECT to_char(d.order_date, 'YYYY-MM-DD'), SUM(f.revenue)::BIGINT
             FROM fact_orders f
             JOIN dim_date d ON d.date_key = f.date_key
             GROUP BY 1
             ORDER BY 1",
            &[],
        )?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let day: &str = row.get(0);
            out.push(DailyRevenue {
                order_date: parse_day(day)?,
                revenue: row.get(1),
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
        let dims = if self.table_exists("dim_date")? {
            self.client
                .query_one("SELECT count(*) FROM dim_date", &[])?
                .get(0)
        } else {
            0
        };
        let facts = if self.table_exists("fact_orders")? {
            self.client
                .query_one("SELECT count(*) FROM fact_orders", &[])?
                .get(0)
        } else {
            0
        };
        Ok((dims, facts))
    }
}
