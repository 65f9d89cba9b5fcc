//! Synthetic order generator.
//!
//! Produces a bounded batch of fake order rows. Attribute draws (date,
//! product, region, price, quantity) come from an explicitly seeded RNG so
//! equal `(n, seed, today)` inputs reproduce the same batch; order ids come
//! from an entropy-seeded RNG with a wide range so collisions stay rare but
//! possible, and are removed by first-occurrence de-duplication.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Fixed product catalog (closed set).
pub const PRODUCTS: [&str; 5] = ["키보드", "마우스", "모니터", "노트북 스탠드", "USB 허브"];

/// Fixed region catalog (closed set).
pub const REGIONS: [&str; 6] = ["서울", "부산", "대구", "광주", "대전", "인천"];

/// Default seed for reproducible local runs.
pub const DEFAULT_SEED: u64 = 42;

/// Number of trailing calendar days orders are drawn from, ending today.
pub const ORDER_DATE_WINDOW_DAYS: i64 = 30;

/// One raw synthetic order, as it appears in the interchange file.
/// `order_date` stays a string here; parsing is the transformer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOrder {
    pub order_id: String,
    pub order_date: String,
    pub product: String,
    pub region: String,
    pub unit_price: i32,
    pub quantity: i32,
}

/// Seeded order generator.
///
/// Holds its RNG state explicitly so repeated calls within one process
/// never share advanced global state.
pub struct Generator {
    attr_rng: ChaCha8Rng,
    id_rng: StdRng,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self {
            attr_rng: ChaCha8Rng::seed_from_u64(seed),
            id_rng: StdRng::from_entropy(),
        }
    }

    /// Generate `n` raw orders dated within the trailing 30-day window
    /// ending at `today`, then drop duplicate order ids (first occurrence
    /// wins). The returned batch may therefore hold fewer than `n` rows.
    pub fn generate(&mut self, n: usize, today: NaiveDate) -> Vec<RawOrder> {
        dedup_by_order_id(self.draw(n, today))
    }

    /// Draw `n` rows without de-duplication. Attribute draws are a pure
    /// function of the seed and `today`; only order ids vary between runs.
    pub fn draw(&mut self, n: usize, today: NaiveDate) -> Vec<RawOrder> {
        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            let offset = self.attr_rng.gen_range(0..ORDER_DATE_WINDOW_DAYS);
            let date = today - Duration::days(offset);
            let product = PRODUCTS[self.attr_rng.gen_range(0..PRODUCTS.len())];
            let region = REGIONS[self.attr_rng.gen_range(0..REGIONS.len())];
            let unit_price = self.attr_rng.gen_range(10_000..=300_000);
            let quantity = self.attr_rng.gen_range(1..=5);
            let order_id = format!("O{}", self.id_rng.gen_range(100_000..=999_999));

            rows.push(RawOrder {
                order_id,
                order_date: date.format("%Y-%m-%d").to_string(),
                product: product.to_string(),
                region: region.to_string(),
                unit_price,
                quantity,
            });
        }
        rows
    }
}

/// Drop rows whose `order_id` was already seen, keeping the first
/// occurrence. Order of surviving rows is preserved.
pub fn dedup_by_order_id(rows: Vec<RawOrder>) -> Vec<RawOrder> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|r| seen.insert(r.order_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_generate_respects_requested_count() {
        let mut gen = Generator::new(DEFAULT_SEED);
        let rows = gen.generate(100, today());
        assert!(!rows.is_empty());
        assert!(rows.len() <= 100);
    }

    #[test]
    fn test_generate_draws_within_catalogs_and_ranges() {
        let mut gen = Generator::new(DEFAULT_SEED);
        for row in gen.generate(200, today()) {
            assert!(PRODUCTS.contains(&row.product.as_str()));
            assert!(REGIONS.contains(&row.region.as_str()));
            assert!((10_000..=300_000).contains(&row.unit_price));
            assert!((1..=5).contains(&row.quantity));
            assert!(row.order_id.starts_with('O'));
            assert_eq!(row.order_id.len(), 7);
        }
    }

    #[test]
    fn test_generate_dates_within_trailing_window() {
        let mut gen = Generator::new(DEFAULT_SEED);
        let earliest = today() - Duration::days(ORDER_DATE_WINDOW_DAYS - 1);
        for row in gen.generate(200, today()) {
            let date = NaiveDate::parse_from_str(&row.order_date, "%Y-%m-%d").unwrap();
            assert!(date >= earliest && date <= today());
        }
    }

    #[test]
    fn test_draw_is_deterministic_except_order_ids() {
        let a = Generator::new(7).draw(50, today());
        let b = Generator::new(7).draw(50, today());
        assert_eq!(a.len(), b.len());

        // Order ids come from an entropy source, so compare everything else.
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.order_date, y.order_date);
            assert_eq!(x.product, y.product);
            assert_eq!(x.region, y.region);
            assert_eq!(x.unit_price, y.unit_price);
            assert_eq!(x.quantity, y.quantity);
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mk = |id: &str, price: i32| RawOrder {
            order_id: id.to_string(),
            order_date: "2024-06-01".to_string(),
            product: PRODUCTS[0].to_string(),
            region: REGIONS[0].to_string(),
            unit_price: price,
            quantity: 1,
        };
        let rows = vec![mk("O111111", 100), mk("O222222", 200), mk("O111111", 300)];
        let deduped = dedup_by_order_id(rows);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].unit_price, 100);
        assert_eq!(deduped[1].order_id, "O222222");
    }
}
