//! Recomputation of derived scalar fields.
//!
//! Averages and tip totals are derived from the embedded ratings arrays and
//! recomputed as pure functions immediately before each write. They are
//! best-effort under concurrency: a racing whole-array writer can make the
//! stored aggregate reflect fewer ratings than stored until the next write.

use rust_decimal::Decimal;

use crate::models::{ProductRating, WaiterRating, WaiterTable};

/// Anything carrying a 1..=5 rating value.
pub trait Rated {
    fn rating_value(&self) -> i32;
}

impl Rated for ProductRating {
    fn rating_value(&self) -> i32 {
        self.rating
    }
}

impl Rated for WaiterRating {
    fn rating_value(&self) -> i32 {
        self.rating
    }
}

/// Arithmetic mean of the rating values. Zero ratings yields 0.0, never NaN.
pub fn average_rating<T: Rated>(ratings: &[T]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(r.rating_value())).sum();
    sum as f64 / ratings.len() as f64
}

/// Running tip total after a new rating lands.
pub fn accumulate_tips(current: Decimal, tip: Decimal) -> Decimal {
    current + tip
}

/// Performance counters derived from closed tables.
pub fn performance(tables: &[WaiterTable]) -> crate::models::WaiterPerformance {
    use crate::models::TableStatus;
    let closed = tables.iter().filter(|t| t.status == TableStatus::Completed);
    let mut perf = crate::models::WaiterPerformance::default();
    for table in closed {
        perf.tables_served += 1;
        perf.total_sales += table.total_amount;
        perf.customers_served += table.customer_count;
    }
    perf
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rating(value: i32) -> ProductRating {
        ProductRating {
            id: crate::util::snowflake_id(),
            user_id: "user:demo".into(),
            rating: value,
            comment: None,
            date: Utc::now(),
            user_name: "Demo".into(),
        }
    }

    #[test]
    fn empty_ratings_average_is_zero() {
        let ratings: Vec<ProductRating> = Vec::new();
        assert_eq!(average_rating(&ratings), 0.0);
    }

    #[test]
    fn average_follows_each_insert() {
        let mut ratings = vec![rating(4)];
        assert_eq!(average_rating(&ratings), 4.0);
        ratings.push(rating(2));
        assert_eq!(average_rating(&ratings), 3.0);
    }

    #[test]
    fn tips_accumulate() {
        let total = accumulate_tips(Decimal::from(100), Decimal::from(25));
        assert_eq!(total, Decimal::from(125));
    }
}
