//! Product model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use shared::models::{ProductKind, ProductRating, Variation};

use super::serde_helpers;

/// Product entity, variations and ratings embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base price; variations carry their own
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    /// Category name within the kind-scoped registry list
    pub category: String,
    pub kind: ProductKind,
    /// Absent or null means active (legacy documents)
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub ratings: Vec<ProductRating>,
    /// Derived: mean of `ratings[].rating`, 0.0 when empty. Recomputed on
    /// every ratings write, never edited directly.
    #[serde(default)]
    pub average_rating: f64,
}

fn default_true() -> bool {
    true
}

/// Prices never go below zero, base and variation alike.
fn non_negative(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        return Err(validator::ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = non_negative))]
    pub price: Decimal,
    pub image: Option<String>,
    #[validate(length(min = 1))]
    pub category: String,
    pub kind: ProductKind,
    #[serde(default)]
    #[validate(nested)]
    pub variations: Vec<VariationCreate>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = non_negative))]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub kind: Option<ProductKind>,
    pub is_active: Option<bool>,
}

/// New variation payload; the server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VariationCreate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = non_negative))]
    pub price: Decimal,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VariationCreate {
    pub fn into_variation(self) -> Variation {
        Variation {
            id: shared::util::snowflake_id(),
            name: self.name,
            price: self.price,
            tags: self.tags,
        }
    }
}

/// New product rating payload; id and date are assigned server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductRatingCreate {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
    #[validate(length(min = 1))]
    pub user_name: String,
}

impl ProductRatingCreate {
    pub fn into_rating(self) -> ProductRating {
        ProductRating {
            id: shared::util::snowflake_id(),
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
            date: chrono::Utc::now(),
            user_name: self.user_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(price: i64, variation_price: i64) -> ProductCreate {
        ProductCreate {
            name: "Paella".into(),
            description: None,
            price: Decimal::from(price),
            image: None,
            category: "Arroces".into(),
            kind: ProductKind::Comidas,
            variations: vec![VariationCreate {
                name: "Media".into(),
                price: Decimal::from(variation_price),
                tags: Vec::new(),
            }],
        }
    }

    #[test]
    fn negative_base_price_fails_validation() {
        assert!(create(-5, 2).validate().is_err());
        assert!(create(18, 10).validate().is_ok());
    }

    #[test]
    fn negative_variation_price_fails_validation() {
        assert!(create(18, -2).validate().is_err());
    }

    #[test]
    fn negative_price_update_fails_validation() {
        let update = ProductUpdate {
            name: None,
            description: None,
            price: Some(Decimal::from(-1)),
            image: None,
            category: None,
            kind: None,
            is_active: None,
        };
        assert!(update.validate().is_err());
    }
}
