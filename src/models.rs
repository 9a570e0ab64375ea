use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::schema::{order_items, orders, products};

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product{
    pub id: i32,
    pub name: String,
    pub category: String,
    pub variant: Option<String>,
    pub price: BigDecimal,
    pub station: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>
}

#[derive(Insertable, Deserialize, Serialize, Validate, Debug, Clone)]
#[diesel(table_name = products)]
#[serde(deny_unknown_fields)]
pub struct NewProduct{
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub category: String,
    #[validate(length(max = 50))]
    pub variant: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: BigDecimal,
    #[validate(length(equal = 1))]
    pub station: String
}

// Updatable product columns. Anything not listed here can't reach an UPDATE.
#[derive(AsChangeset, Deserialize, Serialize, Validate, Debug, Clone, Default)]
#[diesel(table_name = products)]
#[serde(deny_unknown_fields)]
pub struct ProductChanges{
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub category: Option<String>,
    #[validate(length(max = 50))]
    pub variant: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<BigDecimal>,
    #[validate(length(equal = 1))]
    pub station: Option<String>
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order{
    pub id: i32,
    pub table_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>
}

#[derive(Insertable, Deserialize, Serialize, Debug, Clone, Copy)]
#[diesel(table_name = orders)]
pub struct NewOrder{
    pub table_number: i32
}

#[derive(AsChangeset, Deserialize, Serialize, Validate, Debug, Clone, Default)]
#[diesel(table_name = orders)]
#[serde(deny_unknown_fields)]
pub struct OrderChanges{
    #[validate(range(min = 1))]
    pub table_number: Option<i32>
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem{
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>
}

#[derive(Insertable, Deserialize, Serialize, Validate, Debug, Clone, Copy)]
#[diesel(table_name = order_items)]
#[serde(deny_unknown_fields)]
pub struct NewOrderItem{
    #[validate(range(min = 1))]
    pub order_id: i32,
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32
}

// order_id is not updatable: an item never moves between orders.
#[derive(AsChangeset, Deserialize, Serialize, Validate, Debug, Clone, Default)]
#[diesel(table_name = order_items)]
#[serde(deny_unknown_fields)]
pub struct OrderItemChanges{
    #[validate(range(min = 1))]
    pub product_id: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>
}

// An empty changeset has no SET clause and must not reach the database
pub trait Changeset {
    fn is_empty(&self) -> bool;
}

impl Changeset for ProductChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.variant.is_none()
            && self.price.is_none()
            && self.station.is_none()
    }
}

impl Changeset for OrderChanges {
    fn is_empty(&self) -> bool {
        self.table_number.is_none()
    }
}

impl Changeset for OrderItemChanges {
    fn is_empty(&self) -> bool {
        self.product_id.is_none() && self.quantity.is_none()
    }
}

// Prices must fit NUMERIC(10,2): at most 2 decimals and 8 integer digits
pub fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::from(0) {
        return Err(ValidationError::new("negative_price"));
    }

    let (_, scale) = price.normalized().as_bigint_and_exponent();
    if scale > 2 {
        return Err(ValidationError::new("price_precision"));
    }

    if *price >= BigDecimal::from(100_000_000) {
        return Err(ValidationError::new("price_too_large"));
    }

    Ok(())
}
