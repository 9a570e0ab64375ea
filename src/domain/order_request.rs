use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::NewOrder;

#[derive(Deserialize, Serialize, Validate, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OrderLine{
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32
}

// Body of POST /orders
#[derive(Deserialize, Serialize, Validate, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest{
    #[validate(range(min = 1))]
    pub table_number: i32,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderLine>
}

impl CreateOrderRequest {
    pub fn into_parts(self) -> (NewOrder, Vec<OrderLine>) {
        (NewOrder{ table_number: self.table_number }, self.items)
    }
}
