use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::Queryable;
use serde::{Deserialize, Serialize};

use crate::models::Order;

// One row of the order_items ⨝ products projection
#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BillLine{
    pub name: String,
    pub variant: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal
}

/// Read-only view of an order priced with the current product prices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Bill{
    pub order_id: i32,
    pub table_number: i32,
    pub created_at: DateTime<Utc>,
    pub total_price: BigDecimal,
    pub items: Vec<BillLine>
}

impl Bill {
    pub fn assemble(order: &Order, items: Vec<BillLine>) -> Self {
        Bill{
            order_id: order.id,
            table_number: order.table_number,
            created_at: order.created_at,
            total_price: total_price(&items),
            items
        }
    }
}

pub fn total_price(lines: &[BillLine]) -> BigDecimal {
    lines.iter().fold(BigDecimal::from(0), |total, line| {
        total + &line.price * BigDecimal::from(line.quantity)
    })
}
