pub mod bill;
pub mod order_request;

pub use bill::{total_price, Bill, BillLine};
pub use order_request::{CreateOrderRequest, OrderLine};
