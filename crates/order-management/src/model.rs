//! Typed entities of the order-management schema.
//!
//! The schema itself is defined by the migration scripts; these structs
//! mirror it for the scenario's typed inserts and snapshots.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// A product in the shop inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: String,
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

/// An order referencing a product, a customer and a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i32,
    pub product_id: i32,
    pub customer_id: i32,
    pub order_date: NaiveDateTime,
    pub quantity: i32,
    pub status_id: i32,
}

/// Row counts of the three mutable tables, used for state snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub products: i64,
    pub customers: i64,
    pub orders: i64,
}
