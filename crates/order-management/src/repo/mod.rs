//! Typed CRUD helpers over the order-management tables.
//!
//! All functions are generic over `GenericClient` so they run equally
//! inside the scenario transaction and on plain catalog sessions.
//!
//! Scenario IDs are allocated as `COALESCE(MAX(id), 0) + 1` inside the
//! caller's transaction, then inserted explicitly. This is intentional:
//! a rollback fully erases the allocation, which sequences would not.

use crate::error::Result;
use crate::model::{Customer, Order, Product, TableCounts};
use tokio_postgres::GenericClient;

/// Current row counts of products, customer and orders.
pub async fn counts<C: GenericClient>(client: &C) -> Result<TableCounts> {
    let row = client
        .query_one(
            "SELECT \
             (SELECT COUNT(*) FROM products) AS products_count, \
             (SELECT COUNT(*) FROM customer) AS customers_count, \
             (SELECT COUNT(*) FROM orders) AS orders_count",
            &[],
        )
        .await?;

    Ok(TableCounts {
        products: row.get("products_count"),
        customers: row.get("customers_count"),
        orders: row.get("orders_count"),
    })
}

pub mod products {
    use super::*;

    /// Next free product id within the current transaction.
    pub async fn next_id<C: GenericClient>(client: &C) -> Result<i32> {
        let row = client
            .query_one(
                "SELECT COALESCE(MAX(id), 0) + 1 AS next_id FROM products",
                &[],
            )
            .await?;
        Ok(row.get("next_id"))
    }

    pub async fn insert<C: GenericClient>(client: &C, product: &Product) -> Result<()> {
        client
            .execute(
                "INSERT INTO products (id, description, price, quantity, category) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &product.id,
                    &product.description,
                    &product.price,
                    &product.quantity,
                    &product.category,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn find<C: GenericClient>(client: &C, id: i32) -> Result<Option<Product>> {
        let row = client
            .query_opt(
                "SELECT id, description, price, quantity, category FROM products WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.map(|row| Product {
            id: row.get("id"),
            description: row.get("description"),
            price: row.get("price"),
            quantity: row.get("quantity"),
            category: row.get("category"),
        }))
    }

    /// First `limit` products by id, for the initial-state printout.
    pub async fn first<C: GenericClient>(client: &C, limit: i64) -> Result<Vec<Product>> {
        let rows = client
            .query(
                "SELECT id, description, price, quantity, category \
                 FROM products ORDER BY id LIMIT $1",
                &[&limit],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Product {
                id: row.get("id"),
                description: row.get("description"),
                price: row.get("price"),
                quantity: row.get("quantity"),
                category: row.get("category"),
            })
            .collect())
    }

    /// Raise prices of expensive electronics by 15 percent.
    pub async fn raise_electronics_prices<C: GenericClient>(client: &C) -> Result<u64> {
        let updated = client
            .execute(
                "UPDATE products SET price = price * 1.15 \
                 WHERE category = 'Электроника' AND id > 10",
                &[],
            )
            .await?;
        Ok(updated)
    }

    /// Decrement the stock quantity of one product by one.
    pub async fn decrement_quantity<C: GenericClient>(client: &C, id: i32) -> Result<u64> {
        let updated = client
            .execute(
                "UPDATE products SET quantity = quantity - 1 WHERE id = $1",
                &[&id],
            )
            .await?;
        Ok(updated)
    }

    pub async fn delete<C: GenericClient>(client: &C, id: i32) -> Result<u64> {
        let deleted = client
            .execute("DELETE FROM products WHERE id = $1", &[&id])
            .await?;
        Ok(deleted)
    }
}

pub mod customers {
    use super::*;

    /// Next free customer id within the current transaction.
    pub async fn next_id<C: GenericClient>(client: &C) -> Result<i32> {
        let row = client
            .query_one(
                "SELECT COALESCE(MAX(id), 0) + 1 AS next_id FROM customer",
                &[],
            )
            .await?;
        Ok(row.get("next_id"))
    }

    pub async fn insert<C: GenericClient>(client: &C, customer: &Customer) -> Result<()> {
        client
            .execute(
                "INSERT INTO customer (id, first_name, last_name, phone, email) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &customer.id,
                    &customer.first_name,
                    &customer.last_name,
                    &customer.phone,
                    &customer.email,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn delete<C: GenericClient>(client: &C, id: i32) -> Result<u64> {
        let deleted = client
            .execute("DELETE FROM customer WHERE id = $1", &[&id])
            .await?;
        Ok(deleted)
    }
}

pub mod orders {
    use super::*;

    /// Next free order id within the current transaction.
    pub async fn next_id<C: GenericClient>(client: &C) -> Result<i32> {
        let row = client
            .query_one(
                "SELECT COALESCE(MAX(id), 0) + 1 AS next_id FROM orders",
                &[],
            )
            .await?;
        Ok(row.get("next_id"))
    }

    pub async fn insert<C: GenericClient>(client: &C, order: &Order) -> Result<()> {
        client
            .execute(
                "INSERT INTO orders (id, product_id, customer_id, order_date, quantity, status_id) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &order.id,
                    &order.product_id,
                    &order.customer_id,
                    &order.order_date,
                    &order.quantity,
                    &order.status_id,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn delete<C: GenericClient>(client: &C, id: i32) -> Result<u64> {
        let deleted = client
            .execute("DELETE FROM orders WHERE id = $1", &[&id])
            .await?;
        Ok(deleted)
    }
}
