//! The fixed catalog of ten labeled statements, executed after the
//! CRUD scenario on an independent session.
//!
//! Entries 1-5 are reads, 6-8 updates, 9-10 deletes. Mutation entries
//! are bracketed by before/after snapshots of the region they touch.
//! Each entry is isolated: a failing statement is reported with its
//! number and the loop moves on.

use crate::config::DbConfig;
use crate::console;
use crate::db::Session;
use crate::error::{HarnessError, Result};
use crate::repo;
use crate::runner::{self, StatementKind};
use std::path::Path;
use std::time::Duration;
use tokio_postgres::GenericClient;
use tracing::{info, warn};

/// Pause between catalog entries, purely for output readability.
const ENTRY_PAUSE: Duration = Duration::from_millis(300);

/// A numbered, described SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledQuery {
    pub number: usize,
    pub description: String,
    pub sql: String,
}

impl LabeledQuery {
    fn new(number: usize, description: &str, sql: &str) -> Self {
        Self {
            number,
            description: description.to_string(),
            sql: sql.to_string(),
        }
    }
}

/// The canonical ten-statement catalog. The SQL texts are part of the
/// external contract and must not drift.
pub fn builtin() -> Vec<LabeledQuery> {
    vec![
        LabeledQuery::new(
            1,
            "Список всех заказов за последние 7 дней",
            "SELECT o.id AS \"Номер заказа\", o.order_date AS \"Дата заказа\", \
             c.first_name AS \"Имя\", c.last_name AS \"Фамилия\", \
             p.description AS \"Товар\", o.quantity AS \"Количество\", \
             os.status_name AS \"Статус\" \
             FROM orders o \
             JOIN customer c ON o.customer_id = c.id \
             JOIN products p ON o.product_id = p.id \
             JOIN order_status os ON o.status_id = os.id \
             WHERE o.order_date >= CURRENT_DATE - INTERVAL '7 days' \
             ORDER BY o.order_date DESC",
        ),
        LabeledQuery::new(
            2,
            "Топ-3 самых популярных товаров",
            "SELECT p.id, p.description, COUNT(o.id) AS order_count \
             FROM products p JOIN orders o ON p.id = o.product_id \
             GROUP BY p.id, p.description ORDER BY order_count DESC LIMIT 3",
        ),
        LabeledQuery::new(
            3,
            "Покупатели с общей суммой заказов",
            "SELECT c.id, c.first_name, c.last_name, \
             SUM(p.price * o.quantity) AS total_spent \
             FROM customer c JOIN orders o ON c.id = o.customer_id \
             JOIN products p ON o.product_id = p.id \
             GROUP BY c.id, c.first_name, c.last_name \
             ORDER BY total_spent DESC",
        ),
        LabeledQuery::new(
            4,
            "Товары, которых осталось меньше 10 на складе",
            "SELECT p.description, p.quantity, p.category \
             FROM products p WHERE p.quantity < 10 \
             ORDER BY p.quantity ASC",
        ),
        LabeledQuery::new(
            5,
            "Ежемесячная статистика заказов",
            "SELECT EXTRACT(YEAR FROM order_date) AS year, \
             EXTRACT(MONTH FROM order_date) AS month, \
             COUNT(*) AS order_count, \
             SUM(p.price * o.quantity) AS total_amount \
             FROM orders o JOIN products p ON o.product_id = p.id \
             GROUP BY year, month ORDER BY year, month",
        ),
        LabeledQuery::new(
            6,
            "Обновление количества товара на складе",
            "UPDATE products SET quantity = quantity - 1 WHERE id = 1",
        ),
        LabeledQuery::new(
            7,
            "Обновление статуса заказа",
            "UPDATE orders SET status_id = \
             (SELECT id FROM order_status WHERE status_name = 'Завершен') \
             WHERE id = 1",
        ),
        LabeledQuery::new(
            8,
            "Обновление цены товара",
            "UPDATE products SET price = price * 1.1 WHERE category = 'Электроника'",
        ),
        LabeledQuery::new(
            9,
            "Удаление конкретных заказов с ID 16 и 17",
            "DELETE FROM orders WHERE id IN (16, 17)",
        ),
        LabeledQuery::new(
            10,
            "Удаление старых отмененных заказов",
            "DELETE FROM orders WHERE status_id = \
             (SELECT id FROM order_status WHERE status_name = 'Отменен') \
             AND order_date < '2025-09-20'",
        ),
    ]
}

/// Split a SQL script into statements: blank lines and `--` comment
/// lines are dropped, the rest accumulates until a `;`.
pub fn parse_script(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);

        while let Some(pos) = current.find(';') {
            let statement = current[..pos].trim().to_string();
            if !statement.is_empty() {
                statements.push(statement);
            }
            current = current[pos + 1..].trim_start().to_string();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }
    statements
}

/// Load the catalog from an external script, if one is present.
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Option<Vec<LabeledQuery>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)?;
    let statements = parse_script(&text);
    if statements.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        statements
            .into_iter()
            .enumerate()
            .map(|(i, sql)| LabeledQuery {
                number: i + 1,
                description: format!("Запрос #{} из test-queries.sql", i + 1),
                sql,
            })
            .collect(),
    ))
}

/// Run the whole catalog on its own session.
///
/// Uses `test-queries.sql` from the working directory when present,
/// otherwise the builtin catalog.
pub async fn run(config: &DbConfig) -> Result<()> {
    console::header("📊 ВЫПОЛНЕНИЕ ТЕСТОВЫХ SQL-ЗАПРОСОВ");

    let session = Session::connect(config).await?;

    let queries = match load_script("test-queries.sql") {
        Ok(Some(queries)) => {
            info!("catalog loaded from test-queries.sql");
            queries
        }
        Ok(None) => builtin(),
        Err(e) => {
            warn!("could not load test-queries.sql, using builtin catalog: {}", e);
            builtin()
        }
    };
    console::success(&format!("Загружено запросов: {}", queries.len()));

    let mut executed = 0;
    for query in &queries {
        console::query_header(query.number, &query.description);
        println!("SQL: {}", query.sql);
        console::separator();

        match run_entry(&*session, query).await {
            Ok(()) => executed += 1,
            Err(e) => console::error(&format!(
                "Ошибка запроса #{}: {}",
                query.number,
                statement_message(&e)
            )),
        }

        tokio::time::sleep(ENTRY_PAUSE).await;
    }

    console::success(&format!(
        "Выполнено запросов: {} из {}",
        executed,
        queries.len()
    ));
    Ok(())
}

fn statement_message(e: &HarnessError) -> String {
    match e {
        HarnessError::Statement { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Execute one entry, with before/after snapshots around mutations.
async fn run_entry(client: &impl GenericClient, query: &LabeledQuery) -> Result<()> {
    let action = match runner::classify(&query.sql) {
        StatementKind::Update => Some("ОБНОВЛЕНИЯ"),
        StatementKind::Delete => Some("УДАЛЕНИЯ"),
        _ => None,
    };

    let wrap = |e: HarnessError| HarnessError::statement(query.number, e.to_string());

    if let Some(action) = action {
        println!("📊 СОСТОЯНИЕ ДО {}:", action);
        snapshot(client, query.number).await.map_err(wrap)?;
    }

    runner::execute(client, &query.sql).await.map_err(wrap)?;

    if let Some(action) = action {
        println!("📊 СОСТОЯНИЕ ПОСЛЕ {}:", action);
        snapshot(client, query.number).await.map_err(wrap)?;
    }
    Ok(())
}

/// The bounded state snapshot for a mutation entry, keyed by number.
async fn snapshot(client: &impl GenericClient, number: usize) -> Result<()> {
    match number {
        6 => show_product_state(client, 1).await,
        7 => show_order_state(client, 1).await,
        8 => show_electronics_prices(client).await,
        9 => show_orders_by_ids(client, &[16, 17]).await,
        10 => show_old_cancelled_orders(client).await,
        _ => Ok(()),
    }
}

async fn show_product_state(client: &impl GenericClient, product_id: i32) -> Result<()> {
    if let Some(product) = repo::products::find(client, product_id).await? {
        println!(
            "📦 Товар ID {}: {} | Цена: {} | Количество: {}",
            product_id, product.description, product.price, product.quantity
        );
    }
    Ok(())
}

async fn show_order_state(client: &impl GenericClient, order_id: i32) -> Result<()> {
    let row = client
        .query_opt(
            "SELECT o.id, os.status_name, o.order_date, c.first_name, c.last_name, p.description \
             FROM orders o \
             JOIN order_status os ON o.status_id = os.id \
             JOIN customer c ON o.customer_id = c.id \
             JOIN products p ON o.product_id = p.id \
             WHERE o.id = $1",
            &[&order_id],
        )
        .await?;

    if let Some(row) = row {
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        let description: String = row.get("description");
        let status_name: String = row.get("status_name");
        let order_date: chrono::NaiveDateTime = row.get("order_date");

        println!(
            "📋 Заказ ID {}: {} {} | {} | Статус: {} | Дата: {}",
            order_id,
            first_name,
            last_name,
            description,
            status_name,
            order_date
                .to_string()
                .chars()
                .take(19)
                .collect::<String>()
        );
    }
    Ok(())
}

async fn show_electronics_prices(client: &impl GenericClient) -> Result<()> {
    let rows = client
        .query(
            "SELECT description, price FROM products \
             WHERE category = 'Электроника' ORDER BY id",
            &[],
        )
        .await?;

    println!("💰 Цены товаров категории 'Электроника':");
    for row in &rows {
        let description: String = row.get("description");
        let price: rust_decimal::Decimal = row.get("price");
        println!("   {} | Цена: {}", description, price);
    }
    Ok(())
}

async fn show_orders_by_ids(client: &impl GenericClient, ids: &[i32]) -> Result<()> {
    let rows = client
        .query(
            "SELECT o.id, o.quantity, os.status_name, c.first_name, c.last_name, p.description \
             FROM orders o \
             JOIN order_status os ON o.status_id = os.id \
             JOIN customer c ON o.customer_id = c.id \
             JOIN products p ON o.product_id = p.id \
             WHERE o.id = ANY($1) \
             ORDER BY o.id",
            &[&ids],
        )
        .await?;

    println!("📋 Заказов с ID 16 и 17: {}", rows.len());
    for row in &rows {
        let id: i32 = row.get("id");
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        let description: String = row.get("description");
        let status_name: String = row.get("status_name");

        println!(
            "   Заказ ID {}: {} {} | {} | Статус: {}",
            id, first_name, last_name, description, status_name
        );
    }
    Ok(())
}

async fn show_old_cancelled_orders(client: &impl GenericClient) -> Result<()> {
    let row = client
        .query_one(
            "SELECT COUNT(*) AS count FROM orders \
             WHERE status_id = (SELECT id FROM order_status WHERE status_name = 'Отменен') \
             AND order_date < '2025-09-20'",
            &[],
        )
        .await?;
    let count: i64 = row.get("count");
    println!("📋 Отмененных заказов до 2025-09-20: {}", count);

    let rows = client
        .query(
            "SELECT o.id, o.order_date, c.first_name, c.last_name, p.description \
             FROM orders o \
             JOIN customer c ON o.customer_id = c.id \
             JOIN products p ON o.product_id = p.id \
             WHERE o.status_id = (SELECT id FROM order_status WHERE status_name = 'Отменен') \
             AND o.order_date < '2025-09-20' \
             ORDER BY o.id",
            &[],
        )
        .await?;

    for row in &rows {
        let id: i32 = row.get("id");
        let order_date: chrono::NaiveDateTime = row.get("order_date");
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        let description: String = row.get("description");

        println!(
            "   Заказ ID {}: {} {} | {} | Дата: {}",
            id,
            first_name,
            last_name,
            description,
            order_date
                .to_string()
                .chars()
                .take(19)
                .collect::<String>()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_dense_and_ordered() {
        let queries = builtin();
        assert_eq!(queries.len(), 10);
        for (i, query) in queries.iter().enumerate() {
            assert_eq!(query.number, i + 1);
            assert!(!query.description.is_empty());
            assert!(!query.sql.is_empty());
        }
    }

    #[test]
    fn builtin_catalog_splits_five_three_two() {
        let queries = builtin();
        let kinds: Vec<StatementKind> =
            queries.iter().map(|q| runner::classify(&q.sql)).collect();

        assert!(kinds[..5].iter().all(|k| *k == StatementKind::Select));
        assert!(kinds[5..8].iter().all(|k| *k == StatementKind::Update));
        assert!(kinds[8..].iter().all(|k| *k == StatementKind::Delete));
    }

    #[test]
    fn contract_sql_texts_are_preserved() {
        let queries = builtin();
        assert!(queries[0].sql.contains("AS \"Номер заказа\""));
        assert!(queries[0]
            .sql
            .contains("CURRENT_DATE - INTERVAL '7 days'"));
        assert_eq!(queries[8].sql, "DELETE FROM orders WHERE id IN (16, 17)");
        assert!(queries[9].sql.contains("status_name = 'Отменен'"));
        assert!(queries[9].sql.contains("order_date < '2025-09-20'"));
    }

    #[test]
    fn script_parsing_strips_comments_and_splits_on_semicolons() {
        let text = "\
-- первый запрос
SELECT *
FROM products;

-- второй запрос
UPDATE products
SET quantity = 0
WHERE id = 1;
";
        let statements = parse_script(text);
        assert_eq!(
            statements,
            vec![
                "SELECT * FROM products".to_string(),
                "UPDATE products SET quantity = 0 WHERE id = 1".to_string(),
            ]
        );
    }

    #[test]
    fn script_parsing_keeps_an_unterminated_tail() {
        let statements = parse_script("SELECT 1;\nSELECT 2");
        assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn missing_script_file_means_builtin_catalog() {
        assert!(load_script("/nonexistent/test-queries.sql")
            .unwrap()
            .is_none());
    }
}
