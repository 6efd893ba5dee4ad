//! Scripted CRUD scenario.
//!
//! One session, one explicit transaction: insert a product, a customer
//! and an order for them, read the state back, update prices and
//! stock, then delete the three created rows in dependency order
//! (order, customer, product). Any failure rolls the whole transaction
//! back, so the database is left exactly as found.

use crate::config::DbConfig;
use crate::console;
use crate::db::Session;
use crate::error::{HarnessError, Result};
use crate::model::{Customer, Order, Product, TableCounts};
use crate::repo;
use rust_decimal::Decimal;
use tokio_postgres::GenericClient;
use tracing::info;

const NEW_PRODUCT_DESCRIPTION: &str = "Игровая консоль PlayStation 5";
const NEW_PRODUCT_CATEGORY: &str = "Электроника";
const NEW_CUSTOMER_FIRST_NAME: &str = "Александр";
const NEW_CUSTOMER_LAST_NAME: &str = "Новиков";
const NEW_CUSTOMER_PHONE: &str = "+7-999-123-45-67";
const NEW_CUSTOMER_EMAIL: &str = "alex.novikov@mail.ru";

/// Status id of `Новый` in the seed data.
const STATUS_NEW: i32 = 1;

/// Ids allocated by the scenario's CREATE steps.
struct CreatedIds {
    product: i32,
    customer: i32,
    order: i32,
}

/// Run the CRUD scenario on its own session.
///
/// On failure the transaction is rolled back, the cause is printed and
/// a `Scenario` error is returned; the caller decides whether to
/// continue with the catalog phase.
pub async fn run(config: &DbConfig) -> Result<()> {
    let mut session = Session::connect(config).await?;
    let tx = session.transaction().await?;

    console::header("🎯 ДЕМОНСТРАЦИЯ CRUD ОПЕРАЦИЙ");

    match steps(&tx).await {
        Ok(()) => {
            tx.commit().await?;
            console::success("Все CRUD операции выполнены успешно!");
            Ok(())
        }
        Err(e) => {
            match tx.rollback().await {
                Ok(()) => {
                    console::error(&format!("Транзакция откатана из-за ошибки: {}", e));
                }
                Err(rollback_err) => {
                    console::error(&format!(
                        "Ошибка при откате транзакции: {}",
                        rollback_err
                    ));
                }
            }
            Err(HarnessError::Scenario(e.to_string()))
        }
    }
}

/// Steps 0-8; the caller commits (step 9) on success.
async fn steps(tx: &impl GenericClient) -> Result<()> {
    console::header("📊 ИСХОДНОЕ СОСТОЯНИЕ БАЗЫ ДАННЫХ");
    show_initial_state(tx).await?;

    console::header("1. CREATE - ВСТАВКА НОВОГО ТОВАРА И ПОКУПАТЕЛЯ");

    console::info("Добавление нового товара...");
    let product_id = insert_new_product(tx).await?;
    console::success(&format!(
        "Добавлен товар ID: {} - {}",
        product_id, NEW_PRODUCT_DESCRIPTION
    ));

    console::info("Добавление нового покупателя...");
    let customer_id = insert_new_customer(tx).await?;
    console::success(&format!(
        "Добавлен покупатель ID: {} - {} {}",
        customer_id, NEW_CUSTOMER_FIRST_NAME, NEW_CUSTOMER_LAST_NAME
    ));

    console::header("2. CREATE - СОЗДАНИЕ ЗАКАЗА ДЛЯ ПОКУПАТЕЛЯ");
    console::info("Создание заказа для нового покупателя...");
    let order_id = create_new_order(tx, customer_id, product_id).await?;
    console::success(&format!(
        "Создан заказ ID: {} - PlayStation 5 для Александра Новикова",
        order_id
    ));

    let ids = CreatedIds {
        product: product_id,
        customer: customer_id,
        order: order_id,
    };

    console::header("📊 СОСТОЯНИЕ ПОСЛЕ СОЗДАНИЯ ДАННЫХ");
    show_data_after_creation(tx, &ids).await?;

    console::header("3. READ - ЧТЕНИЕ ПОСЛЕДНИХ 5 ЗАКАЗОВ");
    read_last_orders(tx).await?;

    console::header("4. UPDATE - ОБНОВЛЕНИЕ ДАННЫХ");
    console::info("Состояние ДО обновления:");
    show_product_state(tx, 1).await?;

    update_product_price_and_quantity(tx).await?;

    console::info("Состояние ПОСЛЕ обновления:");
    show_product_state(tx, 1).await?;

    console::header("5. DELETE - УДАЛЕНИЕ ТЕСТОВЫХ ЗАПИСЕЙ");
    console::info("Данные ДО удаления:");
    show_test_rows(tx, &ids, false).await?;

    delete_test_data(tx, &ids).await?;

    console::info("Данные ПОСЛЕ удаления:");
    show_test_rows(tx, &ids, true).await?;
    show_final_counts(tx).await?;

    Ok(())
}

/// Step 0: table counts plus the first three products.
async fn show_initial_state(tx: &impl GenericClient) -> Result<()> {
    print_counts(&repo::counts(tx).await?);

    println!("\n📋 Пример товаров:");
    for product in repo::products::first(tx, 3).await? {
        println!(
            "   ID {}: {} | Цена: {} | Кол-во: {}",
            product.id, product.description, product.price, product.quantity
        );
    }
    Ok(())
}

/// Step 1: insert the fixed demo product under `MAX(id) + 1`.
async fn insert_new_product(tx: &impl GenericClient) -> Result<i32> {
    let id = repo::products::next_id(tx).await?;
    let product = Product {
        id,
        description: NEW_PRODUCT_DESCRIPTION.to_string(),
        price: Decimal::new(4_999_999, 2), // 49999.99
        quantity: 5,
        category: NEW_PRODUCT_CATEGORY.to_string(),
    };
    repo::products::insert(tx, &product).await?;
    info!("inserted demo product with id {}", id);
    Ok(id)
}

/// Step 2: insert the fixed demo customer under `MAX(id) + 1`.
async fn insert_new_customer(tx: &impl GenericClient) -> Result<i32> {
    let id = repo::customers::next_id(tx).await?;
    let customer = Customer {
        id,
        first_name: NEW_CUSTOMER_FIRST_NAME.to_string(),
        last_name: NEW_CUSTOMER_LAST_NAME.to_string(),
        phone: NEW_CUSTOMER_PHONE.to_string(),
        email: NEW_CUSTOMER_EMAIL.to_string(),
    };
    repo::customers::insert(tx, &customer).await?;
    info!("inserted demo customer with id {}", id);
    Ok(id)
}

/// Step 3: order the new product for the new customer, status `Новый`.
async fn create_new_order(
    tx: &impl GenericClient,
    customer_id: i32,
    product_id: i32,
) -> Result<i32> {
    let id = repo::orders::next_id(tx).await?;
    let order = Order {
        id,
        product_id,
        customer_id,
        order_date: chrono::Local::now().naive_local(),
        quantity: 1,
        status_id: STATUS_NEW,
    };
    repo::orders::insert(tx, &order).await?;
    info!("inserted demo order with id {}", id);
    Ok(id)
}

/// Step 4: read back the created rows and the updated counts.
async fn show_data_after_creation(tx: &impl GenericClient, ids: &CreatedIds) -> Result<()> {
    let row = tx
        .query_one(
            "SELECT \
             (SELECT description FROM products WHERE id = $1) AS product_name, \
             (SELECT first_name || ' ' || last_name FROM customer WHERE id = $2) AS customer_name, \
             (SELECT COUNT(*) FROM orders WHERE id = $3) AS order_exists",
            &[&ids.product, &ids.customer, &ids.order],
        )
        .await?;

    let product_name: Option<String> = row.get("product_name");
    let customer_name: Option<String> = row.get("customer_name");
    let order_exists: i64 = row.get("order_exists");

    println!(
        "🆕 Созданный товар: {}",
        product_name.as_deref().unwrap_or("NULL")
    );
    println!(
        "🆕 Созданный покупатель: {}",
        customer_name.as_deref().unwrap_or("NULL")
    );
    println!(
        "🆕 Заказ создан: {}",
        if order_exists > 0 { "Да" } else { "Нет" }
    );

    println!("\n📊 ОБНОВЛЕННОЕ СОСТОЯНИЕ:");
    print_counts(&repo::counts(tx).await?);
    Ok(())
}

/// Column content widths of the step-5 table.
const LAST_ORDERS_WIDTHS: [usize; 8] = [3, 19, 10, 11, 28, 10, 8, 12];

/// Step 5: the five most recent orders as a fixed-width bordered table.
async fn read_last_orders(tx: &impl GenericClient) -> Result<()> {
    let rows = tx
        .query(
            "SELECT o.id, o.order_date, c.first_name, c.last_name, \
                    p.description, p.price, o.quantity, os.status_name \
             FROM orders o \
             JOIN customer c ON o.customer_id = c.id \
             JOIN products p ON o.product_id = p.id \
             JOIN order_status os ON o.status_id = os.id \
             ORDER BY o.order_date DESC \
             LIMIT 5",
            &[],
        )
        .await?;

    println!("{}", fixed_border('┌', '┬', '┐'));
    println!(
        "{}",
        fixed_row(&["ID", "Дата заказа", "Имя", "Фамилия", "Товар", "Цена", "Кол-во", "Статус"])
    );
    println!("{}", fixed_border('├', '┼', '┤'));

    for row in &rows {
        let id: i32 = row.get("id");
        let order_date: chrono::NaiveDateTime = row.get("order_date");
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        let description: String = row.get("description");
        let price: Decimal = row.get("price");
        let quantity: i32 = row.get("quantity");
        let status_name: String = row.get("status_name");

        let date = order_date.to_string().chars().take(19).collect::<String>();
        let description = if description.chars().count() > 28 {
            format!("{}...", description.chars().take(25).collect::<String>())
        } else {
            description
        };

        println!(
            "{}",
            fixed_row(&[
                &id.to_string(),
                &date,
                &first_name,
                &last_name,
                &description,
                &price.round_dp(2).to_string(),
                &quantity.to_string(),
                &status_name,
            ])
        );
    }

    println!("{}", fixed_border('└', '┴', '┘'));
    Ok(())
}

fn fixed_border(left: char, middle: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in LAST_ORDERS_WIDTHS.iter().enumerate() {
        line.push_str(&"─".repeat(width + 2));
        line.push(if i < LAST_ORDERS_WIDTHS.len() - 1 {
            middle
        } else {
            right
        });
    }
    line
}

fn fixed_row(cells: &[&str; 8]) -> String {
    let mut line = String::from("│");
    for (cell, width) in cells.iter().zip(LAST_ORDERS_WIDTHS) {
        let padding = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding));
        line.push_str(" │");
    }
    line
}

/// Steps 6-7: the two scripted UPDATEs.
async fn update_product_price_and_quantity(tx: &impl GenericClient) -> Result<()> {
    let updated = repo::products::raise_electronics_prices(tx).await?;
    console::success(&format!(
        "Обновлено цен для {} товаров категории 'Электроника' (+15%)",
        updated
    ));

    let updated = repo::products::decrement_quantity(tx, 1).await?;
    if updated > 0 {
        console::success("Обновлено количество товара ID=1 (уменьшено на 1)");
    } else {
        console::info("Товар ID=1 не найден, пропускаем обновление количества");
    }
    Ok(())
}

/// One-line state of a product, for the before/after snapshots.
async fn show_product_state(tx: &impl GenericClient, product_id: i32) -> Result<()> {
    if let Some(product) = repo::products::find(tx, product_id).await? {
        println!(
            "📊 Товар ID {}: {} | Цена: {} | Количество: {}",
            product_id, product.description, product.price, product.quantity
        );
    }
    Ok(())
}

/// Existence snapshot of the three created rows. `after` switches the
/// wording from "существует Да/Нет" to "Остался/Удален".
async fn show_test_rows(tx: &impl GenericClient, ids: &CreatedIds, after: bool) -> Result<()> {
    let row = tx
        .query_one(
            "SELECT \
             (SELECT COUNT(*) FROM products WHERE id = $1) AS product_exists, \
             (SELECT COUNT(*) FROM customer WHERE id = $2) AS customer_exists, \
             (SELECT COUNT(*) FROM orders WHERE id = $3) AS order_exists",
            &[&ids.product, &ids.customer, &ids.order],
        )
        .await?;

    let product_exists: i64 = row.get("product_exists");
    let customer_exists: i64 = row.get("customer_exists");
    let order_exists: i64 = row.get("order_exists");

    if after {
        let word = |exists: i64| if exists > 0 { "Остался" } else { "Удален" };
        println!("🗑️ Товар после удаления: {}", word(product_exists));
        println!("🗑️ Покупатель после удаления: {}", word(customer_exists));
        println!("🗑️ Заказ после удаления: {}", word(order_exists));
    } else {
        let word = |exists: i64| if exists > 0 { "Да" } else { "Нет" };
        println!("🗑️ Товар для удаления существует: {}", word(product_exists));
        println!(
            "🗑️ Покупатель для удаления существует: {}",
            word(customer_exists)
        );
        println!("🗑️ Заказ для удаления существует: {}", word(order_exists));
    }
    Ok(())
}

/// Step 8: delete the created rows in dependency order, so no order
/// row is ever left referencing a missing product or customer.
async fn delete_test_data(tx: &impl GenericClient, ids: &CreatedIds) -> Result<()> {
    if repo::orders::delete(tx, ids.order).await? > 0 {
        console::success(&format!("Удален тестовый заказ ID: {}", ids.order));
    }
    if repo::customers::delete(tx, ids.customer).await? > 0 {
        console::success(&format!("Удален тестовый покупатель ID: {}", ids.customer));
    }
    if repo::products::delete(tx, ids.product).await? > 0 {
        console::success(&format!("Удален тестовый товар ID: {}", ids.product));
    }
    Ok(())
}

async fn show_final_counts(tx: &impl GenericClient) -> Result<()> {
    println!("\n📊 ФИНАЛЬНОЕ СОСТОЯНИЕ:");
    print_counts(&repo::counts(tx).await?);
    Ok(())
}

fn print_counts(counts: &TableCounts) {
    println!("📦 Товаров: {}", counts.products);
    println!("👥 Покупателей: {}", counts.customers);
    println!("📋 Заказов: {}", counts.orders);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_price_is_exact() {
        assert_eq!(Decimal::new(4_999_999, 2).to_string(), "49999.99");
    }

    #[test]
    fn fixed_table_lines_share_one_width() {
        let top = fixed_border('┌', '┬', '┐');
        let header = fixed_row(&[
            "ID", "Дата заказа", "Имя", "Фамилия", "Товар", "Цена", "Кол-во", "Статус",
        ]);
        let bottom = fixed_border('└', '┴', '┘');

        assert_eq!(top.chars().count(), header.chars().count());
        assert_eq!(top.chars().count(), bottom.chars().count());
    }

    #[test]
    fn fixed_row_truncation_is_handled_before_formatting() {
        // A 28-char description fits without an ellipsis.
        let cell = "a".repeat(28);
        let line = fixed_row(&[&cell, "", "", "", "", "", "", ""]);
        assert!(line.starts_with(&format!("│ {}", cell)));
    }
}
