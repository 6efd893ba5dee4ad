//! Generic statement executor.
//!
//! Classifies a statement by its leading keyword, executes it, and
//! either renders the result set as a bordered table or prints the
//! affected-row count. Column names and types come from the server at
//! runtime, so the runner works for any statement the catalog throws
//! at it.

use crate::console;
use crate::error::Result;
use crate::render::RenderedTable;
use tokio_postgres::{GenericClient, Row};

/// Statement kind, decided by the first non-whitespace keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Update,
    Delete,
    Other,
}

/// Classify a statement, case-insensitively.
pub fn classify(sql: &str) -> StatementKind {
    let keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();

    match keyword.as_str() {
        "SELECT" => StatementKind::Select,
        "UPDATE" => StatementKind::Update,
        "DELETE" => StatementKind::Delete,
        _ => StatementKind::Other,
    }
}

/// Execute one statement and print its outcome.
///
/// SELECT statements render as a table followed by the row count;
/// mutations print the affected-row count with a kind-specific label.
pub async fn execute<C: GenericClient>(client: &C, sql: &str) -> Result<()> {
    match classify(sql) {
        StatementKind::Select => {
            let table = fetch_table(client, sql).await?;
            table.print();
            console::success(&format!("Найдено строк: {}", table.row_count()));
        }
        kind => {
            let affected = client.execute(sql, &[]).await?;
            let message = match kind {
                StatementKind::Update => format!("Обновлено строк: {}", affected),
                StatementKind::Delete => format!("Удалено строк: {}", affected),
                _ => format!("Выполнено. Затронуто строк: {}", affected),
            };
            console::success(&message);
        }
    }
    Ok(())
}

/// Materialize a SELECT into a `RenderedTable`.
///
/// Headers preserve the declared column aliases verbatim, including
/// quoted non-ASCII ones.
pub async fn fetch_table<C: GenericClient>(client: &C, sql: &str) -> Result<RenderedTable> {
    let rows = client.query(sql, &[]).await?;

    let headers: Vec<String> = match rows.first() {
        Some(row) => row
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect(),
        None => {
            // No rows: take column metadata from a prepared statement.
            let statement = client.prepare(sql).await?;
            statement
                .columns()
                .iter()
                .map(|col| col.name().to_string())
                .collect()
        }
    };

    let matrix = rows
        .iter()
        .map(|row| {
            (0..row.columns().len())
                .map(|idx| render_value(row, idx))
                .collect()
        })
        .collect();

    Ok(RenderedTable::new(headers, matrix))
}

/// Render one cell to its textual form, dispatching on the column type.
///
/// Timestamps are cut to 19 characters (`YYYY-MM-DD HH:MM:SS`), SQL
/// NULL renders as the literal `NULL`, everything else uses its
/// default textual form.
fn render_value(row: &Row, idx: usize) -> String {
    let type_name = row.columns()[idx].type_().name();

    let rendered = match type_name {
        "bool" => row
            .try_get::<_, Option<bool>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "int2" => row
            .try_get::<_, Option<i16>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "int8" => row
            .try_get::<_, Option<i64>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "float8" => row
            .try_get::<_, Option<f64>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "numeric" => row
            .try_get::<_, Option<rust_decimal::Decimal>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        "timestamp" => row
            .try_get::<_, Option<chrono::NaiveDateTime>>(idx)
            .ok()
            .flatten()
            .map(|v| truncate_chars(&v.to_string(), 19)),
        "timestamptz" => row
            .try_get::<_, Option<chrono::DateTime<chrono::FixedOffset>>>(idx)
            .ok()
            .flatten()
            .map(|v| truncate_chars(&v.to_string(), 19)),
        "date" => row
            .try_get::<_, Option<chrono::NaiveDate>>(idx)
            .ok()
            .flatten()
            .map(|v| v.to_string()),
        _ => row.try_get::<_, Option<String>>(idx).ok().flatten(),
    };

    rendered.unwrap_or_else(|| "NULL".to_string())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("select 1"), StatementKind::Select);
        assert_eq!(classify("SELECT 1"), StatementKind::Select);
        assert_eq!(classify("  Select 1"), StatementKind::Select);
        assert_eq!(classify("\n\tSeLeCt 1"), StatementKind::Select);
    }

    #[test]
    fn mutations_classify_by_leading_keyword() {
        assert_eq!(
            classify("update products set price = 1"),
            StatementKind::Update
        );
        assert_eq!(classify("DELETE FROM orders"), StatementKind::Delete);
        assert_eq!(
            classify("INSERT INTO orders VALUES (1)"),
            StatementKind::Other
        );
        assert_eq!(classify(""), StatementKind::Other);
    }

    #[test]
    fn timestamps_truncate_to_nineteen_characters() {
        assert_eq!(
            truncate_chars("2025-09-25 10:15:00.123456", 19),
            "2025-09-25 10:15:00"
        );
        assert_eq!(truncate_chars("2025-09-25 10:15:00", 19), "2025-09-25 10:15:00");
    }
}
