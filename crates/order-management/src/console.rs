//! Console print helpers shared by the scenario and catalog phases.
//!
//! The demo output is deliberately human-oriented: fixed Russian text,
//! emoji markers and box-drawing characters. Diagnostics for operators
//! go through `tracing` instead.

/// Print a phase banner framed by `=` lines.
pub fn header(text: &str) {
    println!("\n{}", "=".repeat(80));
    println!("✨ {}", text);
    println!("{}", "=".repeat(80));
}

/// Print a numbered catalog-entry banner framed by `─` lines.
pub fn query_header(number: usize, description: &str) {
    println!("\n{}", "─".repeat(80));
    println!("📌 ЗАПРОС #{}: {}", number, description);
    println!("{}", "─".repeat(80));
}

/// Print a plain separator line.
pub fn separator() {
    println!("{}", "─".repeat(80));
}

/// Print a success line.
pub fn success(text: &str) {
    println!("✅ {}", text);
}

/// Print an informational line.
pub fn info(text: &str) {
    println!("ℹ️ {}", text);
}

/// Print an error line.
pub fn error(text: &str) {
    println!("❌ {}", text);
}
