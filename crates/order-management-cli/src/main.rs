//! order-management CLI - PostgreSQL console demo harness.
//!
//! Runs the three phases in order on a single thread: migration,
//! transactional CRUD scenario, labeled query catalog. The scenario
//! and catalog phases are independent; a scenario failure is reported
//! and the catalog still runs.

use order_management::{catalog, config::DbConfig, console, migrate, scenario, HarnessError, Session};
use std::process::ExitCode;
use tracing::{info, Level};

const PROPERTIES_FILE: &str = "application.properties";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), HarnessError> {
    console::header("🚀 ЗАПУСК ПРИЛОЖЕНИЯ ДЛЯ УПРАВЛЕНИЯ ЗАКАЗАМИ");

    let config = DbConfig::load(PROPERTIES_FILE);
    info!("database url: {}", config.url);

    // Probe the connection up front so a dead database fails fast
    // with the connection exit code instead of a migration error.
    {
        let _probe = Session::connect(&config).await?;
        console::success("Подключение к PostgreSQL установлено");
    }

    migrate::migrate(&config).await?;

    if let Err(e) = scenario::run(&config).await {
        console::error(&format!("Ошибка при выполнении CRUD операций: {}", e));
    }

    if let Err(e) = catalog::run(&config).await {
        console::error(&format!("Ошибка при выполнении тестовых запросов: {}", e));
    }

    console::header("ВЫПОЛНЕНИЕ ПРИЛОЖЕНИЯ ЗАВЕРШЕНО");
    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();
}
