mod cli;
use cli::{USAGE, parse_cli_mode, run};

use meal_planner::storage::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    setup_logging();

    let args = match parse_cli_mode() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return;
        }
    };

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("meal-planner failed: {:#}", e);
        std::process::exit(1);
    }
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "meal-planner.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("meal-planner started");
}
