use actix_web::{App, HttpServer, web};
use clap::Parser;
use sqlx::{Pool, Postgres};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, filter::LevelFilter};
mod api;
use crate::api::{
    health::health_config,
    home::home_config,
    job::{handlers::job_config, JobService},
    validation,
};
mod cli;
mod config;
mod db;
mod greenhouse;
mod shutdown;
use crate::cli::{Cli, Command};
use crate::greenhouse::GreenhouseClient;
use crate::shutdown::ShutdownCoordinator;

/// Plain-text file layer for one level, rotated daily
fn file_layer<S>(log_dir: &str, name: &str, level: LevelFilter) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, name))
        .with_ansi(false)
        .with_filter(level)
}

/// Console output plus daily-rotating per-level files, e.g.
/// logs/info.log.2024-12-22, logs/error.log.2024-12-22
fn init_tracing(log_dir: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // stderr keeps stdout clean for CLI output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer(log_dir, "info.log", LevelFilter::INFO))
        .with(file_layer(log_dir, "warn.log", LevelFilter::WARN))
        .with(file_layer(log_dir, "error.log", LevelFilter::ERROR))
        .with(file_layer(log_dir, "debug.log", LevelFilter::DEBUG))
        .init();
}

async fn serve(
    config: config::Config,
    service: JobService,
    pool: Pool<Postgres>,
) -> std::io::Result<()> {
    let max_payload_size = config.max_payload_size;
    let service = web::Data::new(service);
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_pool.clone())) // probes query the pool directly
            .app_data(service.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config().limit(max_payload_size))
            .app_data(validation::query_config())
            .configure(home_config)
            .configure(health_config)
            .configure(job_config)
    })
    .disable_signals();

    info!("Server starting on http://{}", config.bind_addr);

    let server = server.bind(config.bind_addr.as_str())?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let command = Cli::parse().command.unwrap_or(Command::Serve);

    if command.is_offline() {
        if let Err(e) = cli::run_offline(&command) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    // Missing DATABASE_URL aborts before anything else runs
    let config = config::Config::from_env().map_err(std::io::Error::other)?;

    std::fs::create_dir_all(&config.log_dir)?;
    init_tracing(&config.log_dir);

    info!("Starting job-intel");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Greenhouse API: {}", config.greenhouse_api_base);
    info!("  - Fetch timeout: {:?}", config.fetch_timeout);

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .map_err(std::io::Error::other)?;
    info!("Database connection pool established");

    let client = GreenhouseClient::new(&config.greenhouse_api_base, config.fetch_timeout)
        .map_err(std::io::Error::other)?;
    let service = JobService::new(pool.clone(), client);

    match command {
        Command::Serve => {
            db::migrations::run_migrations(&pool)
                .await
                .map_err(std::io::Error::other)?;
            serve(config, service, pool).await
        }
        Command::Migrate => {
            db::migrations::run_migrations(&pool)
                .await
                .map_err(std::io::Error::other)?;
            pool.close().await;
            Ok(())
        }
        command => {
            let result = cli::run(command, &service).await;
            pool.close().await;
            if let Err(e) = result {
                error!("Command failed: {}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
