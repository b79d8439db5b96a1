use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use carecloud_mock::client::{TokenClient, TokenOutput};
use carecloud_mock::config::{self, Config};
use carecloud_mock::store::{seed, Store};
use carecloud_mock::{api, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;
    // Dropping the guard flushes the file writer, so it lives until exit.
    let _log_guard = init_tracing(&cfg);
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { host, port }) => run_server(cfg, host, port).await,
        Some(cli::Commands::Token {
            url,
            grant_type,
            refresh_token,
            export,
            json,
            quiet,
        }) => {
            let token = TokenClient::new(url).fetch(&grant_type, &refresh_token).await?;
            println!(
                "{}",
                TokenOutput::from_flags(json, export, quiet).render(&token.access_token)?
            );
            Ok(())
        }
        Some(cli::Commands::Seed) => {
            let db = open_store(&cfg).await?;
            if seed::create_seed_data(&db).await? {
                println!("Seed data loaded into {}", cfg.database_url);
            } else {
                println!("Database already seeded.");
            }
            Ok(())
        }
        Some(cli::Commands::Reset) => {
            let db = open_store(&cfg).await?;
            db.purge().await?;
            seed::create_seed_data(&db).await?;
            println!("Database reset successfully.");
            Ok(())
        }
        None => run_server(cfg, None, None).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

/// Console logs go to stderr so `token --quiet` output stays pipeable.
/// A plain-text copy goes to the configured log file.
fn init_tracing(cfg: &Config) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "carecloud_mock=debug,tower_http=debug".into()),
    );
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let appender = cfg.log_file_location().map(|(dir, name)| {
        RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(name)
            .build(dir)
    });
    let (file_layer, guard) = match appender {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();
    guard
}

async fn open_store(cfg: &Config) -> anyhow::Result<Store> {
    let db = Store::connect(&cfg.database_url)
        .await
        .with_context(|| format!("failed to open {}", cfg.database_url))?;
    db.migrate().await?;
    Ok(db)
}

async fn run_server(mut cfg: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        cfg.host = host;
    }
    if let Some(port) = port {
        cfg.port = port;
    }

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.host, cfg.port))?;

    let state = AppState::initialize(cfg).await?;
    tracing::info!(
        title = %state.config.api_title,
        version = %state.config.api_version,
        "application startup completed"
    );

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Fake CareCloud API listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Fake CareCloud API shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
