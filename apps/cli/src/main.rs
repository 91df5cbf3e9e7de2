mod args;
mod config;
mod dirs;

use std::io;
use std::net::SocketAddr;

use app_api::AppContext;
use footprint_app::{AppPaths, AppState, ensure_app_data_dir, migrate_legacy_storage};
use http_api::{CSRF_HEADER, HttpState, generate_csrf_token};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        info!(
            path = %config.file.display(),
            port = config.config.port,
            "created default config"
        );
    }

    let data_dir = dirs::resolve_data_dir(args.data_dir).map_err(io::Error::other)?;
    info!(dir = %data_dir.dir.display(), source = ?data_dir.source, "using data dir");

    let port = args.port.unwrap_or(config.config.port);

    let paths = AppPaths::new(data_dir.dir.clone());
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;
    let legacy_import = match migrate_legacy_storage(&paths) {
        Ok(import) => import,
        Err(err) => {
            warn!("legacy ledger not imported: {}", err);
            None
        }
    };

    let app_state = AppState::new(paths.db_path, paths.factors_defaults_path);
    app_state
        .initialize()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;

    let context = AppContext {
        app_state,
        app_data_dir: data_dir.dir,
        legacy_import,
    };

    let csrf_token = generate_csrf_token();
    let state = HttpState::new(context, csrf_token.clone());
    let router = http_api::router(state);

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    let url = format!("http://127.0.0.1:{actual_port}");

    if used_fallback {
        warn!("configured port {port} was unavailable; using {actual_port} for this run");
    }

    println!("Carbon Footprint API is running at {url}/api");
    println!("Send header {CSRF_HEADER}: {csrf_token}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
