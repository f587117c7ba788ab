use std::{
    env,
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spese_rs::{
    AppSecret, AppState, ReportClient, ReportConfig, build_router, graceful_shutdown,
    logging_middleware,
};

/// The web server for tracking household income and expenses.
///
/// The app password is read from the environment variable `APP_PASSWORD`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// Directory containing an SSL certificate `cert.pem` and key `key.pem`.
    ///
    /// The server uses plain HTTP if this is not set.
    #[arg(long, env = "CERT_PATH")]
    cert_path: Option<PathBuf>,

    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Serve on all network interfaces instead of only localhost.
    #[arg(long, default_value_t = false)]
    public: bool,

    /// The canonical name of the local timezone, e.g. "Europe/Rome".
    #[arg(long, env = "LOCAL_TIMEZONE", default_value = "Europe/Rome")]
    local_timezone: String,

    /// URL of the service that writes report spreadsheets.
    #[arg(long, env = "DOCUMENT_SERVICE_URL")]
    document_service_url: Option<String>,

    /// ID of the folder report spreadsheets are written to.
    #[arg(long, env = "DOCUMENT_FOLDER_ID")]
    document_folder_id: Option<String>,

    /// URL of the service that renders chart images.
    #[arg(long, env = "CHART_SERVICE_URL")]
    chart_service_url: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let password =
        env::var("APP_PASSWORD").expect("The environment variable 'APP_PASSWORD' must be set");

    let ip = if args.public {
        [0, 0, 0, 0]
    } else {
        [127, 0, 0, 1]
    };
    let addr = SocketAddr::from((ip, args.port));

    let report_client = ReportClient::new(ReportConfig {
        document_service_url: args.document_service_url,
        folder_id: args.document_folder_id,
        chart_service_url: args.chart_service_url,
    })
    .expect("Could not create the report client");

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let app_state = AppState::new(
        conn,
        AppSecret::new(&password),
        &args.local_timezone,
        report_client,
    )
    .expect("Could not create the app state");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    match args.cert_path {
        Some(cert_path) => {
            let tls_config = RustlsConfig::from_pem_file(
                cert_path.join("cert.pem"),
                cert_path.join("key.pem"),
            )
            .await
            .expect("Could not open TLS certificates.");

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
                .expect("The server stopped unexpectedly");
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
                .expect("The server stopped unexpectedly");
        }
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
