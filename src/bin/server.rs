use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgersync::{
    AppState, PaginationConfig, SyncConfig, TellerClient, build_router, graceful_shutdown,
};

/// The REST API server for ledgersync.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to a directory with the server's SSL certificate `cert.pem`
    /// and key `key.pem`.
    #[arg(long)]
    cert_path: String,

    /// File path to a directory with the Teller client certificate
    /// `certificate.pem` and key `private_key.pem` used for mutual TLS.
    #[arg(long)]
    teller_cert_path: String,

    /// The base URL of the Teller API.
    #[arg(long, default_value = "https://api.teller.io")]
    teller_uri: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let tls_config = RustlsConfig::from_pem_file(
        PathBuf::from(&args.cert_path).join("cert.pem"),
        PathBuf::from(&args.cert_path).join("key.pem"),
    )
    .await
    .expect("Could not open TLS certificates.");

    let teller_certificate =
        std::fs::read(PathBuf::from(&args.teller_cert_path).join("certificate.pem"))
            .expect("Could not read the Teller client certificate.");
    let teller_private_key =
        std::fs::read(PathBuf::from(&args.teller_cert_path).join("private_key.pem"))
            .expect("Could not read the Teller client key.");
    let teller_client = TellerClient::new(&args.teller_uri, &teller_certificate, &teller_private_key)
        .expect("Could not build the Teller client.");

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let state = AppState::new(
        conn,
        Arc::new(teller_client),
        SyncConfig::default(),
        PaginationConfig::default(),
    )
    .expect("Could not initialize the application state.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTPS server listening on {}", addr);
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
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
