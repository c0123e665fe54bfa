use color_eyre::owo_colors::OwoColorize;
use eyre::Result;
use http::Method;
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::Any;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

use axum::{Router, body::Body, http::Request, routing::get, serve::Serve};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_request_id::{RequestId, RequestIdLayer};
use tracing::{Level, error, error_span, info};
use ydocs_common::{DocumentSource, LoadedDocument};

use crate::ApplicationSettings;
use crate::into_http::HttpError;
use crate::routes::{
    document, document_control, document_metadata, document_names, document_section,
    document_sections, documents, health_check,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub source: Arc<DocumentSource>,
}

impl AppState {
    pub fn new(source: DocumentSource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Reads the whole source directory on the blocking pool.
    pub async fn load_all(&self) -> Result<Vec<LoadedDocument>, HttpError> {
        let source = Arc::clone(&self.source);
        let documents = tokio::task::spawn_blocking(move || source.load_all()).await??;
        Ok(documents)
    }

    pub async fn load_named(&self, name: &str) -> Result<LoadedDocument, HttpError> {
        let source = Arc::clone(&self.source);
        let lookup = name.to_owned();
        let document = tokio::task::spawn_blocking(move || source.load_named(&lookup)).await??;

        document.ok_or_else(|| HttpError::missing_document(name))
    }
}

#[derive(Debug)]
pub struct Application {
    pub port: u16,
    pub host: IpAddr,
    pub server: Serve<Router, Router>,
}

impl Application {
    /// # Errors
    /// Fails when neither the configured port nor an OS-assigned one can be
    /// bound, or when the local address of the listener is unavailable.
    pub async fn build(configuration: &ApplicationSettings) -> Result<Self> {
        let address = format!("{}:{}", configuration.host, configuration.port);

        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(err) => {
                error!("{err}. Trying another port...");
                match TcpListener::bind(format!("{}:0", configuration.host)).await {
                    Ok(listener) => listener,
                    Err(err) => {
                        error!("No ports available, shutting down...");
                        return Err(err.into());
                    }
                }
            }
        };

        let port = listener.local_addr()?.port();
        let host = configuration.host;

        let state = AppState::new(configuration.document_source());
        let server = build_server(listener, state);

        Ok(Self { port, host, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> String {
        self.host.to_string()
    }

    /// # Errors
    ///
    /// Returns an error if the server fails while accepting connections.
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server
            // https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install the Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install the SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("ctrl+c received.")
        },
        () = terminate => {
            info!("SIGTERM received.")
        },
    }
}

/// The full application router, with state applied and middleware attached.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/documents", get(documents))
        .route("/v1/documents/", get(documents))
        .route("/v1/documents/names", get(document_names))
        .route("/v1/documents/:document", get(document))
        .route("/v1/documents/:document/sections", get(document_sections))
        .route("/v1/documents/:document/metadata", get(document_metadata))
        .route(
            "/v1/documents/:document/document_control",
            get(document_control),
        )
        .route("/v1/documents/:document/:section", get(document_section));

    let mut server = api_routes.with_state(state);

    if cfg!(debug_assertions) {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers(Any);

        server = server.layer(cors);
    }

    server
        .layer(
            ServiceBuilder::new()
                .layer(RequestIdLayer)
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| {
                            let request_id = request
                                .extensions()
                                .get::<RequestId>()
                                .map_or_else(|| "unknown".into(), ToString::to_string);

                            error_span!(
                                "request",
                                id = %request_id,
                                method = %request.method().blue().bold(),
                                uri = %request.uri()
                            )
                        })
                        .on_response(
                            DefaultOnResponse::new()
                                .include_headers(true)
                                .level(Level::INFO),
                        ),
                ),
        )
        .layer(CompressionLayer::new())
}

pub fn build_server(listener: TcpListener, state: AppState) -> Serve<Router, Router> {
    axum::serve(listener, router(state))
}

pub async fn run_server(configuration: ApplicationSettings, start: Instant) -> Result<()> {
    match Application::build(&configuration).await {
        Ok(app) => {
            let url = format!("http://{}:{}", app.host(), app.port());

            println!(
                "\n\n  {} {} ready in {} ms\n",
                configuration.name.to_uppercase().bold().bright_green(),
                format!("v{}", configuration.version).green(),
                start.elapsed().as_millis().bold().bright_white(),
            );

            println!(
                "  {}  {}:  {}",
                "➜".bold().bright_green(),
                "Local".bold().bright_white(),
                format!("{url}/v1/documents/").bright_cyan().underline()
            );

            println!(
                "  {}  {}:  {}\n\n",
                "➜".bold().bright_green(),
                "Source".bold().bright_white(),
                configuration.source_dir.bright_white()
            );

            info!(source = %configuration.source_dir, policy = ?configuration.on_parse_error, "serving documents");

            if let Err(e) = app.run_until_stopped().await {
                error!("Error running the HTTP server: {:?}", e);
                return Err(e.into());
            }
        }
        Err(e) => {
            error!("Failed to start the server: {:?}", e);
            return Err(e);
        }
    }
    Ok(())
}
