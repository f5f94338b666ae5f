//! The HTTP listener and its lifecycle.
//!
//! The server runs on a dedicated thread with its own actix system so that it
//! can be started and stopped from synchronous host code. [`start`] returns
//! only once the listener is bound, and the returned [`RunningServer`] is the
//! only way to stop it again.

use crate::appdata::{AppData, Env};
use crate::endpoints;
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, ContentType};
use actix_web::http::Method;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use std::net::SocketAddr;
use std::thread::JoinHandle;
use tracing::info;

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Every route served, as `(method, path, description)`.
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/health", "Health check"),
    ("GET", "/player/:username", "Get player statistics"),
    ("GET", "/server/stats", "Get server statistics"),
    ("GET", "/top/:statistic", "Get top players (coming soon)"),
    ("GET", "/metrics", "Prometheus metrics"),
];

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },

    #[error("failed to spawn the HTTP server thread: {0}")]
    Spawn(std::io::Error),

    #[error("HTTP server thread exited before reporting its state")]
    Crashed,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host:               String,
    pub port:               u16,
    pub workers:            usize,
    pub keep_alive:         std::time::Duration,
    pub shutdown_timeout:   std::time::Duration,
}

impl From<&Env> for ServerConfig {
    fn from(env: &Env) -> Self {
        Self {
            host: env.host.clone(),
            port: env.port,
            workers: env.workers,
            keep_alive: env.keep_alive,
            shutdown_timeout: env.shutdown_timeout,
        }
    }
}

/// The full application: routes, CORS, default headers and access logging.
pub fn build_app(
    data: web::Data<AppData>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Preflights fall through to the OPTIONS route; cors only decorates
    // requests that carry an Origin.
    let cors = Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .disable_preflight();

    let headers = DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOWED_ORIGIN))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .add(ContentType::json());

    App::new()
        .app_data(data)
        .wrap(cors)
        .wrap(headers)
        .wrap(Logger::default())
        .wrap(Logger::new("%a %{User-Agent}i"))
        .route("/{tail:.*}", web::method(Method::OPTIONS).to(endpoints::fallback::preflight))
        .service(endpoints::health::health)
        .service(endpoints::player::player)
        .service(endpoints::server_stats::server_stats)
        .service(endpoints::top::top)
        .service(endpoints::metrics::get_metrics)
        .default_service(web::to(endpoints::fallback::not_found))
}

pub struct RunningServer {
    handle: ServerHandle,
    thread: JoinHandle<std::io::Result<()>>,
    addrs:  Vec<SocketAddr>,
}

type Started = std::io::Result<(ServerHandle, Vec<SocketAddr>)>;

/// Bind and start serving. Blocks until the listener is bound or binding failed.
pub fn start(config: &ServerConfig, data: web::Data<AppData>) -> Result<RunningServer, ServerError> {
    let (tx, rx) = crossbeam_channel::bounded::<Started>(1);
    let cfg = config.clone();

    let thread = std::thread::Builder::new()
        .name("stats-api-http".to_string())
        .spawn(move || {
            actix_web::rt::System::new().block_on(async move {
                let bound = HttpServer::new(move || build_app(data.clone()))
                    .workers(cfg.workers)
                    .keep_alive(cfg.keep_alive)
                    .shutdown_timeout(cfg.shutdown_timeout.as_secs())
                    .disable_signals()
                    .bind((cfg.host.as_str(), cfg.port));

                let server = match bound {
                    Ok(server) => server,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return Ok(());
                    }
                };

                let addrs = server.addrs();
                let server = server.run();
                let _ = tx.send(Ok((server.handle(), addrs)));
                server.await
            })
        })
        .map_err(ServerError::Spawn)?;

    match rx.recv() {
        Ok(Ok((handle, addrs))) => {
            info!("HTTP API server started on port {}", addrs.first().map(|a| a.port()).unwrap_or(config.port));
            Ok(RunningServer { handle, thread, addrs })
        }
        Ok(Err(source)) => {
            let _ = thread.join();
            Err(ServerError::Bind {
                addr: format!("{}:{}", config.host, config.port),
                source,
            })
        }
        Err(_) => {
            let _ = thread.join();
            Err(ServerError::Crashed)
        }
    }
}

impl RunningServer {
    /// Bound addresses; with port 0 these carry the port actually chosen.
    pub fn addrs(&self) -> &[SocketAddr] {
        &self.addrs
    }

    pub fn port(&self) -> Option<u16> {
        self.addrs.first().map(|a| a.port())
    }

    /// Stop accepting connections, wait for in-flight requests, join the thread.
    pub fn stop(self) -> Result<(), ServerError> {
        futures::executor::block_on(self.handle.stop(true));

        match self.thread.join() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::warn!("HTTP server exited with an error: {}", e);
                Ok(())
            }
            Err(_) => Err(ServerError::Crashed),
        }
    }
}
