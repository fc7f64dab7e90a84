mod health;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{Router, routing};
use dashscribe_config::Config;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Address used when the configuration does not name one
const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);

/// HTTP front end: liveness probe plus the transcription endpoint
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Assemble routes and middleware from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the transcription pipeline cannot be built, for
    /// example when `dashscope.request_timeout` is malformed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            router: router(config)?,
            listen_address: config.server.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS),
        })
    }

    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Hand the router to a caller that owns its own listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Bind the listen address and serve until `shutdown` is cancelled
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or serving fails
    pub async fn serve(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "listening for transcription requests");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("draining in-flight requests");
            })
            .await?;

        Ok(())
    }
}

fn router(config: &Config) -> anyhow::Result<Router> {
    let transcription = stt::build_server(config)?;

    let mut app = Router::new();

    let health = &config.server.health;
    if health.enabled {
        tracing::debug!(path = %health.path, "mounting liveness probe");
        app = app.route(&health.path, routing::get(health::health_handler));
    }

    app = app.merge(stt::endpoint_router().with_state(transcription));

    // Outermost so failures from every route get an access span
    Ok(app.layer(TraceLayer::new_for_http()))
}
