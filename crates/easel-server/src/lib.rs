//! HTTP surface for Easel
//!
//! Wires the image gateway and the chat pass-through behind one router with
//! CORS, body limits and request tracing.

mod body_limit;
mod cors;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use easel_config::Config;
use easel_core::UpstreamClient;
use tower_http::trace::TraceLayer;

/// Listen address when neither config nor CLI sets one
pub const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 3000);

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client or the image gateway cannot be
    /// initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS);

        // One client for every feature; connection pooling is shared
        let upstream = Arc::new(
            UpstreamClient::from_config(&config.upstream)
                .map_err(|e| anyhow::anyhow!("Failed to initialize upstream client: {e}"))?,
        );

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        if config.image.enabled {
            let gateway = easel_imagegen::build_gateway(config, Arc::clone(&upstream))?;
            app = app.merge(easel_imagegen::endpoint_router().with_state(gateway));
        }

        if config.chat.enabled {
            let chat = easel_chat::build_service(config, Arc::clone(&upstream));
            app = app.merge(easel_chat::endpoint_router().with_state(chat));
        }

        // Apply middleware layers (innermost first)
        let body_limit = config.server.body_limit;
        app = app.layer(DefaultBodyLimit::max(body_limit));
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            body_limit::body_limit_middleware(body_limit, req, next)
        }));

        app = app.layer(TraceLayer::new_for_http());

        if config.server.cors.enabled {
            app = app.layer(cors::cors_layer(&config.server.cors));
        }

        tracing::debug!(
            image = config.image.enabled,
            chat = config.chat.enabled,
            upstream = %upstream.base_url(),
            "server assembled"
        );

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
