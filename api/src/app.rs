use std::net::SocketAddr;

use axum::{Router, middleware::from_extractor_with_state};
use notifications_core::{
    JobOptions, PushOptions, create_repositories, create_scheduler, jobs::Scheduler,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    config::Config,
    http::{
        health::routes::health_routes,
        internal::routes::internal_routes,
        notifications::routes::notification_routes,
        push::routes::push_routes,
        server::{
            ApiError, AppState,
            middleware::auth::{
                AuthMiddleware, ServiceKeyMiddleware,
                entities::{AuthValidator, ServiceKeyValidator},
            },
        },
        settings::routes::settings_routes,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notifications API",
        description = "Per-user notifications, notification preferences and push subscriptions"
    ),
    tags(
        (name = "notifications", description = "Notification inbox"),
        (name = "notification-settings", description = "Per-user notification toggles"),
        (name = "push", description = "Push endpoint registration"),
        (name = "internal", description = "Service-to-service notification ingestion")
    )
)]
struct ApiDoc;

/// Builds the API router: user routes behind the JWT check, internal routes
/// behind the service key, plus the OpenAPI UI.
pub fn app_router(state: AppState) -> Router {
    let (user_router, mut api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(notification_routes())
        .merge(settings_routes())
        .merge(push_routes())
        .split_for_parts();
    let (internal_router, internal_api) = internal_routes().split_for_parts();
    api.merge(internal_api);

    let user_router = user_router.route_layer(from_extractor_with_state::<
        AuthMiddleware,
        AuthValidator,
    >(state.auth.clone()));
    let internal_router = internal_router.route_layer(from_extractor_with_state::<
        ServiceKeyMiddleware,
        ServiceKeyValidator,
    >(state.service_key.clone()));

    user_router
        .merge(internal_router)
        .merge(Scalar::with_url("/scalar", api))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct App {
    config: Config,
    state: AppState,
    app_router: Router,
    health_router: Router,
    scheduler: Scheduler,
}

impl App {
    pub async fn new(config: Config) -> Result<Self, ApiError> {
        let repositories = create_repositories(
            config.database.clone().into(),
            config.database.max_connections,
        )
        .await
        .map_err(|e| ApiError::StartupError(e.to_string()))?;

        let job_options = JobOptions::from(config.jobs.clone());
        let scheduler = create_scheduler(&repositories, &job_options);

        let services = repositories
            .into_services(PushOptions::from(config.push.clone()))
            .map_err(|e| ApiError::StartupError(e.to_string()))?;

        let service_key = ServiceKeyValidator::new(&config.internal.api_key);
        if !service_key.is_enabled() {
            info!("INTERNAL_API_KEY is empty, notification ingestion is disabled");
        }

        let state = AppState::new(
            services,
            AuthValidator::new(&config.jwt.secret_key),
            service_key,
        );
        let app_router = app_router(state.clone());
        let health_router = health_routes().with_state(state.clone());

        Ok(Self {
            config,
            state,
            app_router,
            health_router,
            scheduler,
        })
    }

    pub async fn start(mut self) -> Result<(), ApiError> {
        let api_addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.api_port));
        let health_addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.health_port));

        let api_listener = TcpListener::bind(api_addr)
            .await
            .map_err(|e| ApiError::StartupError(format!("failed to bind {api_addr}: {e}")))?;
        let health_listener = TcpListener::bind(health_addr)
            .await
            .map_err(|e| ApiError::StartupError(format!("failed to bind {health_addr}: {e}")))?;

        info!(
            environment = ?self.config.environment,
            "API listening on {api_addr}, health on {health_addr}"
        );

        self.scheduler.start();

        let api_server = axum::serve(api_listener, self.app_router.clone())
            .with_graceful_shutdown(shutdown_signal());
        let health_server = axum::serve(health_listener, self.health_router.clone())
            .with_graceful_shutdown(shutdown_signal());

        let served = tokio::try_join!(api_server.into_future(), health_server.into_future());

        self.shutdown().await;

        served
            .map(|_| ())
            .map_err(|e| ApiError::StartupError(e.to_string()))
    }

    /// Stops background jobs before closing the pool they use.
    pub async fn shutdown(&mut self) {
        self.scheduler.stop().await;
        self.state.shutdown().await;
        info!("Service stopped");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
