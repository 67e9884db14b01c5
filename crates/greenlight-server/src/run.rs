use axum::{Router, http::StatusCode};
use futures::FutureExt;
use greenlight_app::state::{AppConfig, AppState};
use tower_http::{
    cors::CorsLayer,
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::Result;

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app = main_router(state, &args);

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, env = %args.env, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("server stopped");
    Ok(())
}

pub fn main_router(state: AppState, args: &ServerConfig) -> Router<()> {
    let mut router = greenlight_app::rest_api::router()
        .with_state(state)
        .layer(RequestBodyTimeoutLayer::new(args.read_timeout))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            args.request_timeout,
        ))
        .layer(TraceLayer::new_for_http());

    if !args.no_cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let app_config: AppConfig = config.into();

    let pool = greenlight_dal::new_pool(&config.database).await?;
    info!("database connection pool established");
    greenlight_dal::migrate(&pool).await?;
    debug!("database migrations applied");

    Ok(AppState::new(app_config, pool))
}
