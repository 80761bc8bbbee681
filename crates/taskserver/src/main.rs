use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use taskrunner::TaskflowRuntime;
use taskserver::{configure, cors, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting taskflow server");

    let runtime = TaskflowRuntime::with_registry(Arc::new(tasklib::default_registry()));
    info!(
        "Runtime initialized with {} task types",
        runtime.registry().len()
    );

    let state = web::Data::new(AppState::new(Arc::new(runtime)));
    let config = ServerConfig::from_env();

    info!("Server starting on http://{}", config.bind_address);
    info!("Allowed origins: {}", config.allowed_origins.join(", "));

    let bind_address = config.bind_address.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&config))
            .wrap(Logger::default())
            .configure(configure(state.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
