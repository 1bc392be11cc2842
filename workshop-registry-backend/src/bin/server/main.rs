use workshop_registry_backend::error::AppError;
use workshop_registry_backend::run_server;
use workshop_registry_backend::telemetry::setup_tracing;
use workshop_registry_config::get_config;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // avoid putting more code here as this is outside of all spans
    setup_tracing();
    let config = get_config()?;
    run_server(config).await
}
