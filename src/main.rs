use coursepay::{api, config::Config, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting coursepay backend...");

    if let Err(e) = api::server::start_server(config).await {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
