// src/main.rs
use container_load_planner::api;
use container_load_planner::config::AppConfig;

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            log::warn!("Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    log::info!("Container load planner starting...");
    api::start_api_server(app_config.api, app_config.placement, app_config.pricing).await;
}
