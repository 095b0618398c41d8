use filter_relations::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log.level))
        .init();

    log::info!(
        "Configuration loaded: server={}:{}",
        config.server.host,
        config.server.port
    );

    filter_relations::run_server(&config).await
}
