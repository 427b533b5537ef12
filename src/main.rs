use youtube_download_api_lib::{config::ServiceConfig, logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = ServiceConfig::from_env()?;
    run(config).await
}
