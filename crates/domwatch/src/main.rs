use std::sync::Arc;

use tracing::{info, warn};

use domwatch_core::{config::Config, ports::DomainStatusApi};
use domwatch_indiwtf::IndiwtfClient;

#[tokio::main]
async fn main() -> Result<(), domwatch_core::Error> {
    domwatch_core::logging::init("domwatch")?;

    let cfg = Arc::new(Config::load()?);

    let client = IndiwtfClient::new(
        cfg.indiwtf_base_url.clone(),
        cfg.indiwtf_token.clone(),
        cfg.check_timeout,
    )?;
    if !client.is_configured() {
        warn!("INDIWTF_TOKEN is not set: watchlist editing works, every check will report an error");
    }
    let api: Arc<dyn DomainStatusApi> = Arc::new(client);

    info!(
        interval_secs = cfg.check_interval.as_secs(),
        "starting domain watch bot"
    );

    domwatch_telegram::router::run_polling(cfg, api)
        .await
        .map_err(|e| domwatch_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
