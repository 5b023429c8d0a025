use anyhow::Context;
use minitest::{ClientConfig, FileStore, HttpSurveyService, SessionStore, SurveyRunner};
use minitest_dialoguer::{DialoguerFrontend, FrontendError};
use tracing::info;

const LOG_ENV: &str = "MINITEST_LOG";

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = ClientConfig::load().context("failed to load configuration")?;
    let service = HttpSurveyService::from_config(&config)?;
    let session_file = config.session_file()?;
    info!(session_file = %session_file.display(), base_url = %config.endpoints.base_url, "starting");

    let mut runner = SurveyRunner::restore(service, SessionStore::new(FileStore::new(session_file)));
    let frontend = if console::colors_enabled() {
        DialoguerFrontend::new()
    } else {
        DialoguerFrontend::plain()
    };

    match frontend.run(&mut runner).await {
        Ok(()) | Err(FrontendError::Cancelled) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
