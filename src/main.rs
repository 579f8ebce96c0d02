mod api;
mod config;
mod console;
mod demo;
mod error;
mod poller;
mod render;
mod session;
mod state;
mod types;

#[cfg(test)]
mod tests;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.parse().unwrap_or_default()),
        )
        .with_target(false)
        .init();

    tracing::info!(
        api_base = %config.api_base,
        require_live_data = config.require_live_data,
        market_poll_secs = config.market_poll_interval_secs,
        "atticus-demo starting"
    );

    let api = api::ApiClient::new(&config)?;
    let app_state = state::AppState::new(config);

    tokio::spawn(poller::run_market_poll(api.clone(), app_state.clone()));
    tokio::spawn(poller::run_exposure_poll(api.clone(), app_state.clone()));

    let client = demo::DemoClient::new(api, app_state.clone());
    console::run_stdin(client).await;

    app_state.poll_cancel.cancel();
    app_state.config.read().unwrap().persist();

    Ok(())
}
