use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::state::{AppState, MarketFeed};

/// Periodic market-data poll. A failed tick stores the sentinel
/// `Unavailable` state — no retry, no backoff; the next tick overwrites it.
/// Runs until process shutdown; workflow resets do not cancel it.
pub async fn run_market_poll(api: ApiClient, state: Arc<AppState>) {
    let interval_secs = state.config.read().unwrap().market_poll_interval_secs;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    let cancel = state.poll_cancel.clone();

    tracing::info!(interval_secs, "market poll started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match api.market_data().await {
                    Ok(data) => {
                        tracing::debug!(
                            btc_price = %data.btc_price,
                            volatility = %data.volatility,
                            live = data.is_live(),
                            "market data polled"
                        );
                        state.set_market(MarketFeed::Live(data));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "market poll failed");
                        state.set_market(MarketFeed::Unavailable { error: e.to_string() });
                    }
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("market poll stopped");
                return;
            }
        }
    }
}

/// Periodic platform-exposure poll. Failures are logged only; the last good
/// snapshot stays on display.
pub async fn run_exposure_poll(api: ApiClient, state: Arc<AppState>) {
    let interval_secs = state.config.read().unwrap().exposure_poll_interval_secs;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    let cancel = state.poll_cancel.clone();

    tracing::info!(interval_secs, "exposure poll started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match api.platform_exposure().await {
                    Ok(exposure) => {
                        tracing::debug!(
                            net_btc = %exposure.net_exposure_btc,
                            coverage = %exposure.hedge_coverage_ratio,
                            "exposure polled"
                        );
                        state.set_exposure(exposure);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "exposure poll failed");
                    }
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("exposure poll stopped");
                return;
            }
        }
    }
}
