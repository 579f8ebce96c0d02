/// Tests for the DemoClient preconditions — live-data gating and input
/// validation must refuse before any network request. The client points at
/// an unroutable address, so anything that *does* reach the network comes
/// back as a Transport error and the two cases stay distinguishable.
use rust_decimal_macros::dec;

use crate::api::ApiClient;
use crate::config::Config;
use crate::demo::DemoClient;
use crate::error::DemoError;
use crate::state::{AppState, MarketFeed};
use crate::tests::{live_market, sample_analysis, sample_execution, sample_market, sample_strategy};
use crate::types::{PortfolioKind, PositionSide};

fn test_config(require_live_data: bool) -> Config {
    Config {
        api_base: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 1,
        market_poll_interval_secs: 30,
        exposure_poll_interval_secs: 30,
        require_live_data,
        execution_pacing_ms: 0,
        round_contracts: false,
        log_level: "info".to_string(),
    }
}

fn test_client(require_live_data: bool) -> DemoClient {
    let config = test_config(require_live_data);
    let api = ApiClient::new(&config).unwrap();
    let state = AppState::new(config);
    DemoClient::new(api, state)
}

// ── client-side validation ────────────────────────────────────────────────────

#[tokio::test]
async fn custom_size_zero_never_reaches_the_network() {
    let client = test_client(false);
    let err = client
        .analyze_custom_position(dec!(0), PositionSide::Long)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
}

#[tokio::test]
async fn custom_size_negative_never_reaches_the_network() {
    let client = test_client(false);
    let err = client
        .analyze_custom_position(dec!(-5), PositionSide::Short)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
}

#[tokio::test]
async fn custom_book_with_nonpositive_leg_is_refused() {
    let client = test_client(false);
    let positions = vec![crate::types::CustomPosition {
        position_type: PositionSide::Long,
        btc_amount: dec!(0),
    }];
    let err = client.create_custom_portfolio(positions).await.unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
}

// ── live-data gate ────────────────────────────────────────────────────────────

#[tokio::test]
async fn gate_refuses_analyze_before_first_poll() {
    let client = test_client(true);
    let err = client
        .analyze_portfolio(PortfolioKind::SmallFund)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::StaleMarketData), "got: {err}");
    assert_eq!(client.state().step(), 1);
}

#[tokio::test]
async fn gate_refuses_analyze_when_feed_unavailable() {
    let client = test_client(true);
    client.state().set_market(MarketFeed::Unavailable {
        error: "poll failed".to_string(),
    });
    let err = client
        .analyze_custom_position(dec!(25), PositionSide::Long)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::StaleMarketData), "got: {err}");
}

#[tokio::test]
async fn gate_refuses_when_snapshot_lacks_live_tags() {
    let client = test_client(true);
    client
        .state()
        .set_market(MarketFeed::Live(sample_market(Some("cached"), None)));
    let err = client
        .analyze_portfolio(PortfolioKind::MidCapFund)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::StaleMarketData), "got: {err}");
}

#[tokio::test]
async fn gate_open_lets_the_request_through() {
    let client = test_client(true);
    client.state().set_market(MarketFeed::Live(live_market()));
    let err = client
        .analyze_portfolio(PortfolioKind::SmallFund)
        .await
        .unwrap_err();
    // nothing is listening — the request was issued and failed in transport
    assert!(matches!(err, DemoError::Transport(_)), "got: {err}");
    assert_eq!(client.state().step(), 1);
}

#[tokio::test]
async fn gate_disabled_skips_the_liveness_check() {
    let client = test_client(false);
    let err = client
        .analyze_portfolio(PortfolioKind::SmallFund)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::Transport(_)), "got: {err}");
}

// ── failure leaves state unchanged ────────────────────────────────────────────

#[tokio::test]
async fn failed_analyze_leaves_step_and_analysis_unchanged() {
    let client = test_client(false);
    client
        .state()
        .workflow
        .lock()
        .unwrap()
        .analyzed(sample_analysis())
        .unwrap();

    let err = client
        .analyze_portfolio(PortfolioKind::LargeFund)
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::Transport(_)), "got: {err}");

    let workflow = client.state().workflow.lock().unwrap();
    assert_eq!(workflow.step(), 2);
    assert!(workflow.analysis().is_some());
}

#[tokio::test]
async fn strategies_refused_without_analysis() {
    let client = test_client(false);
    let err = client.generate_strategies().await.unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
    assert_eq!(client.state().step(), 1);
}

#[tokio::test]
async fn execute_refused_without_selection() {
    let client = test_client(false);
    let err = client.execute_strategy().await.unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
}

#[tokio::test]
async fn execute_at_step_four_refused_before_network() {
    let client = test_client(false);
    {
        let mut workflow = client.state().workflow.lock().unwrap();
        workflow.analyzed(sample_analysis()).unwrap();
        workflow
            .strategies_shown(vec![sample_strategy("collar")])
            .unwrap();
        let strategy = workflow.find_strategy("collar").unwrap().clone();
        workflow.select(strategy).unwrap();
        workflow.executed(sample_execution()).unwrap();
    }

    // a Transport error here would mean the duplicate POST went out
    let err = client.execute_strategy().await.unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
    assert_eq!(client.state().step(), 4);
}

#[tokio::test]
async fn strategies_can_be_regenerated_at_step_three() {
    let client = test_client(false);
    {
        let mut workflow = client.state().workflow.lock().unwrap();
        workflow.analyzed(sample_analysis()).unwrap();
        workflow
            .strategies_shown(vec![sample_strategy("collar")])
            .unwrap();
    }

    // regeneration is a valid re-run: the request goes out (and fails in
    // transport here), leaving the current menu in place
    let err = client.generate_strategies().await.unwrap_err();
    assert!(matches!(err, DemoError::Transport(_)), "got: {err}");

    let workflow = client.state().workflow.lock().unwrap();
    assert_eq!(workflow.step(), 3);
    assert!(workflow.strategies().is_some());
}

#[tokio::test]
async fn select_refused_for_strategy_not_on_display() {
    let client = test_client(false);
    let err = client.select_strategy("protective_put").await.unwrap_err();
    assert!(matches!(err, DemoError::Validation(_)), "got: {err}");
}

// ── reset ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_returns_to_intake() {
    let client = test_client(false);
    client
        .state()
        .workflow
        .lock()
        .unwrap()
        .analyzed(sample_analysis())
        .unwrap();
    assert_eq!(client.state().step(), 2);

    client.reset();
    assert_eq!(client.state().step(), 1);
    assert!(client.state().workflow.lock().unwrap().analysis().is_none());
}
