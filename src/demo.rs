use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::api::{ApiClient, ExecutionReport, FundPortfolio, PortfolioAnalysis, Strategy};
use crate::error::{DemoError, DemoResult};
use crate::state::AppState;
use crate::types::{CustomPosition, PortfolioKind, PositionSide};

/// Drives the four-step workflow: thin request/response wrappers around the
/// backend, each advancing the session state on success and leaving it
/// untouched on failure. No call is retried.
pub struct DemoClient {
    api: ApiClient,
    state: Arc<AppState>,
}

impl DemoClient {
    pub fn new(api: ApiClient, state: Arc<AppState>) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Gate shared by the workflow-advancing calls: when live data is
    /// required, refuse before issuing any network request unless the last
    /// market poll reported live.
    fn check_live_gate(&self) -> DemoResult<()> {
        let require = self.state.config.read().unwrap().require_live_data;
        if require && !self.state.market_is_live() {
            return Err(DemoError::StaleMarketData);
        }
        Ok(())
    }

    /// The server must also echo the live tag on the analysis itself —
    /// the client timer alone is not trusted.
    fn check_live_echo(&self, analysis: &PortfolioAnalysis) -> DemoResult<()> {
        let require = self.state.config.read().unwrap().require_live_data;
        if require && !analysis.is_live_tagged() {
            return Err(DemoError::StaleMarketData);
        }
        Ok(())
    }

    pub async fn analyze_portfolio(&self, kind: PortfolioKind) -> DemoResult<u8> {
        self.check_live_gate()?;

        let analysis = self.api.analyze_portfolio(kind).await?;
        self.check_live_echo(&analysis)?;

        let mut workflow = self.state.workflow.lock().unwrap();
        workflow.analyzed(analysis)?;
        let step = workflow.step();
        drop(workflow);

        tracing::info!(kind = %kind, step, "portfolio analyzed");
        self.state.push_event("analyze", &format!("{kind} analyzed"));
        Ok(step)
    }

    pub async fn analyze_custom_position(
        &self,
        size: Decimal,
        side: PositionSide,
    ) -> DemoResult<u8> {
        if size <= Decimal::ZERO {
            return Err(DemoError::validation("position size must be greater than zero"));
        }
        self.check_live_gate()?;

        let analysis = self.api.analyze_custom(size, &side.to_string()).await?;
        self.check_live_echo(&analysis)?;

        let mut workflow = self.state.workflow.lock().unwrap();
        workflow.analyzed(analysis)?;
        let step = workflow.step();
        drop(workflow);

        tracing::info!(size = %size, side = %side, step, "custom position analyzed");
        self.state
            .push_event("analyze", &format!("custom {size} BTC {side} analyzed"));
        Ok(step)
    }

    pub async fn generate_strategies(&self) -> DemoResult<Vec<Strategy>> {
        // refuse locally before hitting the network
        if self.state.workflow.lock().unwrap().analysis().is_none() {
            return Err(DemoError::validation(
                "no portfolio analysis yet — run analyze first",
            ));
        }
        self.check_live_gate()?;

        let menu = self.api.generate_strategies().await?;
        if let Some(context) = &menu.analysis_context {
            tracing::debug!(context = %context, "analysis context echoed");
        }
        let strategies = menu.strategies.clone();

        self.state
            .workflow
            .lock()
            .unwrap()
            .strategies_shown(menu.strategies)?;

        tracing::info!(count = strategies.len(), "strategies generated");
        self.state
            .push_event("strategies", &format!("{} strategies shown", strategies.len()));
        Ok(strategies)
    }

    /// Commits to one strategy, then auto-chains into execution after a
    /// fixed pacing delay. The delay is presentation pacing, not a data
    /// dependency.
    pub async fn select_strategy(&self, strategy_type: &str) -> DemoResult<ExecutionReport> {
        {
            let workflow = self.state.workflow.lock().unwrap();
            workflow.find_strategy(strategy_type)?;
        }

        let strategy = self.api.select_strategy(strategy_type).await?;
        let display = strategy.display_name.clone();
        self.state.workflow.lock().unwrap().select(strategy)?;

        tracing::info!(strategy = strategy_type, "strategy selected");
        self.state.push_event("select", &format!("selected {display}"));

        let pacing = self.state.config.read().unwrap().execution_pacing_ms;
        tokio::time::sleep(Duration::from_millis(pacing)).await;

        self.execute_strategy().await
    }

    pub async fn execute_strategy(&self) -> DemoResult<ExecutionReport> {
        // a selection must be committed and still awaiting execution;
        // refuse here so step 4 never re-posts the execution
        {
            let workflow = self.state.workflow.lock().unwrap();
            if workflow.pending_selection().is_none() {
                if workflow.step() == 4 {
                    return Err(DemoError::validation(
                        "strategy already executed — reset to start a new analysis",
                    ));
                }
                return Err(DemoError::validation(
                    "no strategy selected yet — run select first",
                ));
            }
        }

        let execution = self.api.execute_strategy().await?;
        self.state.set_exposure(execution.platform_exposure.clone());
        self.state.workflow.lock().unwrap().executed(execution.clone())?;

        tracing::info!(
            contracts = %execution.execution_summary.contracts_filled,
            status = %execution.execution_summary.status,
            "strategy executed"
        );
        self.state.push_event(
            "execute",
            &format!("filled {} contracts", execution.execution_summary.contracts_filled),
        );

        // execution moved the platform book — refresh exposure right away
        self.refresh_exposure().await;

        Ok(execution)
    }

    /// Best-effort exposure refresh; failures are logged, never surfaced
    pub async fn refresh_exposure(&self) {
        match self.api.platform_exposure().await {
            Ok(exposure) => self.state.set_exposure(exposure),
            Err(e) => tracing::warn!(error = %e, "exposure refresh failed"),
        }
    }

    /// Alternate intake: backend-generated fund book. Shown to the operator
    /// but does not advance the workflow — analyze does that.
    pub async fn generate_portfolio(&self, kind: PortfolioKind) -> DemoResult<FundPortfolio> {
        let portfolio = self.api.generate_portfolio(kind).await?;
        self.state
            .push_event("portfolio", &format!("{kind} portfolio generated"));
        Ok(portfolio)
    }

    /// Alternate intake: operator-specified positions
    pub async fn create_custom_portfolio(
        &self,
        positions: Vec<CustomPosition>,
    ) -> DemoResult<FundPortfolio> {
        if positions.iter().any(|p| p.btc_amount <= Decimal::ZERO) {
            return Err(DemoError::validation("position sizes must be greater than zero"));
        }
        let portfolio = self.api.create_custom_portfolio(&positions).await?;
        self.state
            .push_event("portfolio", &format!("custom book with {} legs", positions.len()));
        Ok(portfolio)
    }

    pub fn reset(&self) {
        self.state.reset_session();
        tracing::info!("demo reset to intake");
    }
}
