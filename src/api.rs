use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::error::{DemoError, DemoResult};
use crate::types::{CustomPosition, PortfolioKind};

/// Tag the backend stamps on responses computed from a live feed
pub const LIVE_DATA_SOURCE: &str = "LIVE_MARKET_DATA";

// ── Payloads ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub btc_price: Decimal,
    /// Annualized implied volatility, percent (62 means 62%)
    pub volatility: Decimal,
    pub risk_free_rate: Decimal,
    pub status: Option<String>,
    pub data_source: Option<String>,
}

impl MarketData {
    pub fn is_live(&self) -> bool {
        matches!(self.status.as_deref(), Some("live") | Some("LIVE"))
            || self.data_source.as_deref() == Some(LIVE_DATA_SOURCE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformExposure {
    pub total_client_long_btc: Decimal,
    pub total_platform_hedges_btc: Decimal,
    pub net_exposure_btc: Decimal,
    pub hedge_coverage_ratio: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundProfile {
    pub fund_type: String,
    pub aum: Decimal,
    pub total_btc_size: Decimal,
    pub net_btc_exposure: Decimal,
    pub total_current_value: Decimal,
    pub total_pnl: Decimal,
    pub current_btc_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub position_type: String,
    pub btc_amount: Decimal,
    pub entry_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub var_95: Decimal,
    pub var_99: Option<Decimal>,
    pub annualized_volatility: Decimal,
    pub max_drawdown: Option<Decimal>,
}

/// Portfolio impact under a given BTC price shock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceScenario {
    pub scenario: String,
    pub btc_price_change_pct: Decimal,
    pub portfolio_impact_usd: Decimal,
    pub hedged_impact_usd: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeRecommendation {
    pub recommended_strategy: String,
    pub hedge_ratio: Decimal,
    pub target_exposure_btc: Decimal,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub profile: FundProfile,
    #[serde(default)]
    pub positions: Vec<PortfolioPosition>,
    pub risk_metrics: RiskMetrics,
    #[serde(default)]
    pub scenarios: Vec<PriceScenario>,
    pub hedge_recommendation: HedgeRecommendation,
    pub data_source: Option<String>,
}

impl PortfolioAnalysis {
    pub fn is_live_tagged(&self) -> bool {
        self.data_source.as_deref() == Some(LIVE_DATA_SOURCE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyPricing {
    pub btc_spot_price: Decimal,
    pub contracts_needed: Decimal,
    pub strike_price: Decimal,
    pub premium_per_contract: Decimal,
    pub total_premium: Decimal,
    pub implied_volatility: Decimal,
    pub days_to_expiry: u32,
    pub expiry_date: String,
    pub option_type: String,
    pub cost_as_pct: Decimal,
}

/// A named options-based hedging structure priced by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub strategy_name: String,
    pub display_name: String,
    pub priority: String,
    pub rationale: String,
    pub pricing: StrategyPricing,
}

#[derive(Debug, Clone)]
pub struct StrategyMenu {
    pub strategies: Vec<Strategy>,
    pub analysis_context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueFill {
    pub venue: String,
    pub contracts: Decimal,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub contracts_filled: Decimal,
    pub avg_fill_price: Option<Decimal>,
    pub total_premium_usd: Option<Decimal>,
    pub execution_time_ms: Option<u64>,
    pub status: String,
    #[serde(default)]
    pub venues: Vec<VenueFill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioImpact {
    pub hedge_coverage_ratio: Decimal,
    pub protected_value_usd: Decimal,
    pub residual_delta_btc: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub execution_summary: ExecutionSummary,
    pub portfolio_impact: PortfolioImpact,
    pub platform_exposure: PlatformExposure,
}

/// Portfolio returned by the alternate intake endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundPortfolio {
    pub aum: Decimal,
    pub total_btc_size: Decimal,
    pub net_btc_exposure: Decimal,
    pub gross_btc_exposure: Option<Decimal>,
    pub total_current_value: Decimal,
    pub total_pnl: Decimal,
    pub current_btc_price: Decimal,
    pub fund_type: Option<String>,
}

// ── Response envelopes ──────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketDataResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    btc_price: Option<Decimal>,
    volatility: Option<Decimal>,
    risk_free_rate: Option<Decimal>,
    status: Option<String>,
    data_source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExposureResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    exposure: Option<PlatformExposure>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    analysis: Option<PortfolioAnalysis>,
}

#[derive(Debug, Deserialize)]
struct StrategiesResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    strategies: Option<Vec<Strategy>>,
    analysis_context: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SelectResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    strategy: Option<Strategy>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    execution: Option<ExecutionReport>,
}

#[derive(Debug, Deserialize)]
struct PortfolioResponse {
    #[serde(default = "default_true")]
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
    portfolio: Option<FundPortfolio>,
}

// ── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    #[serde(rename = "type")]
    portfolio_type: &'a str,
}

#[derive(Debug, Serialize)]
struct CustomParams<'a> {
    size: Decimal,
    #[serde(rename = "type")]
    position_type: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalyzeCustomRequest<'a> {
    custom_params: CustomParams<'a>,
}

#[derive(Debug, Serialize)]
struct SelectRequest<'a> {
    strategy_type: &'a str,
}

#[derive(Debug, Serialize)]
struct GeneratePortfolioRequest<'a> {
    fund_type: &'a str,
}

#[derive(Debug, Serialize)]
struct CustomPortfolioRequest<'a> {
    positions: &'a [CustomPosition],
}

// ── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_base)
            .with_context(|| format!("invalid api base url: {}", config.api_base))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> DemoResult<Url> {
        self.base
            .join(path)
            .map_err(|e| DemoError::Malformed(format!("bad endpoint {path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> DemoResult<T> {
        let url = self.endpoint(path)?;
        let resp = self.http.get(url).send().await?;
        Self::read_body(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> DemoResult<T> {
        let url = self.endpoint(path)?;
        let resp = self.http.post(url).json(body).send().await?;
        Self::read_body(resp).await
    }

    async fn read_body<T: DeserializeOwned>(resp: reqwest::Response) -> DemoResult<T> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // business errors ride on 4xx/5xx with the same envelope
            if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
                if let Some(msg) = env.error {
                    return Err(DemoError::backend(msg, env.error_type));
                }
            }
            tracing::warn!(status = %status, body, "backend HTTP error");
            return Err(DemoError::backend(format!("backend returned HTTP {status}"), None));
        }

        serde_json::from_str(&body).map_err(|e| DemoError::Malformed(e.to_string()))
    }

    pub async fn market_data(&self) -> DemoResult<MarketData> {
        let resp: MarketDataResponse = self.get("api/market-data").await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        Ok(MarketData {
            btc_price: required(resp.btc_price, "btc_price")?,
            volatility: required(resp.volatility, "volatility")?,
            risk_free_rate: required(resp.risk_free_rate, "risk_free_rate")?,
            status: resp.status,
            data_source: resp.data_source,
        })
    }

    pub async fn platform_exposure(&self) -> DemoResult<PlatformExposure> {
        let resp: ExposureResponse = self.get("api/platform-exposure").await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.exposure, "exposure")
    }

    pub async fn analyze_portfolio(&self, kind: PortfolioKind) -> DemoResult<PortfolioAnalysis> {
        let body = AnalyzeRequest { portfolio_type: kind.wire_name() };
        let resp: AnalyzeResponse = self.post("api/analyze-portfolio", &body).await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.analysis, "analysis")
    }

    pub async fn analyze_custom(
        &self,
        size: Decimal,
        position_type: &str,
    ) -> DemoResult<PortfolioAnalysis> {
        let body = AnalyzeCustomRequest {
            custom_params: CustomParams { size, position_type },
        };
        let resp: AnalyzeResponse = self.post("api/analyze-portfolio", &body).await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.analysis, "analysis")
    }

    pub async fn generate_strategies(&self) -> DemoResult<StrategyMenu> {
        let resp: StrategiesResponse = self
            .post("api/generate-strategies", &serde_json::json!({}))
            .await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        Ok(StrategyMenu {
            strategies: required(resp.strategies, "strategies")?,
            analysis_context: resp.analysis_context,
        })
    }

    pub async fn select_strategy(&self, strategy_type: &str) -> DemoResult<Strategy> {
        let body = SelectRequest { strategy_type };
        let resp: SelectResponse = self.post("api/select-strategy", &body).await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.strategy, "strategy")
    }

    pub async fn execute_strategy(&self) -> DemoResult<ExecutionReport> {
        let resp: ExecuteResponse = self
            .post("api/execute-strategy", &serde_json::json!({}))
            .await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.execution, "execution")
    }

    pub async fn generate_portfolio(&self, kind: PortfolioKind) -> DemoResult<FundPortfolio> {
        let body = GeneratePortfolioRequest { fund_type: kind.wire_name() };
        let resp: PortfolioResponse = self.post("api/generate-portfolio", &body).await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.portfolio, "portfolio")
    }

    pub async fn create_custom_portfolio(
        &self,
        positions: &[CustomPosition],
    ) -> DemoResult<FundPortfolio> {
        let body = CustomPortfolioRequest { positions };
        let resp: PortfolioResponse = self.post("api/create-custom-portfolio", &body).await?;
        check_success(resp.success, resp.error, resp.error_type)?;
        required(resp.portfolio, "portfolio")
    }
}

fn check_success(
    success: bool,
    error: Option<String>,
    error_type: Option<String>,
) -> DemoResult<()> {
    if success {
        return Ok(());
    }
    Err(DemoError::backend(
        error.unwrap_or_else(|| "backend reported failure".to_string()),
        error_type,
    ))
}

fn required<T>(field: Option<T>, name: &str) -> DemoResult<T> {
    field.ok_or_else(|| DemoError::Malformed(format!("missing `{name}` in response")))
}
