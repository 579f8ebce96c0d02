mod demo_tests;
mod render_tests;

use rust_decimal_macros::dec;

use crate::api::{
    ExecutionReport, ExecutionSummary, FundProfile, HedgeRecommendation, MarketData,
    PlatformExposure, PortfolioAnalysis, PortfolioImpact, RiskMetrics, Strategy,
    StrategyPricing, LIVE_DATA_SOURCE,
};

pub fn sample_market(status: Option<&str>, data_source: Option<&str>) -> MarketData {
    MarketData {
        btc_price: dec!(65000),
        volatility: dec!(62),
        risk_free_rate: dec!(4.3),
        status: status.map(str::to_string),
        data_source: data_source.map(str::to_string),
    }
}

pub fn live_market() -> MarketData {
    sample_market(Some("live"), Some(LIVE_DATA_SOURCE))
}

pub fn sample_analysis() -> PortfolioAnalysis {
    PortfolioAnalysis {
        profile: FundProfile {
            fund_type: "Institutional Fund (Small Fund)".to_string(),
            aum: dec!(38000000),
            total_btc_size: dec!(17.65),
            net_btc_exposure: dec!(17.65),
            total_current_value: dec!(2000000),
            total_pnl: dec!(100000),
            current_btc_price: dec!(113000),
        },
        positions: vec![],
        risk_metrics: RiskMetrics {
            var_95: dec!(320000),
            var_99: Some(dec!(455000)),
            annualized_volatility: dec!(62),
            max_drawdown: None,
        },
        scenarios: vec![],
        hedge_recommendation: HedgeRecommendation {
            recommended_strategy: "protective_put".to_string(),
            hedge_ratio: dec!(0.8),
            target_exposure_btc: dec!(14.12),
            rationale: "protect long exposure against drawdown".to_string(),
        },
        data_source: Some(LIVE_DATA_SOURCE.to_string()),
    }
}

pub fn sample_strategy(name: &str) -> Strategy {
    Strategy {
        strategy_name: name.to_string(),
        display_name: format!("{name} (demo)"),
        priority: "high".to_string(),
        rationale: "protect 17.7 BTC long position".to_string(),
        pricing: StrategyPricing {
            btc_spot_price: dec!(113000),
            contracts_needed: dec!(17.65),
            strike_price: dec!(107350),
            premium_per_contract: dec!(2150),
            total_premium: dec!(37947.5),
            implied_volatility: dec!(62),
            days_to_expiry: 14,
            expiry_date: "2026-09-13".to_string(),
            option_type: "European Put Options".to_string(),
            cost_as_pct: dec!(1.9),
        },
    }
}

pub fn sample_exposure() -> PlatformExposure {
    PlatformExposure {
        total_client_long_btc: dec!(120.5),
        total_platform_hedges_btc: dec!(96.4),
        net_exposure_btc: dec!(24.1),
        hedge_coverage_ratio: dec!(0.8),
    }
}

pub fn sample_execution() -> ExecutionReport {
    ExecutionReport {
        execution_summary: ExecutionSummary {
            contracts_filled: dec!(12.345),
            avg_fill_price: Some(dec!(2150)),
            total_premium_usd: Some(dec!(26541.75)),
            execution_time_ms: Some(18),
            status: "executed".to_string(),
            venues: vec![],
        },
        portfolio_impact: PortfolioImpact {
            hedge_coverage_ratio: dec!(0.8),
            protected_value_usd: dec!(1600000),
            residual_delta_btc: Some(dec!(3.53)),
        },
        platform_exposure: sample_exposure(),
    }
}
