use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

use crate::api::{ExecutionReport, PlatformExposure, PortfolioAnalysis, Strategy};
use crate::error::DemoError;
use crate::state::MarketFeed;

/// `$65,000` — whole dollars, thousands separators
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let grouped = group_thousands(&rounded.abs().to_string());
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `62%`, keeping one decimal only when fractional (`62.5%`)
pub fn format_pct(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{rounded}%")
}

/// Two-decimal contract display: 12.345 → `12.35 BTC`
pub fn format_btc(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{rounded} BTC")
}

/// Whole-contract display: 12.345 → `12 BTC`
pub fn format_btc_whole(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded} BTC")
}

pub fn format_contracts(amount: Decimal, round_whole: bool) -> String {
    if round_whole {
        format_btc_whole(amount)
    } else {
        format_btc(amount)
    }
}

/// Error banner text; backend discriminators tag the message
pub fn format_error(err: &DemoError) -> String {
    match err {
        DemoError::Backend { message, error_type: Some(kind) } => {
            format!("{message} [{kind}]")
        }
        other => other.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

// ── Console views ───────────────────────────────────────────────────────────

pub fn render_market(feed: &MarketFeed) -> String {
    match feed {
        MarketFeed::Waiting => "market: waiting for first poll...".to_string(),
        MarketFeed::Unavailable { error } => {
            format!("market: UNAVAILABLE — {error}")
        }
        MarketFeed::Live(data) => {
            let live = if data.is_live() { "live" } else { "stale" };
            format!(
                "BTC {} | vol {} | rf {} | {live}",
                format_usd(data.btc_price),
                format_pct(data.volatility),
                format_pct(data.risk_free_rate),
            )
        }
    }
}

pub fn render_exposure(exposure: Option<&PlatformExposure>) -> String {
    match exposure {
        None => "exposure: no snapshot yet".to_string(),
        Some(e) => format!(
            "client long {} | platform hedges {} | net {} | coverage {}",
            format_btc(e.total_client_long_btc),
            format_btc(e.total_platform_hedges_btc),
            format_btc(e.net_exposure_btc),
            format_pct(e.hedge_coverage_ratio * Decimal::from(100)),
        ),
    }
}

pub fn render_analysis(analysis: &PortfolioAnalysis) -> String {
    let p = &analysis.profile;
    let r = &analysis.risk_metrics;
    let h = &analysis.hedge_recommendation;

    let mut out = String::new();
    let _ = writeln!(out, "── portfolio analysis ──");
    let _ = writeln!(
        out,
        "{} | AUM {} | {} net BTC @ {}",
        p.fund_type,
        format_usd(p.aum),
        format_btc(p.net_btc_exposure),
        format_usd(p.current_btc_price),
    );
    let _ = writeln!(
        out,
        "value {} | pnl {}",
        format_usd(p.total_current_value),
        format_usd(p.total_pnl),
    );
    for pos in &analysis.positions {
        let entry = pos
            .entry_price
            .map(|p| format!(" entry {}", format_usd(p)))
            .unwrap_or_default();
        let value = pos
            .current_value
            .map(|v| format!(" now {}", format_usd(v)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} {}{entry}{value}",
            pos.position_type,
            format_btc(pos.btc_amount),
        );
    }
    let _ = writeln!(
        out,
        "risk: VaR95 {} | vol {}",
        format_usd(r.var_95),
        format_pct(r.annualized_volatility),
    );
    if let Some(var_99) = r.var_99 {
        let _ = writeln!(out, "      VaR99 {}", format_usd(var_99));
    }
    if let Some(drawdown) = r.max_drawdown {
        let _ = writeln!(out, "      max drawdown {}", format_pct(drawdown));
    }
    for s in &analysis.scenarios {
        let hedged = s
            .hedged_impact_usd
            .map(|h| format!(" (hedged {})", format_usd(h)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}: BTC {} → impact {}{hedged}",
            s.scenario,
            format_pct(s.btc_price_change_pct),
            format_usd(s.portfolio_impact_usd),
        );
    }
    let _ = writeln!(
        out,
        "recommended: {} (hedge ratio {}) — {}",
        h.recommended_strategy,
        format_pct(h.hedge_ratio * Decimal::from(100)),
        h.rationale,
    );
    out
}

pub fn render_strategies(strategies: &[Strategy], round_contracts: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── hedge strategies ──");
    for s in strategies {
        let pr = &s.pricing;
        let _ = writeln!(
            out,
            "[{}] {} ({})",
            s.strategy_name, s.display_name, s.priority
        );
        let _ = writeln!(
            out,
            "    {} x {} strike {} | premium {} ({} of book) | expires {} ({}d)",
            format_contracts(pr.contracts_needed, round_contracts),
            pr.option_type,
            format_usd(pr.strike_price),
            format_usd(pr.total_premium),
            format_pct(pr.cost_as_pct),
            pr.expiry_date,
            pr.days_to_expiry,
        );
        let _ = writeln!(out, "    {}", s.rationale);
    }
    out
}

pub fn render_execution(report: &ExecutionReport, round_contracts: bool) -> String {
    let s = &report.execution_summary;
    let i = &report.portfolio_impact;

    let mut out = String::new();
    let _ = writeln!(out, "── execution ──");
    let elapsed = s
        .execution_time_ms
        .map(|ms| format!(" in {ms}ms"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "status {} | filled {}{elapsed}",
        s.status,
        format_contracts(s.contracts_filled, round_contracts),
    );
    if let Some(premium) = s.total_premium_usd {
        let avg = s
            .avg_fill_price
            .map(|p| format!(" (avg {})", format_usd(p)))
            .unwrap_or_default();
        let _ = writeln!(out, "premium {}{avg}", format_usd(premium));
    }
    for fill in &s.venues {
        let price = fill
            .price
            .map(|p| format!(" @ {}", format_usd(p)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} — {}{price}",
            fill.venue,
            format_contracts(fill.contracts, round_contracts),
        );
    }
    let _ = writeln!(
        out,
        "coverage {} | protected {}",
        format_pct(i.hedge_coverage_ratio * Decimal::from(100)),
        format_usd(i.protected_value_usd),
    );
    if let Some(residual) = i.residual_delta_btc {
        let _ = writeln!(out, "residual delta {}", format_btc(residual));
    }
    let _ = write!(out, "{}", render_exposure(Some(&report.platform_exposure)));
    out
}

pub fn help_text() -> &'static str {
    "commands:\n\
     analyze <small|mid|large>      analyze a canned institutional portfolio\n\
     custom <size> <long|short>     analyze a single custom position\n\
     portfolio <small|mid|large>    generate a fund book (alt intake)\n\
     build <size> <long|short> ...  build a custom book (alt intake)\n\
     strategies                     generate hedge strategies\n\
     select <strategy>              select a strategy (auto-executes)\n\
     execute                        re-run execution after a failure\n\
     market / exposure / status     show polled snapshots & workflow step\n\
     reset                          back to intake\n\
     quit                           exit"
}
