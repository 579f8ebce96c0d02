use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canned institutional portfolio profiles the backend knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioKind {
    SmallFund,
    MidCapFund,
    LargeFund,
}

impl PortfolioKind {
    /// Wire name sent in `type` / `fund_type` request fields
    pub fn wire_name(self) -> &'static str {
        match self {
            PortfolioKind::SmallFund => "small_fund",
            PortfolioKind::MidCapFund => "mid_cap_fund",
            PortfolioKind::LargeFund => "large_fund",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "small" | "small_fund" => Some(PortfolioKind::SmallFund),
            "mid" | "midcap" | "mid_cap" | "mid_cap_fund" => Some(PortfolioKind::MidCapFund),
            "large" | "large_fund" => Some(PortfolioKind::LargeFund),
            _ => None,
        }
    }
}

impl std::fmt::Display for PortfolioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioKind::SmallFund => write!(f, "Small Fund"),
            PortfolioKind::MidCapFund => write!(f, "Mid-Cap Fund"),
            PortfolioKind::LargeFund => write!(f, "Large Fund"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "long" | "l" => Some(PositionSide::Long),
            "short" | "s" => Some(PositionSide::Short),
            _ => None,
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Long => write!(f, "Long"),
            PositionSide::Short => write!(f, "Short"),
        }
    }
}

/// One leg of a custom-built book sent to /api/create-custom-portfolio
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomPosition {
    pub position_type: PositionSide,
    pub btc_amount: Decimal,
}

/// Console command driving the demo workflow.
/// One command per line: "analyze small", "custom 25 long", "select collar", ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoCommand {
    Analyze(PortfolioKind),
    Custom { size: Decimal, side: PositionSide },
    Portfolio(PortfolioKind),
    Build(Vec<CustomPosition>),
    Strategies,
    Select(String),
    Execute,
    Market,
    Exposure,
    Status,
    Reset,
    Help,
    Quit,
}

impl DemoCommand {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut words = raw.split_whitespace();
        let head = words.next()?.to_lowercase();

        match head.as_str() {
            "analyze" | "a" => {
                let kind = PortfolioKind::parse(words.next()?)?;
                Some(Self::Analyze(kind))
            }
            "custom" => {
                // "custom <btc-size> <long|short>" — size validation
                // (> 0) happens in the controller, not here
                let size = Decimal::from_str(words.next()?).ok()?;
                let side = PositionSide::parse(words.next()?)?;
                Some(Self::Custom { size, side })
            }
            "portfolio" => {
                let kind = PortfolioKind::parse(words.next()?)?;
                Some(Self::Portfolio(kind))
            }
            "build" => {
                // "build 25 long 10 short ..." — size/side pairs
                let mut positions = Vec::new();
                loop {
                    let Some(size_word) = words.next() else { break };
                    let btc_amount = Decimal::from_str(size_word).ok()?;
                    let position_type = PositionSide::parse(words.next()?)?;
                    positions.push(CustomPosition { position_type, btc_amount });
                }
                if positions.is_empty() {
                    return None;
                }
                Some(Self::Build(positions))
            }
            "strategies" | "g" => Some(Self::Strategies),
            "select" => Some(Self::Select(words.next()?.to_string())),
            "execute" | "x" => Some(Self::Execute),
            "market" | "m" => Some(Self::Market),
            "exposure" | "e" => Some(Self::Exposure),
            "status" | "st" => Some(Self::Status),
            "reset" | "r" => Some(Self::Reset),
            "help" | "h" | "?" => Some(Self::Help),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}
