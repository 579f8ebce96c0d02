use crate::api::{ExecutionReport, PortfolioAnalysis, Strategy};
use crate::error::{DemoError, DemoResult};

/// The four-stage demo workflow. Each variant carries only the data valid
/// at that stage, so nothing downstream can read an unset field.
///
/// Linear, no backward transitions except `reset`.
#[derive(Debug, Clone)]
pub enum WorkflowState {
    Intake,
    Analyzed {
        analysis: PortfolioAnalysis,
    },
    StrategiesShown {
        analysis: PortfolioAnalysis,
        strategies: Vec<Strategy>,
        /// Committed choice, set by select; kept here so a failed execution
        /// can be re-triggered without re-selecting.
        selected: Option<Strategy>,
    },
    Executed {
        strategy: Strategy,
        execution: ExecutionReport,
    },
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Intake
    }
}

impl WorkflowState {
    /// Workflow position, 1–4 — equals the number of completed stages
    pub fn step(&self) -> u8 {
        match self {
            Self::Intake => 1,
            Self::Analyzed { .. } => 2,
            Self::StrategiesShown { .. } => 3,
            Self::Executed { .. } => 4,
        }
    }

    pub fn stage_name(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Analyzed { .. } => "analyzed",
            Self::StrategiesShown { .. } => "strategies shown",
            Self::Executed { .. } => "executed",
        }
    }

    pub fn analysis(&self) -> Option<&PortfolioAnalysis> {
        match self {
            Self::Analyzed { analysis } | Self::StrategiesShown { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    pub fn strategies(&self) -> Option<&[Strategy]> {
        match self {
            Self::StrategiesShown { strategies, .. } => Some(strategies.as_slice()),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&Strategy> {
        match self {
            Self::StrategiesShown { selected, .. } => selected.as_ref(),
            Self::Executed { strategy, .. } => Some(strategy),
            _ => None,
        }
    }

    /// Selection still awaiting execution — None once executed
    pub fn pending_selection(&self) -> Option<&Strategy> {
        match self {
            Self::StrategiesShown { selected, .. } => selected.as_ref(),
            _ => None,
        }
    }

    pub fn execution(&self) -> Option<&ExecutionReport> {
        match self {
            Self::Executed { execution, .. } => Some(execution),
            _ => None,
        }
    }

    /// Step 1 → 2. Also valid from steps 2 and 3: re-analyzing just
    /// replaces the analysis and drops any strategies on display.
    pub fn analyzed(&mut self, analysis: PortfolioAnalysis) -> DemoResult<()> {
        match self {
            Self::Executed { .. } => Err(DemoError::validation(
                "strategy already executed — reset to start a new analysis",
            )),
            _ => {
                *self = Self::Analyzed { analysis };
                Ok(())
            }
        }
    }

    /// Step 2 → 3. Re-running from step 3 replaces the menu and drops any
    /// committed selection.
    pub fn strategies_shown(&mut self, strategies: Vec<Strategy>) -> DemoResult<()> {
        match self {
            Self::Analyzed { analysis } | Self::StrategiesShown { analysis, .. } => {
                if strategies.is_empty() {
                    return Err(DemoError::validation("backend returned no strategies"));
                }
                *self = Self::StrategiesShown {
                    analysis: analysis.clone(),
                    strategies,
                    selected: None,
                };
                Ok(())
            }
            _ => Err(DemoError::validation(
                "no portfolio analysis yet — run analyze first",
            )),
        }
    }

    /// The selected strategy must be one of the strategies on display
    pub fn find_strategy(&self, strategy_type: &str) -> DemoResult<&Strategy> {
        let strategies = self.strategies().ok_or_else(|| {
            DemoError::validation("no strategies generated yet — run strategies first")
        })?;
        strategies
            .iter()
            .find(|s| s.strategy_name == strategy_type)
            .ok_or_else(|| {
                DemoError::validation(format!(
                    "unknown strategy `{strategy_type}` — not in the generated list"
                ))
            })
    }

    /// Commit to one of the displayed strategies; stays at step 3
    pub fn select(&mut self, strategy: Strategy) -> DemoResult<()> {
        match self {
            Self::StrategiesShown { selected, .. } => {
                *selected = Some(strategy);
                Ok(())
            }
            _ => Err(DemoError::validation(
                "no strategies generated yet — run strategies first",
            )),
        }
    }

    /// Step 3 → 4. Requires a prior select.
    pub fn executed(&mut self, execution: ExecutionReport) -> DemoResult<()> {
        match self {
            Self::StrategiesShown { selected: Some(strategy), .. } => {
                *self = Self::Executed {
                    strategy: strategy.clone(),
                    execution,
                };
                Ok(())
            }
            Self::StrategiesShown { selected: None, .. } => Err(DemoError::validation(
                "no strategy selected yet — run select first",
            )),
            _ => Err(DemoError::validation(
                "no strategies generated yet — run strategies first",
            )),
        }
    }

    /// The only backward transition — back to intake from anywhere
    pub fn reset(&mut self) {
        *self = Self::Intake;
    }
}
