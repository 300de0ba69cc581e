//! Agent archetypes and their static display metadata.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// One of the five fixed agent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    Economist,
    Trader,
    PortfolioManager,
    ResearchAnalyst,
    RiskManager,
}

/// Display metadata shared by every agent of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTypeInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub expertise: &'static [&'static str],
}

const ECONOMIST: AgentTypeInfo = AgentTypeInfo {
    title: "Economist",
    description: "Analyzes economic trends and indicators",
    icon: "mdi-chart-line",
    color: "#60a5fa",
    expertise: &["macroeconomics", "inflation", "economic policy"],
};

const TRADER: AgentTypeInfo = AgentTypeInfo {
    title: "Trader",
    description: "Executes trades and analyzes market movements",
    icon: "mdi-currency-usd",
    color: "#34d399",
    expertise: &["market timing", "technical analysis", "trade execution"],
};

const PORTFOLIO_MANAGER: AgentTypeInfo = AgentTypeInfo {
    title: "Portfolio Manager",
    description: "Optimizes asset allocation and risk management",
    icon: "mdi-briefcase-outline",
    color: "#a78bfa",
    expertise: &[
        "asset allocation",
        "risk management",
        "portfolio construction",
    ],
};

const RESEARCH_ANALYST: AgentTypeInfo = AgentTypeInfo {
    title: "Research Analyst",
    description: "Conducts deep research on specific securities",
    icon: "mdi-magnify",
    color: "#fbbf24",
    expertise: &["financial analysis", "company research", "sector trends"],
};

const RISK_MANAGER: AgentTypeInfo = AgentTypeInfo {
    title: "Risk Manager",
    description: "Monitors and mitigates various types of risks",
    icon: "mdi-shield-outline",
    color: "#f87171",
    expertise: &["risk assessment", "compliance", "scenario analysis"],
};

impl AgentType {
    /// All archetypes in catalog order
    pub const ALL: [AgentType; 5] = [
        AgentType::Economist,
        AgentType::Trader,
        AgentType::PortfolioManager,
        AgentType::ResearchAnalyst,
        AgentType::RiskManager,
    ];

    pub fn info(self) -> &'static AgentTypeInfo {
        match self {
            AgentType::Economist => &ECONOMIST,
            AgentType::Trader => &TRADER,
            AgentType::PortfolioManager => &PORTFOLIO_MANAGER,
            AgentType::ResearchAnalyst => &RESEARCH_ANALYST,
            AgentType::RiskManager => &RISK_MANAGER,
        }
    }

    /// Wire name, identical to the serialized form (e.g. `PORTFOLIO_MANAGER`)
    pub fn as_str(self) -> &'static str {
        match self {
            AgentType::Economist => "ECONOMIST",
            AgentType::Trader => "TRADER",
            AgentType::PortfolioManager => "PORTFOLIO_MANAGER",
            AgentType::ResearchAnalyst => "RESEARCH_ANALYST",
            AgentType::RiskManager => "RISK_MANAGER",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the wire name in any case, with `-` or ` ` in place of `_`
/// (`trader`, `portfolio-manager`, `Risk Manager`).
impl FromStr for AgentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        AgentType::ALL
            .into_iter()
            .find(|agent_type| agent_type.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownAgentType(s.to_string()))
    }
}
