//! Canned message generation.
//!
//! Stands in for a real language model: every archetype owns four fixed
//! templates and the caller-supplied turn counter picks one of them.

use super::{Agent, AgentType, Room};

/// Produces the content an agent says on its turn.
pub trait MessageGenerator: Send + Sync {
    fn generate(&self, agent: &Agent, room: &Room, counter: u64) -> String;
}

const ECONOMIST_TEMPLATES: [&str; 4] = [
    "Based on recent inflation data, I expect the Fed to maintain higher rates longer than the market anticipates.",
    "The yield curve inversion is deepening, historically a strong recession indicator.",
    "Consumer sentiment is improving, which could lead to increased spending in the next quarter.",
    "The labor market remains resilient despite tightening monetary policy.",
];

const TRADER_TEMPLATES: [&str; 4] = [
    "Technical indicators suggest a potential breakout for tech stocks this week.",
    "Volume is unusually low today, suggesting caution before the upcoming earnings.",
    "I'm seeing significant options activity in the energy sector.",
    "The market seems to be ignoring the positive earnings surprises this quarter.",
];

const PORTFOLIO_MANAGER_TEMPLATES: [&str; 4] = [
    "I recommend increasing our allocation to defensive sectors given the current volatility.",
    "Our portfolio duration may be too long considering the interest rate outlook.",
    "We should consider hedging our foreign currency exposure more aggressively.",
    "The risk-reward profile for small caps looks attractive at current valuations.",
];

const RESEARCH_ANALYST_TEMPLATES: [&str; 4] = [
    "My analysis of the latest earnings report shows stronger margins than expected.",
    "The company's new product line could be a significant growth driver not yet priced in.",
    "Regulatory headwinds in this sector are being overestimated by the market.",
    "Supply chain improvements should benefit Q3 earnings for manufacturing firms.",
];

const RISK_MANAGER_TEMPLATES: [&str; 4] = [
    "Our exposure to the banking sector is approaching our internal risk limits.",
    "Geopolitical tensions are creating tail risks we need to hedge against.",
    "Liquidity in certain positions has deteriorated, suggesting we reduce position sizes.",
    "Stress tests indicate our portfolio would underperform in a stagflation scenario.",
];

/// The fixed template table of an archetype
pub fn templates(agent_type: AgentType) -> &'static [&'static str] {
    match agent_type {
        AgentType::Economist => &ECONOMIST_TEMPLATES,
        AgentType::Trader => &TRADER_TEMPLATES,
        AgentType::PortfolioManager => &PORTFOLIO_MANAGER_TEMPLATES,
        AgentType::ResearchAnalyst => &RESEARCH_ANALYST_TEMPLATES,
        AgentType::RiskManager => &RISK_MANAGER_TEMPLATES,
    }
}

/// `templates(agent_type)[counter mod len]`
pub fn select_template(agent_type: AgentType, counter: u64) -> &'static str {
    let table = templates(agent_type);
    let index = (counter % table.len() as u64) as usize;
    table[index]
}

/// Template-table generator; ignores the room context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateMessageGenerator;

impl MessageGenerator for TemplateMessageGenerator {
    fn generate(&self, agent: &Agent, _room: &Room, counter: u64) -> String {
        select_template(agent.agent_type, counter).to_string()
    }
}
