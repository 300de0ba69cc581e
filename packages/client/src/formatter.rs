//! Message formatting utilities for client display.

use chrono::DateTime;

use roundtable_server::infrastructure::dto::http::{AgentDto, MessageDto, RoomDetailDto};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room header shown right after connecting
    ///
    /// History messages are listed in full; their typing animation is never replayed.
    pub fn format_snapshot(room: &RoomDetailDto) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("{} [{}]\n", room.title, room.room_type));
        output.push_str(&format!(
            "Simulation: {}\n",
            if room.active { "running" } else { "paused" }
        ));
        output.push_str(&Self::format_agents(&room.agents));
        output.push_str(&format!("{}\n", RULE));

        for message in &room.conversation {
            output.push_str(&Self::format_message_header(message));
            output.push_str(&message.content);
            output.push('\n');
        }
        output
    }

    /// Format the agent list
    pub fn format_agents(agents: &[AgentDto]) -> String {
        let mut output = String::from("Agents:\n");
        if agents.is_empty() {
            output.push_str("(No agents)\n");
        }
        for agent in agents {
            output.push_str(&format!(
                "  {} [{}] {} - {}\n",
                agent.name,
                agent.agent_type,
                status_marker(&agent.status),
                agent.id
            ));
        }
        output
    }

    /// Header line of a message, followed by the (possibly animated) content
    pub fn format_message_header(message: &MessageDto) -> String {
        format!(
            "\n{}\n@{} ({}) at {}\n",
            THIN_RULE,
            message.agent_name,
            message.agent_type,
            clock_time(&message.timestamp)
        )
    }

    pub fn format_status_change(agent_name: &str, status: &str) -> String {
        match status {
            "thinking" => format!("\n… {} is thinking\n", agent_name),
            "speaking" => format!("\n» {} is speaking\n", agent_name),
            _ => format!("\n· {} is {}\n", agent_name, status),
        }
    }

    pub fn format_simulation_state(active: bool) -> String {
        if active {
            "\n▶ Simulation started\n".to_string()
        } else {
            "\n⏸ Simulation paused\n".to_string()
        }
    }

    pub fn format_room_updated(title: &str, room_type: &str) -> String {
        format!("\n# Room renamed to '{}' [{}]\n", title, room_type)
    }

    pub fn format_room_deleted() -> String {
        "\n✖ This room has been deleted\n".to_string()
    }

    pub fn format_help() -> String {
        [
            "Commands:",
            "  start              start the conversation",
            "  pause              pause the conversation",
            "  add <type>         add an agent (ECONOMIST, TRADER, PORTFOLIO_MANAGER,",
            "                     RESEARCH_ANALYST, RISK_MANAGER)",
            "  remove <agent-id>  remove an agent",
            "  speed <n>          set typing speed in characters per second",
            "  agents             list agents",
            "  quit               exit",
            "",
        ]
        .join("\n")
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

fn status_marker(status: &str) -> &'static str {
    match status {
        "thinking" => "(thinking)",
        "speaking" => "(speaking)",
        _ => "(idle)",
    }
}

/// `HH:MM:SS` of an RFC 3339 timestamp, in the offset it was sent with
fn clock_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
