//! The StudySync agent definition: identity, persona and generation settings

use crate::{
    protocol::{AgentCard, AgentSkill},
    tools::ToolSet,
};

/// Name the agent is served under
pub const AGENT_NAME: &str = "studySyncAgent";

const DESCRIPTION: &str = "StudySync, your AI study accountability partner";

const INSTRUCTIONS: &str = r#"You are **StudySync**, a deeply conversational AI study accountability partner.
You blend empathy, motivation, and practical strategy to help learners stay consistent and proud of their progress.

Core personality:
- Speak like a human: warm, friendly, encouraging, slightly witty when appropriate.
- You're a study coach and a friend. Supportive, never robotic.
- Adjust tone: relaxed when chatting, focused when setting goals, empathetic when the user feels tired or stressed.

How to interact:
1. Greet the user by name if known.
2. Recognize their emotions before responding.
3. Help break study goals into manageable actions.
4. Celebrate wins and consistency.
5. Gently bring them back to focus if they go off-topic.

Tools:
- Use create-study-schedule when the learner asks for a plan or timetable.
- Use assess-progress when they rate their confidence in a subject.
- Use log-study-session when they report time spent studying.
- Use analyze-mood, set-goal and check-progress to stay in tune with them.

Boundaries:
- Never sound formal or stiff.
- Keep responses short, natural, and friendly.
- Always return to learning, consistency, or reflection.

Your mission: make studying feel empowering, not exhausting."#;

/// Identity and generation settings of the hosted agent
#[derive(Debug, Clone, PartialEq)]
pub struct StudySyncAgent {
    /// Agent identifier used in the route path
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// System instructions given to the model
    pub instructions: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Maximum tokens in one reply
    pub max_output_tokens: u32,
}

impl StudySyncAgent {
    /// Create the agent with the default persona under a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Path of the agent's JSON-RPC endpoint
    pub fn endpoint_path(&self) -> String {
        format!("/a2a/agent/{}", self.name)
    }

    /// Build the agent card advertised at `/.well-known/agent-card.json`
    pub fn card(&self, base_url: &str, tools: &ToolSet) -> AgentCard {
        let url = format!("{}{}", base_url.trim_end_matches('/'), self.endpoint_path());
        tools.iter().fold(
            AgentCard::new(&self.name, &self.description, url),
            |card, tool| {
                card.with_skill(AgentSkill::new(
                    tool.name(),
                    tool.name().replace('-', " "),
                    tool.description(),
                ))
            },
        )
    }
}

impl Default for StudySyncAgent {
    fn default() -> Self {
        Self {
            name: AGENT_NAME.to_string(),
            description: DESCRIPTION.to_string(),
            instructions: INSTRUCTIONS.to_string(),
            temperature: 0.9,
            top_p: 0.95,
            max_output_tokens: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_agent() {
        let agent = StudySyncAgent::default();
        assert_eq!(agent.name, "studySyncAgent");
        assert_eq!(agent.endpoint_path(), "/a2a/agent/studySyncAgent");
        assert!(agent.instructions.contains("StudySync"));
    }

    #[test]
    fn test_card_lists_tools() {
        let agent = StudySyncAgent::named("coach");
        let card = agent.card("http://localhost:4111/", &ToolSet::standard());

        assert_eq!(card.name, "coach");
        assert_eq!(card.url, "http://localhost:4111/a2a/agent/coach");
        assert_eq!(card.skills.len(), 6);
        assert_eq!(card.skills[0].id, "log-study-session");
        assert_eq!(card.skills[0].name, "log study session");
    }
}
