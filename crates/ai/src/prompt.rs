//! Prompt construction.
//!
//! Every builder here is a pure function of its input: same input, same
//! transcript. Optional fields render as a labeled line only when present
//! (a zero proposal fee counts as absent), and fees are rendered from cents
//! only inside the text.

use serde::{Deserialize, Serialize};

use agencyos_core::Cents;

use crate::context::TenantSnapshot;
use crate::request::{OnboardingInput, ProposalInput, ReportInput};

/// Fixed proposal outline, always requested in this order.
pub const PROPOSAL_OUTLINE: [&str; 8] = [
    "Executive Summary",
    "Understanding Your Needs",
    "Our Approach & Methodology",
    "Scope of Work & Deliverables",
    "Timeline & Milestones",
    "Investment & Terms",
    "Why Choose Us",
    "Next Steps",
];

/// Prior conversation entries kept for an assistant turn.
pub const MAX_HISTORY_ENTRIES: usize = 10;

const PROPOSAL_SYSTEM: &str = "You are an expert business proposal writer for a digital agency.
Your task is to create professional, persuasive, and well-structured proposals that win clients.
Use a professional yet approachable tone. Focus on value, outcomes, and clear deliverables.";

const REPORT_SYSTEM: &str = "You are an expert client success manager for a digital agency.
Your task is to create clear, honest, and actionable client reports that build trust and demonstrate value.
Be specific, data-driven, and proactive in identifying risks and opportunities.";

const ONBOARDING_SYSTEM: &str = "You are an expert project manager for a digital agency.
Generate a practical onboarding checklist for new client engagements.";

const REPORT_SECTIONS: &str = "1. **SUMMARY** (2-3 paragraphs):
   - Overview of work completed this period
   - Key achievements and milestones
   - Overall progress assessment

2. **RISKS & CONCERNS** (bullet points):
   - Any blockers or challenges
   - Resource constraints
   - Timeline concerns
   - Budget considerations
   - If none, state \"No significant risks identified at this time\"

3. **NEXT STEPS** (bullet points):
   - Specific actions planned for next period
   - Upcoming milestones
   - Client action items (if any)
   - Timeline for deliverables";

const ASSISTANT_ROLE: &str = "Your role:
- Answer questions about their business metrics, clients, and engagements
- Provide insights and recommendations
- Help them prioritize work and identify opportunities
- Be concise, helpful, and data-driven
- Use markdown formatting for better readability
- When showing lists or data, use tables or bullet points";

const ASSISTANT_LIMITS: &str = "If the user asks about specific clients or engagements, reference the data above.
If you don't have enough information to answer accurately, say so and suggest what data would help.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Speaker of a prior conversation entry. System instructions are built
/// here, never accepted from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

impl From<HistoryRole> for Role {
    fn from(role: HistoryRole) -> Self {
        match role {
            HistoryRole::User => Self::User,
            HistoryRole::Assistant => Self::Assistant,
        }
    }
}

/// One prior turn of an assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&HistoryEntry> for PromptMessage {
    fn from(entry: &HistoryEntry) -> Self {
        Self::new(entry.role.into(), entry.content.clone())
    }
}

/// Ordered messages for one model call. Order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTranscript {
    messages: Vec<PromptMessage>,
}

impl PromptTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: PromptMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[PromptMessage] {
        &self.messages
    }

    /// Conversation entries after the leading system instructions.
    pub fn turns(&self) -> &[PromptMessage] {
        let start = self
            .messages
            .iter()
            .position(|m| m.role != Role::System)
            .unwrap_or(self.messages.len());
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<PromptMessage> for PromptTranscript {
    fn from_iter<I: IntoIterator<Item = PromptMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

/// Paragraph blocks joined by one blank line. Empty blocks vanish, so an
/// absent optional field never leaves an empty line behind.
#[derive(Default)]
struct Blocks(Vec<String>);

impl Blocks {
    fn text(&mut self, block: impl Into<String>) -> &mut Self {
        let block = block.into();
        if !block.is_empty() {
            self.0.push(block);
        }
        self
    }

    fn lines<I>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let lines: Vec<String> = lines.into_iter().flatten().collect();
        self.text(lines.join("\n"))
    }

    fn render(&self) -> String {
        self.0.join("\n\n")
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn two_turns(system: &str, user: String) -> PromptTranscript {
    [PromptMessage::system(system), PromptMessage::user(user)]
        .into_iter()
        .collect()
}

pub fn proposal_transcript(input: &ProposalInput) -> PromptTranscript {
    let client = &input.client;
    let outline: Vec<String> = PROPOSAL_OUTLINE
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {section}", i + 1))
        .collect();

    let mut b = Blocks::default();
    b.text("Create a comprehensive business proposal with the following details:")
        .text(format!("**Proposal Title:** {}", input.title))
        .lines([
            Some("**Client Information:**".to_string()),
            Some(format!("- Company: {}", client.name)),
            present(&client.industry).map(|v| format!("- Industry: {v}")),
            present(&client.website).map(|v| format!("- Website: {v}")),
        ])
        .lines([
            present(&input.service_tier).map(|v| format!("**Service Tier:** {v}")),
            input
                .fee
                .filter(|fee| *fee != Cents::ZERO)
                .map(|fee| format!("**Proposed Investment:** {fee}/month")),
        ])
        .lines([present(&input.brief).map(|v| format!("**Project Brief:**\n{v}"))])
        .text(format!(
            "Please structure the proposal with the following sections:\n{}",
            outline.join("\n")
        ))
        .text("Make it compelling, specific to the client's industry, and focused on delivering measurable value.");

    two_turns(PROPOSAL_SYSTEM, b.render())
}

pub fn report_transcript(input: &ReportInput) -> PromptTranscript {
    let client = &input.client;
    let terms = &input.engagement;

    let completed = (!input.completed_tasks.is_empty()).then(|| {
        let tasks: Vec<String> = input.completed_tasks.iter().map(|t| format!("- {t}")).collect();
        format!("**Completed Tasks:**\n{}", tasks.join("\n"))
    });
    let activity = (!input.recent_activity.is_empty())
        .then(|| format!("**Recent Activity:**\n{}", input.recent_activity.join("\n")));

    let mut b = Blocks::default();
    b.text("Create a comprehensive client report with the following context:")
        .lines([
            Some(format!("**Client:** {}", client.name)),
            present(&client.industry).map(|v| format!("**Industry:** {v}")),
        ])
        .text(format!(
            "**Engagement Details:**\n- Service Tier: {}\n- Monthly Investment: {}\n- Start Date: {}",
            terms.service_tier,
            terms.fee,
            terms.start_date.format("%-m/%-d/%Y")
        ))
        .lines([completed])
        .lines([activity])
        .text("Please provide:")
        .text(REPORT_SECTIONS)
        .text("Be honest, specific, and actionable. Focus on value delivered and clear next steps.");

    two_turns(REPORT_SYSTEM, b.render())
}

pub fn onboarding_transcript(input: &OnboardingInput) -> PromptTranscript {
    let mut b = Blocks::default();
    b.lines([
        Some("Generate 5-7 specific onboarding tasks for a new client engagement:".to_string()),
        Some(format!("- Service Tier: {}", input.service_tier)),
        present(&input.client_industry).map(|v| format!("- Client Industry: {v}")),
    ])
    .text("Return ONLY a JSON array of task strings, no other text.\nExample: [\"Task 1\", \"Task 2\", \"Task 3\"]");

    two_turns(ONBOARDING_SYSTEM, b.render())
}

/// System instruction for the assistant: the tenant's business state plus
/// fixed role framing.
pub fn assistant_context(snapshot: &TenantSnapshot) -> String {
    let m = snapshot.metrics();
    let clients = snapshot.client_list();
    let engagements = snapshot.active_engagement_list();

    let mut client_block = vec![format!(
        "**Clients:** {} total ({} active)",
        m.total_clients, m.active_clients
    )];
    client_block.extend(clients.lines());

    let mut engagement_block = vec![
        format!(
            "**Engagements:** {} total ({} active)",
            m.total_engagements, m.active_engagements
        ),
        format!(
            "**Monthly Recurring Revenue (MRR):** {}",
            m.monthly_recurring_revenue
        ),
    ];
    engagement_block.extend(engagements.lines());

    let mut b = Blocks::default();
    b.text("You are an AI assistant for Agency OS, helping agency owners manage their business.")
        .text("You have access to the following data about the user's agency:")
        .text(client_block.join("\n"))
        .text(engagement_block.join("\n"))
        .text(format!(
            "**Proposals:** {} total ({} pending)",
            m.total_proposals, m.pending_proposals
        ))
        .text(format!("**Reports:** {} total", m.total_reports))
        .text(format!(
            "**Engagements in Onboarding:** {}",
            m.onboarding_engagements
        ))
        .text(ASSISTANT_ROLE)
        .text(ASSISTANT_LIMITS);
    b.render()
}

/// Assistant transcript: context, the last [`MAX_HISTORY_ENTRIES`] prior
/// turns in their original order, then the new message.
pub fn chat_transcript(
    snapshot: &TenantSnapshot,
    message: &str,
    history: &[HistoryEntry],
) -> PromptTranscript {
    let keep_from = history.len().saturating_sub(MAX_HISTORY_ENTRIES);

    let mut transcript = PromptTranscript::new();
    transcript.push(PromptMessage::system(assistant_context(snapshot)));
    for entry in &history[keep_from..] {
        transcript.push(entry.into());
    }
    transcript.push(PromptMessage::user(message));
    transcript
}
