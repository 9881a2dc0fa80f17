use serde::{Deserialize, Serialize};

use crate::context::TenantSnapshot;

/// Rule-based nudges computed from a tenant snapshot (no model call).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl Insights {
    /// Recommendations appear in a fixed order: prospects, onboarding,
    /// pending proposals, then active clients without active engagements.
    pub fn from_snapshot(snapshot: &TenantSnapshot) -> Self {
        let m = snapshot.metrics();
        let mut recommendations = Vec::new();

        if m.prospect_clients > 0 {
            recommendations.push(format!(
                "You have {} prospect(s). Consider reaching out to move them forward.",
                m.prospect_clients
            ));
        }

        if m.onboarding_engagements > 0 {
            recommendations.push(format!(
                "{} engagement(s) in onboarding. Focus on completing their setup tasks.",
                m.onboarding_engagements
            ));
        }

        if m.pending_proposals > 0 {
            recommendations.push(format!(
                "{} proposal(s) awaiting response. Follow up with clients.",
                m.pending_proposals
            ));
        }

        if m.active_engagements == 0 && m.active_clients > 0 {
            recommendations.push(
                "You have active clients but no active engagements. Create engagements to track work."
                    .to_string(),
            );
        }

        Self {
            summary: format!(
                "You have {} active client(s) with {} active engagement(s).",
                m.active_clients, m.active_engagements
            ),
            recommendations,
        }
    }
}
