//! Deterministic defaults for model output that cannot be used as-is.
//!
//! A parse miss never fails a generation call. Each missing report field is
//! replaced on its own; onboarding output that is not a JSON array is
//! replaced as a whole.

use serde::{Deserialize, Serialize};

use crate::parse::{self, FoundSections, ReportField, SectionParse};

pub const SUMMARY_FALLBACK: &str = "Summary not available";
pub const RISKS_FALLBACK: &str = "No significant risks identified at this time";
pub const NEXT_STEPS_FALLBACK: &str = "Next steps to be determined";

pub const DEFAULT_ONBOARDING_TASKS: [&str; 5] = [
    "Kickoff meeting scheduled",
    "Access credentials provided",
    "Brand assets collected",
    "Project goals documented",
    "Communication channels set up",
];

pub fn default_onboarding_tasks() -> Vec<String> {
    DEFAULT_ONBOARDING_TASKS.iter().map(|t| t.to_string()).collect()
}

/// A report draft split into its three sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub summary: String,
    pub risks: String,
    pub next_steps: String,
}

/// A value recovered from model text, plus which parts were defaulted and,
/// when the parser could say, why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub fallbacks: Vec<&'static str>,
    pub cause: Option<String>,
}

impl<T> Resolved<T> {
    fn parsed(value: T) -> Self {
        Self {
            value,
            fallbacks: Vec::new(),
            cause: None,
        }
    }

    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Fill every section the parse did not find. `raw` is the full model text,
/// used for the summary default.
pub fn resolve_report(parse: SectionParse, raw: &str) -> Resolved<StructuredReport> {
    let found = match parse {
        SectionParse::FullyParsed {
            summary,
            risks,
            next_steps,
        } => {
            return Resolved::parsed(StructuredReport {
                summary,
                risks,
                next_steps,
            });
        }
        SectionParse::PartiallyParsed { found } => found,
        SectionParse::Unparsed => FoundSections::default(),
    };

    let fallbacks = found.missing_fields().iter().map(ReportField::as_str).collect();
    let FoundSections {
        summary,
        risks,
        next_steps,
    } = found;

    let summary = summary.unwrap_or_else(|| {
        parse::leading_paragraph(raw)
            .unwrap_or(SUMMARY_FALLBACK)
            .to_string()
    });

    Resolved {
        value: StructuredReport {
            summary,
            risks: risks.unwrap_or_else(|| RISKS_FALLBACK.to_string()),
            next_steps: next_steps.unwrap_or_else(|| NEXT_STEPS_FALLBACK.to_string()),
        },
        fallbacks,
        cause: None,
    }
}

/// Segment and resolve in one step.
pub fn report_from_text(raw: &str) -> Resolved<StructuredReport> {
    resolve_report(parse::segment_report(raw), raw)
}

/// The model's task list, or the fixed default list when it is not a JSON
/// array.
pub fn onboarding_tasks_from_text(raw: &str) -> Resolved<Vec<String>> {
    match parse::parse_task_list(raw) {
        Ok(tasks) => Resolved::parsed(tasks),
        Err(miss) => Resolved {
            value: default_onboarding_tasks(),
            fallbacks: vec!["tasks"],
            cause: Some(miss.to_string()),
        },
    }
}
