//! Recovering structure from model text.
//!
//! These functions only describe what was found. Deciding what to do about
//! a miss is the job of [`crate::fallback`].
//!
//! Report segmentation is a heuristic. A heading that opens its own line is
//! preferred over the same words inside prose, and a section runs until the
//! next line-opening heading. If the model words a heading differently (say
//! "Action Items" for next steps), that text is attributed to whichever
//! recognized section precedes it.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Optional line lead-in: markdown heading hashes and/or list numbering.
const LEAD: &str = r"(?:^[ \t]*(?:#{1,6}[ \t]*)?(?:\d+\.[ \t]*)?)?";
/// Optional emphasis around the heading word(s).
const EMPHASIS: &str = r"(?:\*\*|__)?";
/// Closing emphasis and optional colon, in either order.
const CLOSE: &str = r"[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\*\*|__)?";

fn heading(words: &str) -> Option<Regex> {
    Regex::new(&format!("(?im){LEAD}{EMPHASIS}[ \t]*{words}{CLOSE}")).ok()
}

static SUMMARY_HEADING: LazyLock<Option<Regex>> = LazyLock::new(|| heading("SUMMARY"));

static RISKS_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading(r"RISKS?[ \t]*(?:&|AND)?[ \t]*CONCERNS?"));

static NEXT_STEPS_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading(r"NEXT[ \t]*STEPS?"));

static BLANK_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").ok());

/// The three sections a report draft is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    Summary,
    Risks,
    NextSteps,
}

impl ReportField {
    pub const ALL: [ReportField; 3] = [Self::Summary, Self::Risks, Self::NextSteps];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Risks => "risks",
            Self::NextSteps => "next_steps",
        }
    }

    fn pattern(&self) -> Option<&'static Regex> {
        match self {
            Self::Summary => SUMMARY_HEADING.as_ref(),
            Self::Risks => RISKS_HEADING.as_ref(),
            Self::NextSteps => NEXT_STEPS_HEADING.as_ref(),
        }
    }
}

/// Section bodies whose heading was located.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundSections {
    pub summary: Option<String>,
    pub risks: Option<String>,
    pub next_steps: Option<String>,
}

impl FoundSections {
    pub fn get(&self, field: ReportField) -> Option<&str> {
        match field {
            ReportField::Summary => self.summary.as_deref(),
            ReportField::Risks => self.risks.as_deref(),
            ReportField::NextSteps => self.next_steps.as_deref(),
        }
    }

    fn set(&mut self, field: ReportField, body: String) {
        let slot = match field {
            ReportField::Summary => &mut self.summary,
            ReportField::Risks => &mut self.risks,
            ReportField::NextSteps => &mut self.next_steps,
        };
        *slot = Some(body);
    }

    pub fn missing_fields(&self) -> Vec<ReportField> {
        ReportField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}

/// What report segmentation found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionParse {
    FullyParsed {
        summary: String,
        risks: String,
        next_steps: String,
    },
    PartiallyParsed { found: FoundSections },
    Unparsed,
}

/// A heading occurrence: where it starts and where its body begins.
#[derive(Debug, Clone, Copy)]
struct HeadingMatch {
    start: usize,
    body_start: usize,
    line_start: bool,
}

fn heading_matches(field: ReportField, text: &str) -> Vec<HeadingMatch> {
    let Some(pattern) = field.pattern() else {
        return Vec::new();
    };
    pattern
        .find_iter(text)
        .map(|m| HeadingMatch {
            start: m.start(),
            body_start: m.end(),
            line_start: text[..m.start()]
                .rsplit('\n')
                .next()
                .is_none_or(|before| before.trim().is_empty()),
        })
        .collect()
}

/// Split report text on its `SUMMARY`, `RISKS & CONCERNS` and `NEXT STEPS`
/// headings. Matching is case-insensitive and tolerates `**`/`__` emphasis,
/// a trailing colon, heading hashes and list numbering. Bodies are trimmed
/// and exclude the heading itself.
///
/// Each field takes its first line-opening match, or its first match of any
/// kind when none opens a line. A body ends at the earliest line-opening
/// heading (of any field) or chosen heading after it, so heading words used
/// in prose neither start nor cut a section.
pub fn segment_report(text: &str) -> SectionParse {
    let mut boundaries: Vec<usize> = Vec::new();
    let mut chosen: Vec<(ReportField, HeadingMatch)> = Vec::new();

    for field in ReportField::ALL {
        let matches = heading_matches(field, text);
        boundaries.extend(matches.iter().filter(|m| m.line_start).map(|m| m.start));

        let pick = matches
            .iter()
            .find(|m| m.line_start)
            .or_else(|| matches.first());
        if let Some(m) = pick {
            boundaries.push(m.start);
            chosen.push((field, *m));
        }
    }

    let mut found = FoundSections::default();
    for (field, m) in chosen {
        let body_end = boundaries
            .iter()
            .copied()
            .filter(|b| *b >= m.body_start)
            .min()
            .unwrap_or(text.len());
        found.set(field, text[m.body_start..body_end].trim().to_string());
    }

    match found {
        FoundSections {
            summary: Some(summary),
            risks: Some(risks),
            next_steps: Some(next_steps),
        } => SectionParse::FullyParsed {
            summary,
            risks,
            next_steps,
        },
        FoundSections {
            summary: None,
            risks: None,
            next_steps: None,
        } => SectionParse::Unparsed,
        found => SectionParse::PartiallyParsed { found },
    }
}

/// Text before the first blank-line break, trimmed. `None` when the text has
/// no such break or nothing precedes it.
pub fn leading_paragraph(text: &str) -> Option<&str> {
    let m = BLANK_LINE.as_ref()?.find(text)?;
    let head = text[..m.start()].trim();
    (!head.is_empty()).then_some(head)
}

/// Why onboarding-task output was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskListMiss {
    #[error("output is not JSON: {0}")]
    NotJson(String),

    #[error("output is not a JSON array")]
    NotArray,
}

/// Read model output as a JSON array of tasks. Only "is an array" is
/// checked: string elements are taken as-is, anything else keeps its JSON
/// text form.
pub fn parse_task_list(text: &str) -> Result<Vec<String>, TaskListMiss> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| TaskListMiss::NotJson(e.to_string()))?;

    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()),
        _ => Err(TaskListMiss::NotArray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_case_emphasised_headings_are_all_found() {
        let text = "**Summary:**\nWe shipped the new site.\n\n\
                    **Risks & Concerns:**\n- Budget is tight\n\n\
                    **next steps**\n- Launch campaign\n";

        assert_eq!(
            segment_report(text),
            SectionParse::FullyParsed {
                summary: "We shipped the new site.".to_string(),
                risks: "- Budget is tight".to_string(),
                next_steps: "- Launch campaign".to_string(),
            }
        );
    }

    #[test]
    fn numbered_markdown_headings_do_not_leak_into_the_previous_section() {
        let text = "## 1. SUMMARY\nGood month.\n\n## 2. RISKS AND CONCERNS:\nNone.\n\n## 3. Next Steps:\nKeep going.";

        match segment_report(text) {
            SectionParse::FullyParsed {
                summary,
                risks,
                next_steps,
            } => {
                assert_eq!(summary, "Good month.");
                assert_eq!(risks, "None.");
                assert_eq!(next_steps, "Keep going.");
            }
            other => panic!("expected full parse, got {other:?}"),
        }
    }

    #[test]
    fn missing_next_steps_is_a_partial_parse() {
        let text = "SUMMARY: All on track.\nRISK & CONCERN: Vendor delay.";

        match segment_report(text) {
            SectionParse::PartiallyParsed { found } => {
                assert_eq!(found.summary.as_deref(), Some("All on track."));
                assert_eq!(found.risks.as_deref(), Some("Vendor delay."));
                assert_eq!(found.next_steps, None);
                assert_eq!(found.missing_fields(), vec![ReportField::NextSteps]);
            }
            other => panic!("expected partial parse, got {other:?}"),
        }
    }

    #[test]
    fn text_without_headings_is_unparsed() {
        assert_eq!(segment_report("Just some prose.\n\nMore prose."), SectionParse::Unparsed);
        assert_eq!(segment_report(""), SectionParse::Unparsed);
    }

    #[test]
    fn sections_end_at_the_next_recognized_heading_in_text_order() {
        let text = "NEXT STEPS: call client\nSUMMARY: fine\nRISKS & CONCERNS: none";
        let SectionParse::FullyParsed {
            summary,
            risks,
            next_steps,
        } = segment_report(text)
        else {
            panic!("expected full parse");
        };
        assert_eq!(next_steps, "call client");
        assert_eq!(summary, "fine");
        assert_eq!(risks, "none");
    }

    #[test]
    fn unrecognized_heading_wording_stays_in_the_preceding_section() {
        let text = "SUMMARY: fine\nRISKS & CONCERNS: none\nAction Items: call client";
        let SectionParse::PartiallyParsed { found } = segment_report(text) else {
            panic!("expected partial parse");
        };
        assert_eq!(found.risks.as_deref(), Some("none\nAction Items: call client"));
    }

    #[test]
    fn heading_words_inside_prose_do_not_split_a_section() {
        let text = "**SUMMARY**\nWe launched the site and agreed next steps with the client.\n\n\
                    **RISKS & CONCERNS**\n- Budget\n\n\
                    **NEXT STEPS**\n- Run ads";

        assert_eq!(
            segment_report(text),
            SectionParse::FullyParsed {
                summary: "We launched the site and agreed next steps with the client.".to_string(),
                risks: "- Budget".to_string(),
                next_steps: "- Run ads".to_string(),
            }
        );
    }

    #[test]
    fn prose_mention_is_used_only_when_no_heading_opens_a_line() {
        let text = "SUMMARY: In summary the quarter was strong.\nRisks and concerns remain low; next steps: hire.";
        let SectionParse::FullyParsed {
            summary,
            risks,
            next_steps,
        } = segment_report(text)
        else {
            panic!("expected full parse");
        };
        assert_eq!(summary, "In summary the quarter was strong.");
        assert_eq!(risks, "remain low;");
        assert_eq!(next_steps, "hire.");
    }

    #[test]
    fn heading_with_no_body_is_found_but_empty() {
        let text = "SUMMARY: fine\nRISKS & CONCERNS: none\nNEXT STEPS:";
        let SectionParse::FullyParsed { next_steps, .. } = segment_report(text) else {
            panic!("expected full parse");
        };
        assert_eq!(next_steps, "");
    }

    #[test]
    fn leading_paragraph_needs_a_blank_line() {
        assert_eq!(leading_paragraph("First para.\n\nSecond."), Some("First para."));
        assert_eq!(leading_paragraph("First para.\r\n  \r\nSecond."), Some("First para."));
        assert_eq!(leading_paragraph("Only one paragraph."), None);
        assert_eq!(leading_paragraph("\n\nStarts blank."), None);
    }

    #[test]
    fn task_list_accepts_any_json_array() {
        assert_eq!(
            parse_task_list(r#"["Kickoff", "Audit"]"#),
            Ok(vec!["Kickoff".to_string(), "Audit".to_string()])
        );
        assert_eq!(
            parse_task_list(r#"["Kickoff", 2, {"a": 1}]"#),
            Ok(vec!["Kickoff".to_string(), "2".to_string(), r#"{"a":1}"#.to_string()])
        );
        assert_eq!(parse_task_list("[]"), Ok(vec![]));
    }

    #[test]
    fn task_list_rejects_non_arrays_and_non_json() {
        assert_eq!(parse_task_list(r#"{"tasks": []}"#), Err(TaskListMiss::NotArray));
        assert!(matches!(parse_task_list("Here are your tasks:"), Err(TaskListMiss::NotJson(_))));
        assert!(matches!(
            parse_task_list("```json\n[\"a\"]\n```"),
            Err(TaskListMiss::NotJson(_))
        ));
    }
}
