//! PM summary: generative backend first, deterministic narrative on any failure.
//!
//! The summarizer itself never fails. Provenance is reported through
//! [`SummarySource`] so consumers can tell the two paths apart.

use std::time::Instant;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::TextGenerator;
use crate::aggregate::{SentimentBreakdown, ThemeCount};
use crate::feedback::{FeedbackItem, Urgency};

/// Sampling temperature for the summary call.
pub const TEMPERATURE: f32 = 0.2;
/// Output cap for the summary call.
pub const MAX_TOKENS: u32 = 150;
/// Replies must be strictly longer than this (in chars, after trimming).
pub const MIN_SUMMARY_CHARS: usize = 20;
/// Negative share above which the "critical issues" narrative is used.
pub const NEGATIVE_RATIO_CRITICAL: f64 = 0.4;

const PROMPT_THEMES: usize = 3;
const PROMPT_ITEMS: usize = 3;
const NO_THEME: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl SummarySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummarySource::Ai => "ai",
            SummarySource::RuleBased => "rule-based",
        }
    }

    /// Human label used by the HTML pages.
    pub fn label(&self) -> &'static str {
        match self {
            SummarySource::Ai => "AI",
            SummarySource::RuleBased => "Rule-based (fallback)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

/// Prompt embedding sentiment counts, the top three themes and the top three
/// attention items.
pub fn build_prompt(
    breakdown: &SentimentBreakdown,
    top_themes: &[ThemeCount],
    needs_attention: &[FeedbackItem],
) -> String {
    let themes = top_themes
        .iter()
        .take(PROMPT_THEMES)
        .map(|t| format!("{} ({})", t.theme.as_str(), t.count))
        .collect::<Vec<_>>()
        .join(", ");
    let items = needs_attention
        .iter()
        .take(PROMPT_ITEMS)
        .map(|it| {
            format!(
                "\"{}\" ({}, priority {})",
                it.text,
                it.theme.as_str(),
                it.priority_score()
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "As a PM, write a 2-3 sentence summary for this feedback digest:\n\n\
         Sentiment: Positive={}, Neutral={}, Negative={}\n\n\
         Top themes: {}\n\n\
         Top priority items: {}\n\n\
         Focus on: overall sentiment, key themes, and suggested next action. \
         Keep it concise and actionable.",
        breakdown.positive, breakdown.neutral, breakdown.negative, themes, items
    )
}

/// Deterministic narrative from the aggregate numbers alone.
pub fn rule_based_summary(
    breakdown: &SentimentBreakdown,
    top_themes: &[ThemeCount],
    needs_attention: &[FeedbackItem],
) -> String {
    let total = breakdown.total();
    let negative = breakdown.negative;
    let high_urgency = needs_attention
        .iter()
        .filter(|it| it.urgency == Urgency::High)
        .count();
    let top_theme = top_themes
        .first()
        .map(|t| t.theme.as_str())
        .unwrap_or(NO_THEME);

    if negative as f64 > total as f64 * NEGATIVE_RATIO_CRITICAL {
        format!(
            "Critical issues need immediate attention: {negative} negative feedback items primarily around {top_theme}. \
             {high_urgency} high-urgency items require immediate action to prevent customer churn."
        )
    } else {
        format!(
            "Feedback sentiment is generally stable with {top_theme} as the primary theme. \
             Focus on addressing {} high-priority items to improve overall satisfaction.",
            needs_attention.len()
        )
    }
}

/// Accept a generated reply only if it is long enough to be a summary.
fn accept_reply(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (trimmed.chars().count() > MIN_SUMMARY_CHARS).then(|| trimmed.to_string())
}

pub async fn summarize(
    generator: &dyn TextGenerator,
    breakdown: &SentimentBreakdown,
    top_themes: &[ThemeCount],
    needs_attention: &[FeedbackItem],
) -> Summary {
    let prompt = build_prompt(breakdown, top_themes, needs_attention);
    let started = Instant::now();
    let outcome = generator.generate(&prompt, TEMPERATURE, MAX_TOKENS).await;
    histogram!("digest_summary_ms").record(started.elapsed().as_secs_f64() * 1000.0);

    let summary = match outcome {
        Ok(reply) => match accept_reply(&reply) {
            Some(text) => {
                debug!(provider = generator.provider_name(), chars = text.chars().count(), "AI summary accepted");
                Some(Summary {
                    text,
                    source: SummarySource::Ai,
                })
            }
            None => {
                warn!(
                    provider = generator.provider_name(),
                    chars = reply.trim().chars().count(),
                    "AI summary too short; using rule-based fallback"
                );
                None
            }
        },
        Err(e) => {
            warn!(provider = generator.provider_name(), error = %e, "AI summary generation failed");
            None
        }
    };

    let summary = summary.unwrap_or_else(|| Summary {
        text: rule_based_summary(breakdown, top_themes, needs_attention),
        source: SummarySource::RuleBased,
    });
    counter!("digest_summary_total", "source" => summary.source.as_str()).increment(1);
    summary
}
