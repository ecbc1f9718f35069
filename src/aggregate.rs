//! # Aggregator
//! Pure, testable statistics over a (possibly filtered) item set.
//! No I/O; same input always yields the same output.

use serde::{Deserialize, Serialize};

use crate::feedback::{FeedbackItem, Sentiment, Theme};
use crate::scoring::ATTENTION_THRESHOLD;

pub const MAX_TOP_THEMES: usize = 5;
pub const MAX_NEEDS_ATTENTION: usize = 5;

/// Per-sentiment counts. Serialized with the sentiment labels as keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentBreakdown {
    pub fn record(&mut self, s: Sentiment) {
        match s {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn count(&self, s: Sentiment) -> usize {
        match s {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCount {
    pub theme: Theme,
    pub count: usize,
}

/// Everything the summarizer needs, computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub sentiment_breakdown: SentimentBreakdown,
    pub top_themes: Vec<ThemeCount>,
    pub needs_attention: Vec<FeedbackItem>,
}

pub fn aggregate(items: &[FeedbackItem]) -> Aggregate {
    Aggregate {
        sentiment_breakdown: sentiment_breakdown(items),
        top_themes: top_themes(items),
        needs_attention: needs_attention(items),
    }
}

pub fn sentiment_breakdown(items: &[FeedbackItem]) -> SentimentBreakdown {
    let mut b = SentimentBreakdown::default();
    for it in items {
        b.record(it.sentiment);
    }
    b
}

/// Themes present in `items`, most frequent first; equal counts keep the
/// order in which each theme first appeared.
pub fn top_themes(items: &[FeedbackItem]) -> Vec<ThemeCount> {
    // Vec keeps first-seen order; there are only six themes.
    let mut counts: Vec<ThemeCount> = Vec::new();
    for it in items {
        match counts.iter_mut().find(|c| c.theme == it.theme) {
            Some(c) => c.count += 1,
            None => counts.push(ThemeCount {
                theme: it.theme,
                count: 1,
            }),
        }
    }
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(MAX_TOP_THEMES);
    counts
}

/// Items with score >= 70, highest first, original order on ties.
pub fn needs_attention(items: &[FeedbackItem]) -> Vec<FeedbackItem> {
    let mut out: Vec<FeedbackItem> = items
        .iter()
        .filter(|it| it.priority_score() >= ATTENTION_THRESHOLD)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.priority_score().cmp(&a.priority_score()));
    out.truncate(MAX_NEEDS_ATTENTION);
    out
}
