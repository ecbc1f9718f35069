//! # Digest Assembler
//! Aggregator + Summarizer composed into one immutable, timestamped digest.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize, Serializer};
use tracing::info;

use crate::ai::TextGenerator;
use crate::aggregate::{self, SentimentBreakdown, ThemeCount};
use crate::feedback::FeedbackItem;
use crate::summarize::{self, SummarySource};

/// Published per request; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    /// Millisecond precision, `YYYY-MM-DDTHH:MM:SS.sssZ`.
    #[serde(serialize_with = "millis_utc")]
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub sentiment_breakdown: SentimentBreakdown,
    pub top_themes: Vec<ThemeCount>,
    pub needs_attention: Vec<FeedbackItem>,
    pub pm_summary: String,
    pub summary_source: SummarySource,
}

fn millis_utc<S: Serializer>(ts: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub async fn assemble(items: &[FeedbackItem], generator: &dyn TextGenerator) -> Digest {
    let agg = aggregate::aggregate(items);
    let summary = summarize::summarize(
        generator,
        &agg.sentiment_breakdown,
        &agg.top_themes,
        &agg.needs_attention,
    )
    .await;

    counter!("digest_generated_total").increment(1);
    info!(
        total = items.len(),
        needs_attention = agg.needs_attention.len(),
        summary_source = summary.source.as_str(),
        "digest assembled"
    );

    Digest {
        generated_at: Utc::now().trunc_subsecs(3),
        total: items.len(),
        sentiment_breakdown: agg.sentiment_breakdown,
        top_themes: agg.top_themes,
        needs_attention: agg.needs_attention,
        pm_summary: summary.text,
        summary_source: summary.source,
    }
}
