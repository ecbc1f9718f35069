//! Priority scoring for feedback items.
//!
//! score = 50 + sentiment + urgency + theme, clamped to [0,100]:
//! - sentiment : Negative +30, Neutral +10, Positive -10
//! - urgency   : High +25, Medium +15, Low +5
//! - theme     : Billing +15, Pricing +12, Documentation +10,
//!               Performance +8, Developer Experience +5, Other 0

use crate::feedback::{Sentiment, Theme, Urgency};

const BASE: i32 = 50;

/// Items at or above this score are candidates for "needs attention".
pub const ATTENTION_THRESHOLD: u8 = 70;

fn sentiment_weight(s: Sentiment) -> i32 {
    match s {
        Sentiment::Negative => 30,
        Sentiment::Neutral => 10,
        Sentiment::Positive => -10,
    }
}

fn urgency_weight(u: Urgency) -> i32 {
    match u {
        Urgency::High => 25,
        Urgency::Medium => 15,
        Urgency::Low => 5,
    }
}

fn theme_weight(t: Theme) -> i32 {
    match t {
        Theme::Billing => 15,
        Theme::Pricing => 12,
        Theme::Documentation => 10,
        Theme::Performance => 8,
        Theme::DeveloperExperience => 5,
        Theme::Other => 0,
    }
}

/// Deterministic, total priority score in [0,100].
pub fn score(sentiment: Sentiment, urgency: Urgency, theme: Theme) -> u8 {
    let raw = BASE + sentiment_weight(sentiment) + urgency_weight(urgency) + theme_weight(theme);
    raw.clamp(0, 100) as u8
}
