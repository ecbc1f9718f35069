//! feedback.rs: the feedback record and its categorical fields.
//!
//! Sentiment, theme and urgency arrive already classified; this module only
//! models them. Unknown enum values are rejected by serde at the ingestion
//! boundary, so everything downstream works with total, closed types.

use serde::{Deserialize, Serialize};

use crate::scoring;

/// Channel the feedback came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Support,
    Github,
    Community,
    Twitter,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Support => "support",
            Source::Github => "github",
            Source::Community => "community",
            Source::Twitter => "twitter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Documentation,
    #[serde(rename = "Developer Experience")]
    DeveloperExperience,
    Performance,
    Pricing,
    Billing,
    Other,
}

impl Theme {
    /// Display label, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Documentation => "Documentation",
            Theme::DeveloperExperience => "Developer Experience",
            Theme::Performance => "Performance",
            Theme::Pricing => "Pricing",
            Theme::Billing => "Billing",
            Theme::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        }
    }
}

/// Wire shape of a stored record. Any `priorityScore` found in storage is
/// ignored; the score is always recomputed from the other fields.
#[derive(Debug, Clone, Deserialize)]
struct FeedbackRecord {
    id: String,
    source: Source,
    text: String,
    sentiment: Sentiment,
    theme: Theme,
    urgency: Urgency,
}

/// One classified piece of customer feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FeedbackRecord", rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: String,
    pub source: Source,
    pub text: String,
    pub sentiment: Sentiment,
    pub theme: Theme,
    pub urgency: Urgency,
    priority_score: u8,
}

impl FeedbackItem {
    pub fn new(
        id: impl Into<String>,
        source: Source,
        text: impl Into<String>,
        sentiment: Sentiment,
        theme: Theme,
        urgency: Urgency,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            text: text.into(),
            sentiment,
            theme,
            urgency,
            priority_score: scoring::score(sentiment, urgency, theme),
        }
    }

    /// Derived 0..=100 priority.
    pub fn priority_score(&self) -> u8 {
        self.priority_score
    }
}

impl From<FeedbackRecord> for FeedbackItem {
    fn from(r: FeedbackRecord) -> Self {
        FeedbackItem::new(r.id, r.source, r.text, r.sentiment, r.theme, r.urgency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_and_labels() {
        let it = FeedbackItem::new(
            "7",
            Source::Community,
            "Docs need examples",
            Sentiment::Neutral,
            Theme::DeveloperExperience,
            Urgency::Medium,
        );
        let v = serde_json::to_value(&it).unwrap();
        assert_eq!(v["source"], "community");
        assert_eq!(v["theme"], "Developer Experience");
        assert_eq!(v["priorityScore"], 80);
    }

    #[test]
    fn stored_priority_score_is_recomputed() {
        let raw = r#"{"id":"1","source":"support","text":"x","sentiment":"Negative",
                      "theme":"Billing","urgency":"High","priorityScore":3}"#;
        let it: FeedbackItem = serde_json::from_str(raw).unwrap();
        assert_eq!(it.priority_score(), 100);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let raw = r#"{"id":"1","source":"support","text":"x","sentiment":"Negative",
                      "theme":"Marketing","urgency":"High"}"#;
        assert!(serde_json::from_str::<FeedbackItem>(raw).is_err());
    }
}
