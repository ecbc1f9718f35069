//! Query-string filters applied to the loaded items before the digest is built.

use crate::feedback::FeedbackItem;

/// `sentiment` is compared case-insensitively, `theme` exactly. Values are
/// not trimmed, and for a repeated key the first occurrence wins. A value
/// that names no known category simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestFilter {
    /// Lower-cased.
    pub sentiment: Option<String>,
    pub theme: Option<String>,
}

impl DigestFilter {
    pub fn from_query(q: &[(String, String)]) -> Self {
        let first = |key: &str| {
            q.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.is_empty())
        };
        Self {
            sentiment: first("sentiment").map(str::to_ascii_lowercase),
            theme: first("theme").map(str::to_string),
        }
    }

    pub fn is_active(&self) -> bool {
        self.sentiment.is_some() || self.theme.is_some()
    }

    pub fn matches(&self, item: &FeedbackItem) -> bool {
        if let Some(s) = &self.sentiment {
            if !item.sentiment.as_str().eq_ignore_ascii_case(s) {
                return false;
            }
        }
        if let Some(t) = &self.theme {
            if item.theme.as_str() != t {
                return false;
            }
        }
        true
    }

    /// Keeps input order.
    pub fn apply(&self, items: Vec<FeedbackItem>) -> Vec<FeedbackItem> {
        items.into_iter().filter(|it| self.matches(it)).collect()
    }

    /// Active filters as `(key, value)` pairs, sentiment first.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(s) = &self.sentiment {
            out.push(("sentiment", s.as_str()));
        }
        if let Some(t) = &self.theme {
            out.push(("theme", t.as_str()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Sentiment, Theme};
    use crate::seed::sample_feedback;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn negative_billing_over_seed() {
        let f = DigestFilter::from_query(&query(&[("sentiment", "negative"), ("theme", "Billing")]));
        let kept = f.apply(sample_feedback());
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|i| i.sentiment == Sentiment::Negative && i.theme == Theme::Billing));
    }

    #[test]
    fn sentiment_is_case_insensitive_theme_is_exact() {
        let f = DigestFilter::from_query(&query(&[("sentiment", "NEUTRAL")]));
        assert_eq!(f.apply(sample_feedback()).len(), 2);

        let f = DigestFilter::from_query(&query(&[("theme", "billing")]));
        assert!(f.apply(sample_feedback()).is_empty());
    }

    #[test]
    fn unknown_values_match_nothing_and_empty_is_inactive() {
        let f = DigestFilter::from_query(&query(&[("sentiment", "angry")]));
        assert!(f.apply(sample_feedback()).is_empty());

        let f = DigestFilter::from_query(&query(&[("sentiment", ""), ("theme", "")]));
        assert!(!f.is_active());
        assert_eq!(f.apply(sample_feedback()).len(), 12);
    }

    #[test]
    fn first_repeated_key_wins_and_values_are_not_trimmed() {
        let f = DigestFilter::from_query(&query(&[
            ("theme", "Billing"),
            ("theme", "Documentation"),
        ]));
        assert_eq!(f.theme.as_deref(), Some("Billing"));
        assert_eq!(f.apply(sample_feedback()).len(), 2);

        let f = DigestFilter::from_query(&query(&[("sentiment", " negative ")]));
        assert!(f.apply(sample_feedback()).is_empty());
    }
}
