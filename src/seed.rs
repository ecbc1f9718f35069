//! Built-in sample feedback. Used as the repository fallback and by `POST /seed`.

use crate::feedback::{FeedbackItem, Sentiment, Source, Theme, Urgency};

pub fn sample_feedback() -> Vec<FeedbackItem> {
    use Sentiment::*;
    use Source::*;
    use Theme::*;
    use Urgency::*;

    let rows: [(&str, Source, &str, Sentiment, Theme, Urgency); 12] = [
        ("1", Support, "The API documentation is unclear and missing examples", Negative, Documentation, High),
        ("2", Github, "Love the new features! Keep up the great work", Positive, DeveloperExperience, Low),
        ("3", Community, "Performance has improved significantly in the latest release", Positive, Performance, Medium),
        ("4", Twitter, "Pricing is too expensive for small teams", Negative, Pricing, High),
        ("5", Support, "Billing system is confusing and hard to understand", Negative, Billing, High),
        ("6", Github, "The developer experience is excellent, very intuitive", Positive, DeveloperExperience, Low),
        ("7", Community, "Documentation could use more real-world examples", Neutral, Documentation, Medium),
        ("8", Support, "Response times are slow during peak hours", Negative, Performance, High),
        ("9", Twitter, "Great customer service, resolved my issue quickly", Positive, Other, Low),
        ("10", Github, "The setup process was straightforward and well-documented", Positive, Documentation, Low),
        ("11", Community, "Would like to see more advanced features in the pricing tier", Neutral, Pricing, Medium),
        ("12", Support, "Billing invoice format is confusing and lacks details", Negative, Billing, Medium),
    ];

    rows.into_iter()
        .map(|(id, src, text, s, t, u)| FeedbackItem::new(id, src, text, s, t, u))
        .collect()
}
