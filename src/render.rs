//! HTML pages: the dashboard (`/ui`) and the formatted-JSON view (`/api`).
//! All interpolated text is escaped; links carry form-urlencoded queries.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use url::form_urlencoded;

use crate::digest::Digest;
use crate::feedback::{FeedbackItem, Sentiment};
use crate::filter::DigestFilter;

/// Filtered feedback list length on the dashboard.
const LIST_LIMIT: usize = 12;

const BASE_CSS: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
.container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
.header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 30px; }
h1 { color: #333; margin: 0; }
.header-actions { display: flex; gap: 10px; align-items: center; }
.btn { color: white; padding: 10px 20px; border-radius: 6px; border: none; text-decoration: none; font-weight: 500; cursor: pointer; font-size: 14px; }
.seed-btn { background: #10b981; }
.view-api-btn { background: #3b82f6; }
.back-btn { background: #6b7280; }
.raw-btn { background: #8b5cf6; }
.summary-source { font-size: 12px; color: #6b7280; margin-top: 10px; font-style: italic; }
";

const DASHBOARD_CSS: &str = "\
.last-updated { color: #666; margin-bottom: 20px; font-size: 14px; }
.filter-info { background: #e5e7eb; padding: 15px; border-radius: 6px; margin-bottom: 20px; display: flex; justify-content: space-between; align-items: center; }
.clear-filters { background: #6b7280; color: white; padding: 8px 16px; border-radius: 4px; text-decoration: none; font-size: 14px; }
.overview { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 15px; margin-bottom: 30px; }
.tile { padding: 20px; border-radius: 6px; text-align: center; text-decoration: none; color: white; font-weight: bold; }
.tile .count { font-size: 24px; display: block; margin-bottom: 5px; }
.positive { background: #22c55e; } .neutral { background: #f59e0b; } .negative { background: #ef4444; }
.section { margin-bottom: 30px; }
.section h2 { color: #333; border-bottom: 2px solid #e5e7eb; padding-bottom: 10px; }
.themes, .feedback-list, .needs-attention { list-style: none; padding: 0; }
.theme-item { padding: 10px; margin: 5px 0; background: #f8f9fa; border-radius: 4px; text-decoration: none; color: #333; display: flex; justify-content: space-between; }
.feedback-item { padding: 15px; margin: 10px 0; border: 1px solid #e5e7eb; border-radius: 6px; background: #fafafa; }
.meta-item { background: #f3f4f6; padding: 4px 8px; border-radius: 4px; font-size: 12px; margin-right: 8px; }
.priority-score { color: #ef4444; font-weight: bold; font-size: 14px; }
.need-item { padding: 15px; margin: 10px 0; border-left: 4px solid #ef4444; background: #fef2f2; border-radius: 4px; }
.need-meta { font-size: 12px; color: #666; margin-bottom: 5px; }
.summary { background: #f0f9ff; padding: 20px; border-radius: 6px; border-left: 4px solid #3b82f6; }
";

const JSON_CSS: &str = "\
pre { background: #f8f9fa; padding: 20px; border-radius: 6px; overflow-x: auto; border: 1px solid #e5e7eb; font-size: 14px; line-height: 1.5; }
";

/// `path` plus `?query` when there are any pairs.
pub fn link(path: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        ser.append_pair(k, v);
    }
    format!("{path}?{}", ser.finish())
}

fn page(title: &str, extra_css: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>\n{BASE_CSS}{extra_css}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n{body}</div>\n</body>\n</html>\n",
        text(title)
    )
}

fn feedback_entry(out: &mut String, it: &FeedbackItem) {
    let _ = write!(
        out,
        "<li class=\"feedback-item\"><div class=\"feedback-text\">\"{}\"</div><div>\
         <span class=\"meta-item\">Source: {}</span>\
         <span class=\"meta-item\">Theme: {}</span>\
         <span class=\"meta-item\">Sentiment: {}</span>\
         <span class=\"meta-item\">Urgency: {}</span></div>\
         <div class=\"priority-score\">Priority Score: {}</div></li>\n",
        text(&it.text),
        it.source.as_str(),
        it.theme.as_str(),
        it.sentiment.as_str(),
        it.urgency.as_str(),
        it.priority_score()
    );
}

/// Dashboard with sentiment tiles, theme list, attention list and summary.
/// `items` is the filtered set the digest was built from.
pub fn dashboard(digest: &Digest, filter: &DigestFilter, items: &[FeedbackItem]) -> String {
    let pairs = filter.pairs();
    let mut body = String::new();

    let _ = write!(
        body,
        "<div class=\"header\"><h1>Feedback Triage Digest</h1><div class=\"header-actions\">\
         <form method=\"POST\" action=\"/seed\" style=\"display: inline;\">\
         <button type=\"submit\" class=\"btn seed-btn\">Seed store (demo)</button></form>\
         <a href=\"{}\" class=\"btn view-api-btn\">View JSON API</a></div></div>\n\
         <div class=\"last-updated\">Last updated: {}</div>\n",
        attr(&link("/api", &pairs)),
        digest.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if filter.is_active() {
        let active = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        let shown = &items[..items.len().min(LIST_LIMIT)];
        let _ = write!(
            body,
            "<div class=\"filter-info\"><div class=\"filter-text\">Filters active: {}</div>\
             <a href=\"/ui\" class=\"clear-filters\">Clear filters</a></div>\n\
             <div class=\"section\"><h2>Feedback List ({} items)</h2><ul class=\"feedback-list\">\n",
            text(&active),
            shown.len()
        );
        for it in shown {
            feedback_entry(&mut body, it);
        }
        body.push_str("</ul></div>\n");
    }

    body.push_str("<div class=\"overview\">\n");
    for s in Sentiment::ALL {
        let lower = s.as_str().to_ascii_lowercase();
        let mut q = vec![("sentiment", lower.as_str())];
        if let Some(t) = &filter.theme {
            q.push(("theme", t.as_str()));
        }
        let href = link("/ui", &q);
        let _ = write!(
            body,
            "<a href=\"{}\" class=\"tile {lower}\"><span class=\"count\">{}</span>{}</a>\n",
            attr(&href),
            digest.sentiment_breakdown.count(s),
            s.as_str()
        );
    }
    body.push_str("</div>\n");

    let _ = write!(
        body,
        "<div class=\"section\"><h2>Top Themes ({})</h2><ul class=\"themes\">\n",
        digest.top_themes.len()
    );
    for tc in &digest.top_themes {
        let mut q = vec![("theme", tc.theme.as_str())];
        if let Some(s) = &filter.sentiment {
            q.push(("sentiment", s.as_str()));
        }
        let _ = write!(
            body,
            "<li><a href=\"{}\" class=\"theme-item\"><span>{}</span><span><strong>{}</strong> items</span></a></li>\n",
            attr(&link("/ui", &q)),
            tc.theme.as_str(),
            tc.count
        );
    }
    body.push_str("</ul></div>\n");

    let _ = write!(
        body,
        "<div class=\"section\"><h2>Needs Attention ({})</h2><ul class=\"needs-attention\">\n",
        digest.needs_attention.len()
    );
    for it in &digest.needs_attention {
        let _ = write!(
            body,
            "<li class=\"need-item\"><div class=\"need-text\">\"{}\"</div>\
             <div class=\"need-meta\">Source: {} | Theme: {} | Urgency: {}</div>\
             <div class=\"priority-score\">Priority Score: {}</div></li>\n",
            text(&it.text),
            it.source.as_str(),
            it.theme.as_str(),
            it.urgency.as_str(),
            it.priority_score()
        );
    }
    body.push_str("</ul></div>\n");

    let _ = write!(
        body,
        "<div class=\"section\"><h2>PM Summary</h2><div class=\"summary\">{}</div>\
         <div class=\"summary-source\">Summary source: {}</div></div>\n",
        text(&digest.pm_summary),
        digest.summary_source.label()
    );

    page("Feedback Triage Digest", DASHBOARD_CSS, &body)
}

/// Digest as pretty JSON inside an HTML page.
pub fn json_page(digest: &Digest, filter: &DigestFilter) -> String {
    let pairs = filter.pairs();
    let pretty = serde_json::to_string_pretty(digest).unwrap_or_else(|_| "{}".to_string());
    let body = format!(
        "<div class=\"header\"><h1>Feedback Triage Digest API (JSON)</h1><div class=\"header-actions\">\
         <a href=\"{}\" class=\"btn raw-btn\">View raw JSON</a>\
         <a href=\"{}\" class=\"btn back-btn\">Back to dashboard</a></div></div>\n\
         <div class=\"summary-source\">Summary source: {}</div>\n<pre>{}</pre>\n",
        attr(&link("/digest", &pairs)),
        attr(&link("/ui", &pairs)),
        digest.summary_source.label(),
        text(&pretty)
    );
    page("Feedback Triage Digest API (JSON)", JSON_CSS, &body)
}
