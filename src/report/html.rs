//! HTML report rendering.
//!
//! Layout: the comparative summary, two side-by-side period columns, then the
//! consolidated action points. Every section whose collection is empty is
//! left out entirely.

use super::ReportMetadata;
use crate::models::{
    ActionPoint, AnalysisResult, ImprovementArea, Period, PeriodAnalysis, Sentiment, Strength,
    Theme,
};
use std::fmt::Write;

/// Inline stylesheet for standalone documents.
const STYLESHEET: &str = r#"
body { background: #111827; color: #d1d5db; font-family: system-ui, sans-serif; margin: 0; }
main { max-width: 72rem; margin: 0 auto; padding: 2rem; }
h1 { color: #818cf8; text-align: center; }
.meta { color: #9ca3af; text-align: center; font-size: 0.875rem; }
.card { background: #1f2937; border-radius: 0.5rem; padding: 1.5rem; margin-bottom: 1rem; }
.summary p { white-space: pre-wrap; }
.periods { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; margin-top: 2rem; }
.period h2 { text-align: center; }
.period-1 h2 { color: #818cf8; }
.period-2 h2 { color: #c084fc; }
.sentiment .row { display: flex; justify-content: space-between; }
.positive { color: #4ade80; } .neutral { color: #9ca3af; } .negative { color: #f87171; }
.strengths h4 { color: #4ade80; } .improvements h4 { color: #facc15; }
blockquote {
  border-left: 4px solid #4b5563; margin: 0.75rem 0; padding: 0.25rem 1rem; font-style: italic;
}
.strengths blockquote { border-color: #16a34a; } .improvements blockquote { border-color: #ca8a04; }
.actions .action + .action { border-top: 1px solid #374151; padding-top: 1rem; }
@media (max-width: 768px) { .periods { grid-template-columns: 1fr; } }
"#;

/// Renders the report body. Pure: the same input always yields the same markup.
pub fn render_html(result: &AnalysisResult) -> String {
    let mut html = String::new();

    html.push_str(&summary_section(&result.comparative_summary));

    html.push_str("<div class=\"periods\">\n");
    for period in Period::ALL {
        html.push_str(&period_column(period, result.period(period)));
    }
    html.push_str("</div>\n");

    html.push_str(&action_points_section(&result.action_points));

    html
}

/// Wraps [`render_html`] in a standalone page.
pub fn render_document(result: &AnalysisResult, metadata: &ReportMetadata, title: &str) -> String {
    let mut doc = String::new();

    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(doc, "<title>{}</title>", escape_html(title));
    let _ = writeln!(doc, "<style>{}</style>", STYLESHEET);
    doc.push_str("</head>\n<body>\n<main>\n<header>\n");
    let _ = writeln!(doc, "<h1>{}</h1>", escape_html(title));
    let _ = writeln!(
        doc,
        "<p class=\"meta\">{} vs {} &middot; model <code>{}</code> &middot; {}</p>",
        escape_html(&metadata.period1_file),
        escape_html(&metadata.period2_file),
        escape_html(&metadata.model_used),
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    doc.push_str("</header>\n");
    doc.push_str(&render_html(result));
    doc.push_str("</main>\n</body>\n</html>\n");

    doc
}

fn summary_section(summary: &str) -> String {
    if summary.is_empty() {
        return String::new();
    }

    let mut section = String::from("<section class=\"summary\">\n<h2>Comparative Summary</h2>\n");
    let _ = writeln!(section, "<div class=\"card\"><p>{}</p></div>", escape_html(summary));
    section.push_str("</section>\n");

    section
}

fn period_column(period: Period, analysis: &PeriodAnalysis) -> String {
    let mut column = String::new();

    let _ = writeln!(column, "<div class=\"period period-{}\">", period.number());
    let _ = writeln!(column, "<h2>{}</h2>", period);
    column.push_str(&sentiment_section(&analysis.sentiment));
    column.push_str(&themes_section(&analysis.thematic_analysis));
    column.push_str(&strengths_section(&analysis.content_strengths));
    column.push_str(&improvements_section(&analysis.improvement_areas));
    column.push_str("</div>\n");

    column
}

fn sentiment_section(sentiment: &Sentiment) -> String {
    let mut section = String::new();

    section.push_str("<section class=\"sentiment\">\n<h3>Sentiment Analysis</h3>\n");
    section.push_str("<div class=\"card\">\n");
    for (class, label, value) in [
        ("positive", "Positive", sentiment.positive),
        ("neutral", "Neutral", sentiment.neutral),
        ("negative", "Negative", sentiment.negative),
    ] {
        let _ = writeln!(
            section,
            "<div class=\"row\"><span class=\"{}\">{}</span>\
             <span class=\"value\">{:.1}%</span></div>",
            class, label, value
        );
    }
    section.push_str("</div>\n</section>\n");

    section
}

fn themes_section(themes: &[Theme]) -> String {
    if themes.is_empty() {
        return String::new();
    }

    let mut section =
        String::from("<section class=\"themes\">\n<h3>Key Themes</h3>\n<div class=\"card\">\n");
    for item in themes {
        let _ = writeln!(
            section,
            "<div class=\"theme\"><h4>{}</h4><p>{}</p></div>",
            escape_html(&item.theme),
            escape_html(&item.summary)
        );
    }
    section.push_str("</div>\n</section>\n");

    section
}

fn strengths_section(strengths: &[Strength]) -> String {
    if strengths.is_empty() {
        return String::new();
    }

    let mut section =
        String::from("<section class=\"strengths\">\n<h3>Content Strengths</h3>\n");
    for item in strengths {
        section.push_str("<div class=\"card\">\n");
        let _ = writeln!(section, "<h4>{}</h4>", escape_html(&item.strength));
        section.push_str(&quote_blocks(&item.quotes));
        section.push_str("</div>\n");
    }
    section.push_str("</section>\n");

    section
}

fn improvements_section(areas: &[ImprovementArea]) -> String {
    if areas.is_empty() {
        return String::new();
    }

    let mut section =
        String::from("<section class=\"improvements\">\n<h3>Areas for Improvement</h3>\n");
    for area in areas {
        section.push_str("<div class=\"card\">\n");
        let _ = writeln!(section, "<h4>{}</h4>", escape_html(&area.area));
        let _ = writeln!(section, "<p>{}</p>", escape_html(&area.suggestion));
        section.push_str("<h5>Supporting Feedback:</h5>\n");
        section.push_str(&quote_blocks(&area.quotes));
        section.push_str("</div>\n");
    }
    section.push_str("</section>\n");

    section
}

fn quote_blocks(quotes: &[String]) -> String {
    quotes
        .iter()
        .map(|q| format!("<blockquote><p>&quot;{}&quot;</p></blockquote>\n", escape_html(q)))
        .collect()
}

fn action_points_section(actions: &[ActionPoint]) -> String {
    if actions.is_empty() {
        return String::new();
    }

    let mut section = String::from("<section class=\"actions\">\n");
    section.push_str("<h2>Consolidated Action Points</h2>\n<div class=\"card\">\n");
    for point in actions {
        let _ = writeln!(
            section,
            "<div class=\"action\"><h3>{}</h3><p>{}</p></div>",
            escape_html(&point.action),
            escape_html(&point.rationale)
        );
    }
    section.push_str("</div>\n</section>\n");

    section
}

/// Escapes text for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_result;
    use chrono::Utc;

    /// Splits the output into the period 1 and period 2 columns.
    fn columns(html: &str) -> (&str, &str) {
        let start = html.find("<div class=\"period period-1\">").unwrap();
        let split = html.find("<div class=\"period period-2\">").unwrap();
        (&html[start..split], &html[split..])
    }

    #[test]
    fn test_summary_appears_once() {
        let html = render_html(&sample_result());
        assert_eq!(html.matches("Improved practicality").count(), 1);
    }

    #[test]
    fn test_one_sentiment_block_per_period() {
        let html = render_html(&sample_result());
        assert_eq!(html.matches("<section class=\"sentiment\">").count(), 2);
        assert!(html.contains("80.0%"));
        assert!(html.contains("10.0%"));
    }

    #[test]
    fn test_sentiment_one_decimal_place() {
        let mut result = sample_result();
        result.period2_analysis.sentiment = Sentiment {
            positive: 33.333,
            neutral: 33.35,
            negative: 33.0,
        };
        let html = render_html(&result);
        let (_, period2) = columns(&html);

        assert!(period2.contains("33.3%"));
        assert!(period2.contains("33.0%"));
        assert!(!period2.contains("33.333"));
    }

    #[test]
    fn test_one_quote_block_per_quote() {
        let mut result = sample_result();
        result.period2_analysis.content_strengths = vec![Strength {
            strength: "Structure".to_string(),
            quotes: vec!["Well organised".to_string(), "Easy to follow".to_string()],
        }];
        let html = render_html(&result);
        let (period1, period2) = columns(&html);

        // period 1: one strength quote; period 2: two strength quotes + one improvement quote
        assert_eq!(period1.matches("<blockquote>").count(), 1);
        assert_eq!(period2.matches("<blockquote>").count(), 3);
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let mut result = sample_result();
        result.period2_analysis.thematic_analysis.clear();
        result.period2_analysis.content_strengths.clear();
        result.period2_analysis.improvement_areas.clear();
        result.action_points.clear();

        let html = render_html(&result);
        let (_, period2) = columns(&html);

        assert!(!period2.contains("class=\"themes\""));
        assert!(!period2.contains("class=\"strengths\""));
        assert!(!period2.contains("class=\"improvements\""));
        assert!(!html.contains("Consolidated Action Points"));
        assert!(period2.contains("class=\"sentiment\""));
    }

    #[test]
    fn test_empty_summary_is_omitted() {
        let mut result = sample_result();
        result.comparative_summary.clear();
        assert!(!render_html(&result).contains("Comparative Summary"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let result = sample_result();
        assert_eq!(render_html(&result), render_html(&result));
    }

    #[test]
    fn test_model_text_is_escaped() {
        let mut result = sample_result();
        result.comparative_summary = "<script>alert('x')</script> & more".to_string();
        let html = render_html(&result);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
    }

    #[test]
    fn test_render_document_wraps_body() {
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            model_used: "gemini-test".to_string(),
            period1_file: "p1.csv".to_string(),
            period2_file: "p2.csv".to_string(),
        };
        let doc = render_document(&sample_result(), &metadata, "Module Content Quality Analysis");

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<h1>Module Content Quality Analysis</h1>"));
        assert!(doc.contains("p1.csv vs p2.csv"));
        assert!(doc.contains("gemini-test"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_summary_keeps_paragraph_breaks() {
        let mut result = sample_result();
        result.comparative_summary = "Para one.\n\nPara two.".to_string();
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            model_used: "gemini-test".to_string(),
            period1_file: "p1.csv".to_string(),
            period2_file: "p2.csv".to_string(),
        };
        let doc = render_document(&result, &metadata, "Report");

        assert!(doc.contains(".summary p { white-space: pre-wrap; }"));
        assert!(doc.contains("<p>Para one.\n\nPara two.</p>"));
    }
}
