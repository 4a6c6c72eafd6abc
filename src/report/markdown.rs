//! Markdown report generation.
//!
//! Same layout as the HTML report, flattened: the two periods follow each
//! other instead of sitting side by side.

use super::ReportMetadata;
use crate::models::{
    ActionPoint, AnalysisResult, ImprovementArea, Period, PeriodAnalysis, Strength, Theme,
};

/// Generate a complete Markdown report.
pub fn render_markdown(result: &AnalysisResult, metadata: &ReportMetadata, title: &str) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", title));

    // Metadata section
    output.push_str(&generate_metadata_section(metadata));

    // Comparative summary
    output.push_str(&generate_summary_section(&result.comparative_summary));

    // One section per period
    for period in Period::ALL {
        output.push_str(&generate_period_section(period, result.period(period)));
    }

    // Action points
    output.push_str(&generate_action_points_section(&result.action_points));

    // Footer
    output.push_str("---\n\n*Report generated by CoursePulse*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Teaching Period 1:** `{}`\n", metadata.period1_file));
    section.push_str(&format!("- **Teaching Period 2:** `{}`\n", metadata.period2_file));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!(
        "- **Generated:** {}\n\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

fn generate_summary_section(summary: &str) -> String {
    if summary.is_empty() {
        return String::new();
    }

    format!("## Comparative Summary\n\n{}\n\n", summary)
}

/// Generate all subsections for one period.
fn generate_period_section(period: Period, analysis: &PeriodAnalysis) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", period));

    // Sentiment table
    let s = &analysis.sentiment;
    section.push_str("### Sentiment Analysis\n\n");
    section.push_str("| Positive | Neutral | Negative |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {:.1}% | {:.1}% | {:.1}% |\n\n",
        s.positive, s.neutral, s.negative
    ));

    section.push_str(&generate_themes(&analysis.thematic_analysis));
    section.push_str(&generate_strengths(&analysis.content_strengths));
    section.push_str(&generate_improvements(&analysis.improvement_areas));

    section
}

fn generate_themes(themes: &[Theme]) -> String {
    if themes.is_empty() {
        return String::new();
    }

    let mut section = String::from("### Key Themes\n\n");
    for item in themes {
        section.push_str(&format!("- **{}:** {}\n", item.theme, item.summary));
    }
    section.push('\n');

    section
}

fn generate_strengths(strengths: &[Strength]) -> String {
    if strengths.is_empty() {
        return String::new();
    }

    let mut section = String::from("### Content Strengths\n\n");
    for item in strengths {
        section.push_str(&format!("#### {}\n\n", item.strength));
        section.push_str(&quote_lines(&item.quotes));
    }

    section
}

fn generate_improvements(areas: &[ImprovementArea]) -> String {
    if areas.is_empty() {
        return String::new();
    }

    let mut section = String::from("### Areas for Improvement\n\n");
    for area in areas {
        section.push_str(&format!("#### {}\n\n", area.area));
        section.push_str(&format!("{}\n\n", area.suggestion));
        if !area.quotes.is_empty() {
            section.push_str("**Supporting Feedback:**\n\n");
            section.push_str(&quote_lines(&area.quotes));
        }
    }

    section
}

fn quote_lines(quotes: &[String]) -> String {
    quotes
        .iter()
        .map(|q| format!("> \"{}\"\n\n", q.replace('\n', " ")))
        .collect()
}

fn generate_action_points_section(actions: &[ActionPoint]) -> String {
    if actions.is_empty() {
        return String::new();
    }

    let mut section = String::from("## Consolidated Action Points\n\n");
    for (i, point) in actions.iter().enumerate() {
        section.push_str(&format!("{}. **{}**\n   {}\n", i + 1, point.action, point.rationale));
    }
    section.push('\n');

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_result;
    use chrono::Utc;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            generated_at: Utc::now(),
            model_used: "gemini-test".to_string(),
            period1_file: "spring.csv".to_string(),
            period2_file: "autumn.csv".to_string(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = render_markdown(&sample_result(), &metadata(), "Feedback Report");

        assert!(markdown.starts_with("# Feedback Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`spring.csv`"));
        assert!(markdown.contains("## Comparative Summary"));
        assert!(markdown.contains("## Teaching Period 1"));
        assert!(markdown.contains("## Teaching Period 2"));
        assert!(markdown.contains("| 80.0% | 10.0% | 10.0% |"));
        assert!(markdown.contains("> \"Great examples\""));
        assert!(markdown.contains("1. **Add more examples**"));
    }

    #[test]
    fn test_period_one_has_no_improvement_section() {
        let markdown = render_markdown(&sample_result(), &metadata(), "Report");
        let period2_start = markdown.find("## Teaching Period 2").unwrap();

        assert!(!markdown[..period2_start].contains("### Areas for Improvement"));
        assert!(markdown[period2_start..].contains("### Areas for Improvement"));
    }

    #[test]
    fn test_empty_action_points_omitted() {
        let mut result = sample_result();
        result.action_points.clear();

        let markdown = render_markdown(&result, &metadata(), "Report");
        assert!(!markdown.contains("Consolidated Action Points"));
    }

    #[test]
    fn test_multiline_quote_stays_in_blockquote() {
        let quotes = vec!["line one\nline two".to_string()];
        assert_eq!(quote_lines(&quotes), "> \"line one line two\"\n\n");
    }
}
