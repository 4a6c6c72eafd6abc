//! Prompt assembly for the comparative content analysis.

/// Instructions sent ahead of the two CSV blocks.
const INSTRUCTIONS: &str = r#"You are a specialist content quality analyst. Your task is to compare feedback for a specific module from two different teaching periods.
First, analyze each period's feedback independently. Then, provide a comparative summary and a final list of consolidated action points.

IMPORTANT: Your analysis for both periods must focus exclusively on the quality of the content. Ignore any comments related to the trainer, instructor, presenter, or teaching style.

**Analysis for Teaching Period 1 (using the first CSV):**
1.  **Sentiment Analysis:** Calculate the percentage of positive, neutral, and negative sentiment for all content-related comments.
2.  **Thematic Analysis:** Identify the top 3-5 recurring themes related to the module's content.
3.  **Content Strengths:** Identify 2-3 key strengths of the content, supported by direct quotes.
4.  **Areas for Improvement:** Identify the top 2-3 critical areas for content improvement, with suggestions and direct quotes.

**Analysis for Teaching Period 2 (using the second CSV):**
1.  **Sentiment Analysis:** Calculate sentiment percentages.
2.  **Thematic Analysis:** Identify top recurring themes.
3.  **Content Strengths:** Identify key strengths with quotes.
4.  **Areas for Improvement:** Identify critical areas for improvement with quotes.

**Then, provide a Comparative Summary:**
Synthesize the findings from both periods. Highlight key trends, changes in sentiment, recurring vs. new themes, and whether issues from Period 1 were addressed or persisted in Period 2.

**Finally, provide Consolidated Action Points:**
Based on the *entire* analysis of both periods, create a list of the 3-5 most critical, actionable steps that should be taken to improve the module's content. For each action point, provide a brief rationale explaining why it's important, drawing from the feedback.

Return your complete analysis in the specified JSON format."#;

/// Builds the full prompt with both feedback files embedded verbatim.
pub fn build_prompt(period1_csv: &str, period2_csv: &str) -> String {
    let capacity = INSTRUCTIONS.len() + period1_csv.len() + period2_csv.len() + 128;
    let mut prompt = String::with_capacity(capacity);

    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(&csv_block("Teaching Period 1 CSV:", period1_csv));
    prompt.push('\n');
    prompt.push_str(&csv_block("Teaching Period 2 CSV:", period2_csv));

    prompt
}

fn csv_block(label: &str, data: &str) -> String {
    format!("{}\n```csv\n{}\n```\n", label, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_files_verbatim() {
        let p1 = "comment\nGreat examples,5";
        let p2 = "comment\nToo theoretical,2";
        let prompt = build_prompt(p1, p2);

        assert!(prompt.contains("Teaching Period 1 CSV:\n```csv\ncomment\nGreat examples,5\n```"));
        assert!(prompt.contains("Teaching Period 2 CSV:\n```csv\ncomment\nToo theoretical,2\n```"));
    }

    #[test]
    fn test_prompt_keeps_period_order() {
        let prompt = build_prompt("FIRST", "SECOND");
        let first = prompt.find("FIRST").unwrap();
        let second = prompt.find("SECOND").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_prompt_excludes_delivery_commentary() {
        let prompt = build_prompt("", "");
        assert!(prompt.contains("focus exclusively on the quality of the content"));
        assert!(prompt.contains("Ignore any comments related to the trainer"));
    }

    #[test]
    fn test_prompt_requests_all_sections() {
        let prompt = build_prompt("", "");
        assert!(prompt.contains("Sentiment Analysis"));
        assert!(prompt.contains("top 3-5 recurring themes"));
        assert!(prompt.contains("2-3 key strengths"));
        assert!(prompt.contains("Areas for Improvement"));
        assert!(prompt.contains("Comparative Summary"));
        assert!(prompt.contains("3-5 most critical, actionable steps"));
    }
}
