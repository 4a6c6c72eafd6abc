//! Response schema for structured JSON output.
//!
//! Gemini accepts an OpenAPI-style subset with upper-case type names. The
//! shape mirrors [`crate::models::AnalysisResult`].

use serde_json::{json, Value};

/// Schema shared by both period analyses.
fn period_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": {
                "type": "OBJECT",
                "properties": {
                    "positive": { "type": "NUMBER" },
                    "neutral": { "type": "NUMBER" },
                    "negative": { "type": "NUMBER" }
                },
                "required": ["positive", "neutral", "negative"]
            },
            "thematicAnalysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "theme": { "type": "STRING" },
                        "summary": { "type": "STRING" }
                    },
                    "required": ["theme", "summary"]
                }
            },
            "contentStrengths": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "strength": { "type": "STRING" },
                        "quotes": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["strength", "quotes"]
                }
            },
            "improvementAreas": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "area": { "type": "STRING" },
                        "suggestion": { "type": "STRING" },
                        "quotes": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["area", "suggestion", "quotes"]
                }
            }
        },
        "required": ["sentiment", "thematicAnalysis", "contentStrengths", "improvementAreas"]
    })
}

/// The full `responseSchema` sent with every analysis request.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "comparativeSummary": { "type": "STRING" },
            "period1Analysis": period_analysis_schema(),
            "period2Analysis": period_analysis_schema(),
            "actionPoints": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "action": { "type": "STRING" },
                        "rationale": { "type": "STRING" }
                    },
                    "required": ["action", "rationale"]
                }
            }
        },
        "required": ["comparativeSummary", "period1Analysis", "period2Analysis", "actionPoints"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_top_level_properties() {
        let schema = response_schema();
        let props = schema["properties"].as_object().unwrap();

        assert_eq!(props.len(), 4);
        assert!(props.contains_key("comparativeSummary"));
        assert!(props.contains_key("period1Analysis"));
        assert!(props.contains_key("period2Analysis"));
        assert!(props.contains_key("actionPoints"));
    }

    #[test]
    fn test_both_periods_share_shape() {
        let schema = response_schema();
        assert_eq!(
            schema["properties"]["period1Analysis"],
            schema["properties"]["period2Analysis"]
        );
    }

    #[test]
    fn test_sentiment_is_numeric() {
        let schema = response_schema();
        let sentiment = &schema["properties"]["period1Analysis"]["properties"]["sentiment"];
        assert_eq!(sentiment["properties"]["positive"]["type"], "NUMBER");
        assert_eq!(sentiment["properties"]["neutral"]["type"], "NUMBER");
        assert_eq!(sentiment["properties"]["negative"]["type"], "NUMBER");
    }

    #[test]
    fn test_quotes_are_string_arrays() {
        let schema = response_schema();
        let strengths =
            &schema["properties"]["period2Analysis"]["properties"]["contentStrengths"]["items"];
        assert_eq!(strengths["properties"]["quotes"]["type"], "ARRAY");
        assert_eq!(strengths["properties"]["quotes"]["items"]["type"], "STRING");
    }
}
