//! Data models for the feedback analysis.
//!
//! This module contains the typed shape of the model's JSON answer and the
//! validation applied at the deserialization boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Allowed drift of the three sentiment percentages away from 100.
const SENTIMENT_SUM_TOLERANCE: f64 = 5.0;

/// One of the two teaching periods being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    First,
    Second,
}

impl Period {
    /// Both periods, in display order.
    pub const ALL: [Period; 2] = [Period::First, Period::Second];

    /// 1-based period number.
    pub fn number(&self) -> u8 {
        match self {
            Period::First => 1,
            Period::Second => 2,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Teaching Period {}", self.number())
    }
}

/// Sentiment split of content-related comments, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Sentiment {
    /// Sum of the three percentages.
    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

/// A recurring theme in the feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub theme: String,
    pub summary: String,
}

/// A content strength, backed by learner quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub strength: String,
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// An area where the content should improve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub area: String,
    pub suggestion: String,
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// A consolidated recommendation drawn from both periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPoint {
    pub action: String,
    pub rationale: String,
}

/// Analysis of a single teaching period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAnalysis {
    pub sentiment: Sentiment,
    #[serde(default)]
    pub thematic_analysis: Vec<Theme>,
    #[serde(default)]
    pub content_strengths: Vec<Strength>,
    #[serde(default)]
    pub improvement_areas: Vec<ImprovementArea>,
}

/// The complete comparative analysis returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub comparative_summary: String,
    #[serde(rename = "period1Analysis")]
    pub period1_analysis: PeriodAnalysis,
    #[serde(rename = "period2Analysis")]
    pub period2_analysis: PeriodAnalysis,
    #[serde(default)]
    pub action_points: Vec<ActionPoint>,
}

/// A value in the model's answer that parsed but is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{period} sentiment {field} is {value}, expected a percentage between 0 and 100")]
pub struct ValidationError {
    pub period: Period,
    pub field: &'static str,
    pub value: f64,
}

impl AnalysisResult {
    /// Returns the analysis for the given period.
    pub fn period(&self, period: Period) -> &PeriodAnalysis {
        match period {
            Period::First => &self.period1_analysis,
            Period::Second => &self.period2_analysis,
        }
    }

    /// Checks the sentiment percentages of both periods.
    ///
    /// Each value must be a finite percentage. A total far from 100 is only
    /// logged, since the model's arithmetic is trusted beyond that.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for period in Period::ALL {
            let sentiment = &self.period(period).sentiment;
            for (field, value) in [
                ("positive", sentiment.positive),
                ("neutral", sentiment.neutral),
                ("negative", sentiment.negative),
            ] {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    return Err(ValidationError {
                        period,
                        field,
                        value,
                    });
                }
            }

            let total = sentiment.total();
            if (total - 100.0).abs() > SENTIMENT_SUM_TOLERANCE {
                warn!("{} sentiment sums to {:.1}%, not 100%", period, total);
            }
        }

        Ok(())
    }
}
