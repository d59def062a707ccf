//! Presentation model for a completed analysis.
//!
//! Pure and deterministic: every collection element becomes exactly one
//! card or row, in the order the model returned them.

use clarityforge_core::model::{ClarityAnalysis, ComparisonPoint};

/// Scores below this are in the low band.
pub const MID_BAND_FLOOR: f64 = 40.0;
/// Scores at or above this are in the high band.
pub const HIGH_BAND_FLOOR: f64 = 70.0;

/// Colour band of the score gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeBand {
    Low,
    Mid,
    High,
}

impl GaugeBand {
    pub fn for_score(score: f64) -> Self {
        if score < MID_BAND_FLOOR {
            GaugeBand::Low
        } else if score < HIGH_BAND_FLOOR {
            GaugeBand::Mid
        } else {
            GaugeBand::High
        }
    }

    /// CSS colour for the gauge arc.
    pub fn color(self) -> &'static str {
        match self {
            GaugeBand::Low => "#ef4444",
            GaugeBand::Mid => "#f59e0b",
            GaugeBand::High => "#10b981",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GaugeBand::Low => "low",
            GaugeBand::Mid => "mid",
            GaugeBand::High => "high",
        }
    }
}

/// One rendered block: a heading plus labelled text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'static str, &'a str)>,
}

/// Everything a renderer needs, borrowed from the analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub score: f64,
    pub band: GaugeBand,
    pub score_reasoning: &'a str,
    pub missing_concepts: Vec<Card<'a>>,
    pub logical_gaps: Vec<Card<'a>>,
    pub improvement_tips: Vec<Card<'a>>,
    pub paragraphs: Vec<&'a str>,
    pub comparison: &'a [ComparisonPoint],
}

impl<'a> Dashboard<'a> {
    pub fn from_analysis(analysis: &'a ClarityAnalysis) -> Self {
        Self {
            score: analysis.score,
            band: GaugeBand::for_score(analysis.score),
            score_reasoning: &analysis.score_reasoning,
            missing_concepts: analysis
                .missing_concepts
                .iter()
                .map(|c| Card {
                    title: &c.name,
                    fields: vec![
                        ("Why", c.reason.as_str()),
                        ("Dependency chain", c.dependency_chain.as_str()),
                    ],
                })
                .collect(),
            logical_gaps: analysis
                .logical_gaps
                .iter()
                .map(|g| Card {
                    title: &g.gap,
                    fields: vec![("Evidence", g.evidence.as_str())],
                })
                .collect(),
            improvement_tips: analysis
                .improvement_tips
                .iter()
                .map(|t| Card {
                    title: &t.tip,
                    fields: vec![("Thinking pattern", t.thinking_pattern.as_str())],
                })
                .collect(),
            paragraphs: analysis.reconstruction_paragraphs(),
            comparison: &analysis.comparison,
        }
    }

    /// Fraction of the gauge arc to fill. Only the drawing is clamped; the
    /// displayed score is the raw value.
    pub fn gauge_fill(&self) -> f64 {
        (self.score / 100.0).clamp(0.0, 1.0)
    }

    /// Score formatted for display, without a trailing `.0` for whole numbers.
    pub fn score_label(&self) -> String {
        if self.score.fract() == 0.0 {
            format!("{}", self.score as i64)
        } else {
            format!("{}", self.score)
        }
    }

    /// Total number of cards and rows across all collection sections.
    pub fn block_count(&self) -> usize {
        self.missing_concepts.len()
            + self.logical_gaps.len()
            + self.improvement_tips.len()
            + self.comparison.len()
    }
}
