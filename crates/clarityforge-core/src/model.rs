//! Core data model types for clarityforge.
//!
//! These are the types that flow between the session controller, the
//! analysis gateway, and the presentation layer.

use serde::{Deserialize, Serialize};

/// Label used when the user leaves the topic blank.
pub const DEFAULT_TOPIC: &str = "General Knowledge";

/// A single analysis request built from the user's two inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Freeform topic. May be empty.
    #[serde(default)]
    pub topic: String,
    /// The user's explanation. Must be non-blank by the time it reaches a gateway.
    pub explanation: String,
}

impl AnalysisRequest {
    pub fn new(topic: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            explanation: explanation.into(),
        }
    }

    /// The topic as sent to the model, with [`DEFAULT_TOPIC`] substituted for blank input.
    pub fn effective_topic(&self) -> &str {
        if self.topic.trim().is_empty() {
            DEFAULT_TOPIC
        } else {
            &self.topic
        }
    }

    /// Whether the explanation contains anything besides whitespace.
    pub fn has_explanation(&self) -> bool {
        !self.explanation.trim().is_empty()
    }

    /// The user-turn prompt embedding both fields as plain text.
    pub fn prompt(&self) -> String {
        format!(
            "Topic: {}\n\nUser Explanation: {}",
            self.effective_topic(),
            self.explanation
        )
    }
}

/// The structured critique returned by the remote model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarityAnalysis {
    /// Understanding depth score. Nominally 0-100 but passed through as returned.
    pub score: f64,
    /// Brief justification for the score.
    pub score_reasoning: String,
    pub missing_concepts: Vec<MissingConcept>,
    pub logical_gaps: Vec<LogicalGap>,
    /// Explanation rebuilt from fundamentals. Each line is a paragraph.
    pub reconstructed_explanation: String,
    pub comparison: Vec<ComparisonPoint>,
    pub improvement_tips: Vec<ImprovementTip>,
    /// Free-form reasoning trace some models attach. Not part of the required set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_process: Option<String>,
}

/// A prerequisite concept the explanation failed to demonstrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingConcept {
    pub name: String,
    pub reason: String,
    /// Human-readable chain of the ideas this concept itself depends on.
    pub dependency_chain: String,
}

/// A located break in the explanation's reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalGap {
    pub gap: String,
    pub evidence: String,
}

/// One row of the before/after comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub aspect: String,
    pub before: String,
    pub after: String,
}

/// A meta-cognitive improvement tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementTip {
    pub tip: String,
    pub thinking_pattern: String,
}

impl ClarityAnalysis {
    /// Paragraphs of the reconstructed explanation, one per line break.
    pub fn reconstruction_paragraphs(&self) -> Vec<&str> {
        self.reconstructed_explanation
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A schema-conforming analysis with one element per collection.
    pub fn sample_analysis() -> ClarityAnalysis {
        ClarityAnalysis {
            score: 55.0,
            score_reasoning: "Names the effect but not the cause.".into(),
            missing_concepts: vec![MissingConcept {
                name: "Mass".into(),
                reason: "Gravity is described without the bodies that produce it.".into(),
                dependency_chain: "Mass -> Gravitational field -> Force".into(),
            }],
            logical_gaps: vec![LogicalGap {
                gap: "\"Down\" is undefined".into(),
                evidence: "Gravity pulls things down.".into(),
            }],
            reconstructed_explanation:
                "Every mass attracts every other mass.\nOn Earth, \"down\" points toward its centre."
                    .into(),
            comparison: vec![ComparisonPoint {
                aspect: "Cause".into(),
                before: "Unstated".into(),
                after: "Mutual attraction between masses".into(),
            }],
            improvement_tips: vec![ImprovementTip {
                tip: "Ask what produces the effect you describe.".into(),
                thinking_pattern: "Causal reasoning".into(),
            }],
            thinking_process: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_analysis;
    use super::*;

    #[test]
    fn blank_topic_uses_default_label() {
        let req = AnalysisRequest::new("   ", "Gravity pulls things down.");
        assert_eq!(req.effective_topic(), DEFAULT_TOPIC);
        assert_eq!(
            req.prompt(),
            "Topic: General Knowledge\n\nUser Explanation: Gravity pulls things down."
        );
    }

    #[test]
    fn explicit_topic_is_kept() {
        let req = AnalysisRequest::new("Orbital Mechanics", "Things fall around the Earth.");
        assert!(req.prompt().starts_with("Topic: Orbital Mechanics\n\n"));
    }

    #[test]
    fn whitespace_explanation_is_not_an_explanation() {
        assert!(!AnalysisRequest::new("", " \t\n ").has_explanation());
        assert!(AnalysisRequest::new("", " x ").has_explanation());
    }

    #[test]
    fn serializes_with_schema_field_names() {
        let value = serde_json::to_value(sample_analysis()).unwrap();
        assert!(value.get("scoreReasoning").is_some());
        assert!(value["missingConcepts"][0].get("dependencyChain").is_some());
        assert!(value["improvementTips"][0].get("thinkingPattern").is_some());
        assert!(value.get("thinkingProcess").is_none());
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let mut analysis = sample_analysis();
        analysis.logical_gaps.push(LogicalGap {
            gap: "second".into(),
            evidence: "b".into(),
        });
        analysis.logical_gaps.push(LogicalGap {
            gap: "third".into(),
            evidence: "c".into(),
        });

        let json = serde_json::to_string(&analysis).unwrap();
        let back: ClarityAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
        let gaps: Vec<&str> = back.logical_gaps.iter().map(|g| g.gap.as_str()).collect();
        assert_eq!(gaps, ["\"Down\" is undefined", "second", "third"]);
    }

    #[test]
    fn paragraphs_split_on_every_line_break() {
        let mut analysis = sample_analysis();
        analysis.reconstructed_explanation = "one\r\ntwo\n\nthree".into();
        assert_eq!(analysis.reconstruction_paragraphs(), ["one", "two", "", "three"]);
    }
}
