//! The fixed instruction and schema bundle sent with every analysis.

use crate::schema::ResponseSchema;

/// Default remote model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Default reasoning-effort hint passed through to the model untouched.
pub const DEFAULT_THINKING_BUDGET: u32 = 32_768;

/// Mime type the model is asked to answer with.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Role and method instructions for the analysis engine.
pub const SYSTEM_INSTRUCTION: &str = "You are ClarityForge, a Cognitive Understanding Analysis Engine.
You are not a tutor or chatbot. You do not answer questions directly.
Your job is to:
- Audit human understanding
- Detect gaps in reasoning
- Expose false confidence
- Reconstruct clarity
- Improve thinking patterns

Always think in terms of:
- Concept dependencies
- Logical flow
- Depth of explanation
- Causal reasoning

Analyze the user's input following these steps:
1. Normalize the explanation (remove filler, extract claims).
2. Diagnose understanding (0-100 score, identify breaks, false confidence).
3. Map knowledge gaps (list missing concepts & dependencies).
4. Reconstruct clarity (rebuild from fundamentals).
5. Provide meta-cognitive feedback.

Output MUST be strictly JSON.";

/// Everything about an analysis request that does not depend on user input.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisBundle {
    pub model: String,
    pub system_instruction: String,
    pub thinking_budget: Option<u32>,
    pub response_mime_type: String,
    pub schema: ResponseSchema,
}

impl AnalysisBundle {
    /// The standard bundle for `model`.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            thinking_budget: Some(DEFAULT_THINKING_BUDGET),
            response_mime_type: RESPONSE_MIME_TYPE.to_string(),
            schema: ResponseSchema::clarity_analysis(),
        }
    }

    pub fn with_thinking_budget(mut self, budget: Option<u32>) -> Self {
        self.thinking_budget = budget;
        self
    }
}

impl Default for AnalysisBundle {
    fn default() -> Self {
        Self::for_model(DEFAULT_MODEL)
    }
}
