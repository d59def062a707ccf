//! Exportable analysis report.
//!
//! Written only when the user asks for an output file; nothing reads it
//! back automatically.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnalysisRequest, ClarityAnalysis};

/// A completed analysis with the input that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Topic as sent to the model.
    pub topic: String,
    pub explanation: String,
    /// Model the analysis was requested from.
    pub model: String,
    pub analysis: ClarityAnalysis,
}

impl AnalysisReport {
    pub fn new(request: &AnalysisRequest, model: &str, analysis: ClarityAnalysis) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            topic: request.effective_topic().to_string(),
            explanation: request.explanation.clone(),
            model: model.to_string(),
            analysis,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalysisReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::sample_analysis;

    #[test]
    fn report_uses_effective_topic() {
        let request = AnalysisRequest::new("", "Gravity pulls things down.");
        let report = AnalysisReport::new(&request, "gemini-3-pro-preview", sample_analysis());
        assert_eq!(report.topic, "General Knowledge");
        assert_eq!(report.model, "gemini-3-pro-preview");
    }

    #[test]
    fn save_and_load() {
        let request = AnalysisRequest::new("Gravity", "Gravity pulls things down.");
        let report = AnalysisReport::new(&request, "m", sample_analysis());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        report.save_json(&path).unwrap();

        let loaded = AnalysisReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = AnalysisReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }

    #[test]
    fn save_under_a_file_names_the_path() {
        let report = AnalysisReport::new(&AnalysisRequest::new("t", "e"), "m", sample_analysis());
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = report.save_json(&blocker.join("out.json")).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to create directory"));
        assert!(message.contains("blocker"));
    }
}
