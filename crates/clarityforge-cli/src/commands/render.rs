//! Plain-text rendering of an analysis dashboard.

use std::fmt::Write;

use comfy_table::{Cell, Color, ContentArrangement, Table};

use clarityforge_report::{Card, Dashboard, GaugeBand};

pub fn render_dashboard(dashboard: &Dashboard<'_>) -> String {
    let mut out = String::new();

    let mut score = Table::new();
    score.set_content_arrangement(ContentArrangement::Dynamic);
    score.set_header(vec!["Clarity Index", "Band", "Reasoning"]);
    score.add_row(vec![
        Cell::new(dashboard.score_label()).fg(band_color(dashboard.band)),
        Cell::new(dashboard.band.label()),
        Cell::new(dashboard.score_reasoning),
    ]);
    let _ = writeln!(out, "{score}");

    push_cards(&mut out, "Missing Concepts", &dashboard.missing_concepts);
    push_cards(&mut out, "Logical Gaps", &dashboard.logical_gaps);
    push_cards(&mut out, "Improvement Tips", &dashboard.improvement_tips);

    let _ = writeln!(out, "\nReconstructed Explanation");
    for paragraph in &dashboard.paragraphs {
        let _ = writeln!(out, "  {paragraph}");
    }

    if !dashboard.comparison.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Aspect", "Your explanation", "Reconstruction"]);
        for row in dashboard.comparison {
            table.add_row(vec![
                Cell::new(&row.aspect),
                Cell::new(&row.before),
                Cell::new(&row.after),
            ]);
        }
        let _ = writeln!(out, "\nBefore / After\n{table}");
    }

    out
}

fn push_cards(out: &mut String, heading: &str, cards: &[Card<'_>]) {
    let _ = writeln!(out, "\n{heading} ({})", cards.len());
    for card in cards {
        let _ = writeln!(out, "  * {}", card.title);
        for (label, value) in &card.fields {
            let _ = writeln!(out, "      {label}: {value}");
        }
    }
}

fn band_color(band: GaugeBand) -> Color {
    match band {
        GaugeBand::Low => Color::Red,
        GaugeBand::Mid => Color::Yellow,
        GaugeBand::High => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarityforge_core::model::{ClarityAnalysis, ComparisonPoint, LogicalGap};

    fn analysis(score: f64) -> ClarityAnalysis {
        ClarityAnalysis {
            score,
            score_reasoning: "Clear but shallow.".into(),
            missing_concepts: vec![],
            logical_gaps: vec![
                LogicalGap {
                    gap: "First gap".into(),
                    evidence: "quote one".into(),
                },
                LogicalGap {
                    gap: "Second gap".into(),
                    evidence: "quote two".into(),
                },
            ],
            reconstructed_explanation: "Line one.\nLine two.".into(),
            comparison: vec![ComparisonPoint {
                aspect: "Depth".into(),
                before: "shallow".into(),
                after: "layered".into(),
            }],
            improvement_tips: vec![],
            thinking_process: None,
        }
    }

    #[test]
    fn renders_every_section_in_order() {
        let analysis = analysis(72.0);
        let text = render_dashboard(&Dashboard::from_analysis(&analysis));

        assert!(text.contains("72"));
        assert!(text.contains("high"));
        assert!(text.contains("Missing Concepts (0)"));
        assert!(text.contains("Logical Gaps (2)"));
        let first = text.find("First gap").unwrap();
        let second = text.find("Second gap").unwrap();
        assert!(first < second);
        assert!(text.contains("  Line one.\n  Line two.\n"));
        assert!(text.contains("layered"));
    }

    #[test]
    fn comparison_table_omitted_when_empty() {
        let mut analysis = analysis(10.0);
        analysis.comparison.clear();
        let text = render_dashboard(&Dashboard::from_analysis(&analysis));
        assert!(!text.contains("Before / After"));
        assert!(text.contains("low"));
    }
}
