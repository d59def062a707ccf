//! HTML dashboard generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use clarityforge_core::report::AnalysisReport;

use crate::dashboard::{Card, Dashboard};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML dashboard from an analysis report.
pub fn generate_html(report: &AnalysisReport) -> String {
    let dashboard = Dashboard::from_analysis(&report.analysis);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>ClarityForge: {}</title>\n",
        html_escape(&report.topic)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>ClarityForge</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Topic: <strong>{}</strong> | {} | {}</p>\n",
        html_escape(&report.topic),
        html_escape(&report.model),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score
    html.push_str("<section class=\"score\">\n");
    html.push_str(&ring_gauge(&dashboard));
    html.push_str(&format!(
        "<blockquote>{}</blockquote>\n",
        html_escape(dashboard.score_reasoning)
    ));
    html.push_str("</section>\n");

    push_cards(&mut html, "Missing Concepts", "concept", &dashboard.missing_concepts);
    push_cards(&mut html, "Logical Gaps", "gap", &dashboard.logical_gaps);
    push_cards(&mut html, "Improvement Tips", "tip", &dashboard.improvement_tips);

    // Reconstruction
    html.push_str("<section class=\"reconstruction\">\n");
    html.push_str("<h2>Reconstructed Explanation</h2>\n");
    for paragraph in &dashboard.paragraphs {
        html.push_str(&format!("<p>{}</p>\n", html_escape(paragraph)));
    }
    html.push_str("</section>\n");

    // Comparison
    html.push_str("<section class=\"comparison\">\n");
    html.push_str("<h2>Before / After</h2>\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Aspect</th><th>Your explanation</th><th>Reconstruction</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in dashboard.comparison {
        html.push_str(&format!(
            "<tr class=\"row\"><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&row.aspect),
            html_escape(&row.before),
            html_escape(&row.after),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Original input and raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Your explanation</summary>\n");
    html.push_str(&format!("<pre>{}</pre>\n", html_escape(&report.explanation)));
    html.push_str("</details>\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(&report.analysis).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML dashboard to a file.
pub fn write_html_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn push_cards(html: &mut String, heading: &str, class: &str, cards: &[Card<'_>]) {
    html.push_str(&format!("<section class=\"{class}s\">\n<h2>{heading}</h2>\n"));
    if cards.is_empty() {
        html.push_str("<p class=\"empty\">None found.</p>\n");
    }
    for card in cards {
        html.push_str(&format!(
            "<article class=\"card {class}\">\n<h3>{}</h3>\n",
            html_escape(card.title)
        ));
        for (label, value) in &card.fields {
            html.push_str(&format!(
                "<p><span class=\"label\">{label}</span> {}</p>\n",
                html_escape(value)
            ));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
}

/// A 270-degree ring gauge, open at the bottom.
fn ring_gauge(dashboard: &Dashboard<'_>) -> String {
    let radius = 70.0_f64;
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let arc = circumference * 0.75;
    let filled = arc * dashboard.gauge_fill();

    let mut svg = String::from(
        "<svg class=\"gauge\" width=\"192\" height=\"192\" viewBox=\"0 0 192 192\" xmlns=\"http://www.w3.org/2000/svg\">\n",
    );
    svg.push_str(&format!(
        "  <circle cx=\"96\" cy=\"96\" r=\"{radius}\" fill=\"none\" stroke=\"#1f2937\" stroke-width=\"20\" stroke-dasharray=\"{arc:.2} {circumference:.2}\" transform=\"rotate(135 96 96)\"/>\n"
    ));
    svg.push_str(&format!(
        "  <circle class=\"band-{}\" cx=\"96\" cy=\"96\" r=\"{radius}\" fill=\"none\" stroke=\"{}\" stroke-width=\"20\" stroke-dasharray=\"{filled:.2} {circumference:.2}\" transform=\"rotate(135 96 96)\"/>\n",
        dashboard.band.label(),
        dashboard.band.color(),
    ));
    svg.push_str(&format!(
        "  <text x=\"96\" y=\"96\" font-size=\"36\" font-weight=\"bold\" fill=\"currentColor\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
        html_escape(&dashboard.score_label())
    ));
    svg.push_str(
        "  <text x=\"96\" y=\"128\" font-size=\"10\" fill=\"#94a3b8\" text-anchor=\"middle\" letter-spacing=\"2\">CLARITY INDEX</text>\n",
    );
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --muted: #6b7280; --card: #f9fafb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #0a0a0c; --fg: #f9fafb; --border: #374151; --muted: #94a3b8; --card: #111827; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 60rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: var(--muted); }
.score { display: flex; align-items: center; gap: 2rem; }
blockquote { font-style: italic; color: var(--muted); margin: 0; }
.card { border: 1px solid var(--border); background: var(--card); border-radius: 12px; padding: 1rem 1.25rem; margin: 0.75rem 0; }
.card h3 { margin: 0 0 0.5rem; }
.label { font-size: 0.7rem; font-weight: bold; text-transform: uppercase; letter-spacing: 0.1em; color: var(--muted); }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); }
pre { overflow-x: auto; white-space: pre-wrap; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;
