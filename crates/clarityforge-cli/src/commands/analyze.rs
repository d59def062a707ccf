//! The `clarityforge analyze` command.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;

use clarityforge_core::report::AnalysisReport;
use clarityforge_core::{AnalysisGateway, AnalysisRequest, ClarityAnalysis, Phase, SessionController, SubmitOutcome};
use clarityforge_providers::{create_provider, load_config_from};
use clarityforge_report::{generate_html, write_html_report, Dashboard};

use super::render::render_dashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable dashboard on stdout
    Text,
    /// Saved analysis report (JSON)
    Json,
    /// Self-contained HTML dashboard
    Html,
}

pub struct AnalyzeArgs {
    pub topic: String,
    pub explanation: Option<String>,
    pub file: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub model: Option<String>,
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let explanation = read_explanation(args.explanation, args.file.as_deref())?;

    let (mut controller, model) = build_controller(args.config.as_deref(), args.model)?;
    controller.set_topic(args.topic);
    controller.set_explanation(explanation);

    match controller.submit() {
        SubmitOutcome::Started(_) => {}
        SubmitOutcome::Rejected(message) => anyhow::bail!(message),
        SubmitOutcome::Ignored => anyhow::bail!("an analysis is already in progress"),
    }
    eprintln!("Analyzing with {model}...");

    let interrupted = tokio::select! {
        _ = controller.settle() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        controller.reset();
        anyhow::bail!("cancelled");
    }

    let state = controller.state();
    let analysis = match state.phase() {
        Phase::Success(analysis) => analysis.clone(),
        Phase::Error(message) => anyhow::bail!("{message}"),
        Phase::Idle | Phase::Loading { .. } => anyhow::bail!("analysis did not complete"),
    };
    let request = state
        .submitted()
        .context("analysis finished without a submitted request")?;

    emit(request, &model, analysis, args.format, args.output.as_deref())
}

/// Load config, apply the model override and wire up a session.
///
/// Fails before any request is made when the provider cannot be built,
/// e.g. because no API key is configured.
pub fn build_controller(
    config_path: Option<&Path>,
    model: Option<String>,
) -> Result<(SessionController, String)> {
    let mut config = load_config_from(config_path)?;
    if let Some(model) = model {
        config.model = model;
    }

    let provider = create_provider(&config)?;
    let gateway = AnalysisGateway::new(provider, Arc::new(config.bundle()));
    tracing::debug!(
        provider = gateway.provider_name(),
        model = %config.model,
        timeout_secs = config.timeout_secs,
        "gateway ready"
    );
    let controller = SessionController::new(gateway).with_timeout(config.timeout());
    Ok((controller, config.model))
}

fn read_explanation(explanation: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = explanation {
        return Ok(text);
    }
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read explanation: {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read explanation from stdin")?;
            Ok(text)
        }
    }
}

pub fn emit(
    request: &AnalysisRequest,
    model: &str,
    analysis: ClarityAnalysis,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", render_dashboard(&Dashboard::from_analysis(&analysis)));
        }
        OutputFormat::Json => {
            let report = AnalysisReport::new(request, model, analysis);
            match output {
                Some(path) => {
                    report.save_json(path)?;
                    eprintln!("Report saved to: {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        OutputFormat::Html => {
            let report = AnalysisReport::new(request, model, analysis);
            match output {
                Some(path) => {
                    write_html_report(&report, path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                None => println!("{}", generate_html(&report)),
            }
        }
    }
    Ok(())
}
