//! The `clarityforge session` command.
//!
//! A line-oriented front end over [`SessionController`]. Plain lines are
//! appended to the explanation; lines starting with `:` are commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use clarityforge_core::report::AnalysisReport;
use clarityforge_core::{Phase, SessionController, SubmitOutcome};
use clarityforge_report::Dashboard;

use super::analyze::build_controller;
use super::render::render_dashboard;

const HELP: &str = "Type your explanation, then:
  :topic <text>   set the topic
  :submit         analyze the explanation
  :show           print the current state
  :save <path>    save the last analysis as JSON
  :reset          clear everything
  :quit           leave the session";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Topic(&'a str),
    Submit,
    Show,
    Save(&'a str),
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
    Text(&'a str),
}

fn parse_line(line: &str) -> Input<'_> {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Text(line);
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(n, r)| (n, r.trim()));
    match name {
        "topic" => Input::Topic(rest),
        "submit" => Input::Submit,
        "show" => Input::Show,
        "save" => Input::Save(rest),
        "reset" => Input::Reset,
        "help" => Input::Help,
        "quit" | "q" => Input::Quit,
        other => Input::Unknown(other),
    }
}

pub async fn execute(config: Option<PathBuf>, model: Option<String>) -> Result<()> {
    let (mut controller, model) = build_controller(config.as_deref(), model)?;
    eprintln!("clarityforge session {} ({model})", controller.id());
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Text(text) => {
                let mut explanation = controller.state().explanation().to_string();
                if !explanation.is_empty() {
                    explanation.push('\n');
                }
                explanation.push_str(text);
                controller.set_explanation(explanation);
            }
            Input::Topic(topic) => {
                controller.set_topic(topic);
                eprintln!("Topic set.");
            }
            Input::Submit => submit(&mut controller).await,
            Input::Show => show(&controller),
            Input::Save(path) => {
                if let Err(e) = save(&controller, &model, path) {
                    eprintln!("Error: {e:#}");
                }
            }
            Input::Reset => {
                controller.reset();
                eprintln!("Session cleared.");
            }
            Input::Help => eprintln!("{HELP}"),
            Input::Quit => break,
            Input::Unknown(name) => eprintln!("Unknown command :{name} (try :help)"),
        }
    }
    Ok(())
}

async fn submit(controller: &mut SessionController) {
    match controller.submit() {
        SubmitOutcome::Started(_) => eprintln!("Analyzing..."),
        SubmitOutcome::Rejected(message) => {
            eprintln!("Error: {message}");
            return;
        }
        SubmitOutcome::Ignored => return,
    }

    let interrupted = tokio::select! {
        _ = controller.settle() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        controller.reset();
        eprintln!("Cancelled. Session cleared.");
        return;
    }

    match controller.state().phase() {
        Phase::Success(analysis) => {
            println!("{}", render_dashboard(&Dashboard::from_analysis(analysis)));
        }
        Phase::Error(message) => eprintln!("Error: {message}"),
        Phase::Idle | Phase::Loading { .. } => {}
    }
}

fn show(controller: &SessionController) {
    let state = controller.state();
    println!("status: {}", state.status());
    println!("topic: {}", state.topic());
    println!("explanation:\n{}", state.explanation());
    if let Some(error) = state.error() {
        println!("error: {error}");
    }
}

fn save(controller: &SessionController, model: &str, path: &str) -> Result<()> {
    let state = controller.state();
    let (Some(analysis), Some(request)) = (state.result(), state.submitted()) else {
        eprintln!("Nothing to save yet.");
        return Ok(());
    };
    if path.is_empty() {
        eprintln!("Usage: :save <path>");
        return Ok(());
    }
    let report = AnalysisReport::new(request, model, analysis.clone());
    report.save_json(Path::new(path))?;
    eprintln!("Report saved to: {path}");
    Ok(())
}
