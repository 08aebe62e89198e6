use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use smartdoc_api::ApiClient;
use smartdoc_api::types::EvaluationResponse;
use smartdoc_application::interview::apply_chat_response;
use smartdoc_application::reflection::{self, REFLECTION_QUESTIONS};
use smartdoc_core::session::ConversationChannel;
use smartdoc_core::{Category, SessionState};
use smartdoc_infrastructure::SessionStorage;

use super::{build_client, prompt_line};

pub async fn run(channel_label: &str, new_session: bool) -> Result<()> {
    let client = build_client()?;
    let session_storage = SessionStorage::new()?;

    let mut state = SessionState::new();
    if new_session {
        session_storage.clear()?;
        state.new_session();
    } else if let Some(persisted) = session_storage.load_session_id()? {
        // Continue the persisted session: adopt its id into an empty state;
        // discoveries refill as the conversation progresses.
        state.begin_restore(persisted);
    } else {
        state.new_session();
    }

    let mut channel = ConversationChannel::from_label(channel_label);

    println!(
        "{}",
        "SmartDoc interview. Type a question to the patient.".bold()
    );
    println!(
        "Commands: {} switch channel, {} session overview, {} submit diagnosis, {} leave.",
        "/channel <anamnesis|exam|labs>".cyan(),
        "/status".cyan(),
        "/diagnose".cyan(),
        "exit".cyan()
    );

    loop {
        let input = prompt_line(&format!("{} ", format!("[{channel}] >").cyan()))?;
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if let Some(rest) = input.strip_prefix("/channel") {
            channel = ConversationChannel::from_label(rest.trim());
            println!("Switched to the {} channel.", channel);
            continue;
        }
        if input == "/status" {
            print_status(&state);
            continue;
        }
        if input == "/diagnose" {
            run_diagnosis_checkpoint(&client, &state).await?;
            break;
        }

        let session_id = state.session_id().unwrap_or_default().to_string();
        match client.send_chat(&input, channel, &session_id).await {
            Ok(response) => {
                println!("{}: {}", speaker(channel).green().bold(), response.response);

                let applied = apply_chat_response(&mut state, &response);
                for (category, label) in &applied.discoveries {
                    println!("  {} {}: {}", "discovered".green(), category.title(), label);
                }
                if applied.progress_updated {
                    println!(
                        "  {} {}/{}",
                        "progress".blue(),
                        state.discovered_count(),
                        state.total_available_info()
                    );
                }
                for (headline, body) in &applied.bias_warnings {
                    println!(
                        "  {} {} - {}",
                        "Cognitive Bias Alert:".yellow().bold(),
                        headline,
                        body
                    );
                }

                // Persist the session id after a successful turn.
                if let Some(id) = state.session_id() {
                    session_storage.save_session_id(id)?;
                }
            }
            Err(err) => {
                tracing::error!("[CHAT] Error: {}", err);
                println!(
                    "{}",
                    "Sorry, I encountered an error. Please try again.".red()
                );
            }
        }
    }

    Ok(())
}

/// Who answers on each channel.
fn speaker(channel: ConversationChannel) -> &'static str {
    match channel {
        ConversationChannel::Anamnesis => "Son",
        ConversationChannel::Examination => "Patient",
        ConversationChannel::Labs => "Resident",
    }
}

fn print_status(state: &SessionState) {
    let snapshot = state.snapshot();
    println!(
        "Session {} - {}/{} discovered, {} bias warnings",
        snapshot.session_id.as_deref().unwrap_or("-"),
        snapshot.discovered_count,
        snapshot.total_available_info,
        snapshot.bias_warning_count
    );
    for category in Category::ALL {
        let entries = &snapshot.discovered[&category];
        if entries.is_empty() {
            continue;
        }
        println!("{}", category.title().bold());
        for discovery in entries {
            println!("  {}: {}", discovery.label, discovery.value);
        }
    }
}

async fn run_diagnosis_checkpoint(client: &ApiClient, state: &SessionState) -> Result<()> {
    let diagnosis = prompt_line("Your diagnosis: ")?;
    if diagnosis.is_empty() {
        println!("{}", "Please enter your diagnosis.".red());
        return Ok(());
    }

    println!(
        "{}",
        "Metacognitive checkpoint - answer every question before submitting.".bold()
    );
    let mut answers = BTreeMap::new();
    for question in REFLECTION_QUESTIONS {
        println!("{question}");
        let answer = prompt_line("> ")?;
        answers.insert(question.to_string(), answer);
    }

    if !reflection::validate_reflection(&answers) {
        println!(
            "{}",
            "Please complete all reflection questions before submitting.".red()
        );
        return Ok(());
    }

    let submission = reflection::build_submission(&diagnosis, answers, state);
    println!("Processing evaluation...");
    match client.submit_diagnosis_with_reflection(&submission).await {
        Ok(response) => render_evaluation(&response),
        Err(err) => {
            tracing::error!("[CHAT] Diagnosis submission error: {}", err);
            println!("{}", "Error submitting diagnosis. Please try again.".red());
        }
    }

    Ok(())
}

fn render_evaluation(response: &EvaluationResponse) {
    let Some(evaluation) = response.evaluation() else {
        // Basic results path: show whatever the backend returned.
        println!(
            "{}",
            serde_json::to_string_pretty(&response.extra).unwrap_or_default()
        );
        return;
    };

    println!("{}", "Performance evaluation".bold());
    let competencies = [
        ("Information Gathering", &evaluation.information_gathering),
        ("Diagnostic Accuracy", &evaluation.diagnostic_accuracy),
        (
            "Cognitive Bias Awareness",
            &evaluation.cognitive_bias_awareness,
        ),
    ];

    let mut total = 0.0;
    let mut scored = 0u32;
    for (label, competency) in competencies {
        let Some(competency) = competency else {
            continue;
        };
        if let Some(score) = competency.score {
            println!("  {label}: {score:.0}/100");
            total += score;
            scored += 1;
        }
        if let Some(analysis) = &competency.analysis {
            println!("    {analysis}");
        }
    }
    if scored > 0 {
        println!("  Overall: {:.0}/100", total / f64::from(scored));
    }
}
