//! Text and JSON rendering of controller state.

use gatepass_controller::{ValidationSnapshot, ValidationState};
use gatepass_model::{HistoryEntry, ValidationOutcome};
use serde::Serialize;

use crate::OutputFormat;

/// Exit status when the code was denied.
pub(crate) const EXIT_DENIED: i32 = 2;

/// Exit status for request, transport, and configuration failures.
pub(crate) const EXIT_ERROR: i32 = 1;

pub(crate) fn exit_code(state: ValidationState) -> i32 {
    match state {
        ValidationState::Denied => EXIT_DENIED,
        ValidationState::Error | ValidationState::Loading => EXIT_ERROR,
        ValidationState::Idle | ValidationState::Success => 0,
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat) {
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization error: {}\"}}", e));
    println!("{}", pretty);
}

/// One-screen summary of the current verdict.
pub(crate) fn verdict_text(snap: &ValidationSnapshot) -> String {
    let message = snap.error_message.as_deref().unwrap_or("");
    match snap.state {
        ValidationState::Idle => "Ready.".to_string(),
        ValidationState::Loading => "Validating...".to_string(),
        ValidationState::Success => match snap.outcome {
            Some(ref outcome) => format!("ACCESS GRANTED\n{}", outcome_details(outcome)),
            None => "ACCESS GRANTED".to_string(),
        },
        ValidationState::Denied => {
            let mut out = format!("ACCESS DENIED: {}", message);
            if let Some(ref outcome) = snap.outcome {
                out.push('\n');
                out.push_str(&outcome_details(outcome));
            }
            out
        }
        ValidationState::Error => format!("VALIDATION ERROR: {}", message),
    }
}

fn outcome_details(outcome: &ValidationOutcome) -> String {
    let mut lines = vec![format!("  code:      {}", outcome.code)];
    if let Some(ref reason_code) = outcome.reason_code {
        lines.push(format!("  reason:    {}", reason_code));
    }
    if let Some(ref visitor) = outcome.visitor_name {
        lines.push(format!("  visitor:   {}", visitor));
    }
    if let Some(ref resident) = outcome.resident_name {
        lines.push(format!("  resident:  {}", resident));
    }
    if let Some(ref home) = outcome.home_details {
        let parts: Vec<&str> = [home.plot_number.as_deref(), home.street.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !parts.is_empty() {
            lines.push(format!("  home:      {}", parts.join(", ")));
        }
    }
    if !outcome.validated_at.is_empty() {
        lines.push(format!("  at:        {}", outcome.validated_at));
    }
    lines.join("\n")
}

/// Recent validations as an aligned table, newest first.
pub(crate) fn history_text(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent validations.".to_string();
    }
    let code_width = entries.iter().map(|e| e.code.len()).max().unwrap_or(0).max(4);
    let mut out = format!(
        "{:<8} {:<code_width$} {}",
        "STATUS", "CODE", "VISITOR / RESIDENT / HOME / TIME"
    );
    for e in entries {
        out.push('\n');
        out.push_str(&format!(
            "{:<8} {:<code_width$} {} / {} / {} / {}",
            e.status.to_string(),
            e.code,
            e.visitor_name,
            e.resident_name,
            e.home,
            e.validated_at,
        ));
    }
    out
}
