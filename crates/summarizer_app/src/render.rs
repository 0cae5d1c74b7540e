use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use summarizer_core::{StatusTag, SubmissionView};

pub const TITLE: &str = "Read Faster with Text Summarization";
pub const INPUT_PROMPT: &str = "Input URL...";

/// Render the view as plain text for a terminal.
pub fn render(view: &SubmissionView, completed_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();

    let input = if view.input.is_empty() {
        INPUT_PROMPT
    } else {
        view.input.as_str()
    };
    let _ = writeln!(out, "[ {} ] [{}]", input, view.submit_label);
    if let Some(err) = &view.field_error {
        let _ = writeln!(out, "  ! {err}");
    }
    out.push('\n');

    match view.status {
        StatusTag::Pending => {
            let url = view.pending_url.as_deref().unwrap_or_default();
            let _ = writeln!(out, "Summarizing {url} ...");
        }
        StatusTag::Succeeded => {
            if let Some(result) = &view.result {
                section(&mut out, "Content", &result.content);
                out.push('\n');
                section(&mut out, "Summary", &result.summary);
            }
            if let Some(at) = completed_at {
                let _ = writeln!(
                    out,
                    "\nSummarized at {}",
                    at.to_rfc3339_opts(SecondsFormat::Secs, true)
                );
            }
        }
        StatusTag::Failed => {
            if let Some(message) = &view.error_message {
                let _ = writeln!(out, "Error: {message}");
            }
        }
        StatusTag::Idle => {}
    }

    if let Some(placeholder) = view.placeholder {
        let _ = writeln!(out, "{placeholder}");
    }
    out
}

fn section(out: &mut String, heading: &str, body: &str) {
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{}", "=".repeat(heading.len()));
    let _ = writeln!(out, "{}", body.trim_end());
}
