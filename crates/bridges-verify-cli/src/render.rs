//! Text rendering of the active screen.

use std::fmt::Write;

use bridges_verify::{Screen, StagedFile, VerificationFlow, VerificationSession};

const PLACEHOLDER: &str = "-";

/// Render the flow's current screen, notice included.
pub async fn render_flow(flow: &VerificationFlow) -> String {
    let screen = flow.screen().await;
    let session = flow.session().await;
    let notice = flow.notice().await;
    render(&screen, session.as_ref(), notice.as_deref())
}

pub fn render(screen: &Screen, session: Option<&VerificationSession>, notice: Option<&str>) -> String {
    let mut out = String::new();
    let placement = session.and_then(|s| s.job_placement());
    let milestone = session
        .and_then(|s| s.verification_level())
        .unwrap_or(PLACEHOLDER);

    match screen {
        Screen::Loading => out.push_str("Loading verification details...\n"),
        Screen::Error(msg) => {
            let _ = writeln!(out, "{}", msg.title);
            let _ = writeln!(out, "{}", msg.message);
        }
        Screen::ParticipantForm => {
            out.push_str("Participant verification\n");
            let _ = writeln!(
                out,
                "  Employer:   {}",
                field(placement.and_then(|p| p.employer_name.as_deref()))
            );
            let _ = writeln!(
                out,
                "  Job title:  {}",
                field(placement.and_then(|p| p.job_title.as_deref()))
            );
            let _ = writeln!(out, "  Milestone:  {}", milestone);
            match session.and_then(|s| s.staged_file()) {
                Some(file) => {
                    let _ = writeln!(out, "  Document:   {}", describe_file(file));
                }
                None => out.push_str("  Document:   (none selected)\n"),
            }
        }
        Screen::EmployerForm => {
            out.push_str("Employer verification\n");
            let _ = writeln!(
                out,
                "  Participant: {}",
                field(placement.and_then(|p| p.participant_name.as_deref()))
            );
            let _ = writeln!(
                out,
                "  Job title:   {}",
                field(placement.and_then(|p| p.job_title.as_deref()))
            );
            let _ = writeln!(out, "  Milestone:   {}", milestone);
        }
        Screen::Success => {
            out.push_str("Verification submitted\n");
            out.push_str("Thank you. Your response has been recorded.\n");
        }
    }

    if let Some(notice) = notice {
        let _ = writeln!(out, "! {}", notice);
    }
    out
}

fn field(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

fn describe_file(file: &StagedFile) -> String {
    let preview = if file.is_previewable_image() {
        "image preview"
    } else {
        "file icon"
    };
    format!(
        "{} ({}, {}) [{}]",
        file.file_name,
        file.mime_type,
        human_size(file.size),
        preview
    )
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
