//! Text rendering of session state for the terminal.

use chrono::{Local, TimeZone};
use clickforge_application::OperationOutcome;
use clickforge_core::session::Rejection;
use clickforge_core::{Concept, GenerationSession, SessionStatus, Thumbnail};
use colored::Colorize;

use crate::repl::command::COMMANDS;

pub fn help() -> String {
    let mut out = format!("{}\n", "Commands".bold());
    for (_, usage, description) in COMMANDS {
        out.push_str(&format!("  {:<28} {}\n", usage.bright_cyan(), description));
    }
    out
}

pub fn status(session: &GenerationSession) -> String {
    let params = session.params();
    let topic = if params.has_topic() {
        params.topic.as_str()
    } else {
        "(not set)"
    };
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "Topic:".bold(), topic));
    out.push_str(&format!(
        "  style {} | audience {} | goal {}\n",
        params.style, params.audience, params.goal
    ));
    out.push_str(&format!(
        "  ratio {} | lighting {} | angle {} | viral {}\n",
        params.aspect_ratio,
        params.lighting,
        params.angle,
        if params.viral_mode { "on" } else { "off" }
    ));
    if let Some(reference) = session.reference_image() {
        out.push_str(&format!(
            "  reference {} (~{} KB)\n",
            reference.mime_type(),
            reference.approx_len() / 1024
        ));
    }
    out.push_str(&format!(
        "{} {} | {} {}\n",
        "Step:".bold(),
        session.step(),
        "Status:".bold(),
        status_label(session.status())
    ));
    if let Some(message) = session.failure_message() {
        out.push_str(&format!("{}\n", message.red()));
    }
    if let Some(active) = session.active() {
        out.push_str(&format!("{} {}\n", "Active:".bold(), active.concept.title));
    }
    out
}

fn status_label(status: SessionStatus) -> String {
    match status {
        SessionStatus::Idle => "idle".normal().to_string(),
        SessionStatus::AnalyzingMarket => "analyzing market...".yellow().to_string(),
        SessionStatus::GeneratingImage => "generating image...".yellow().to_string(),
        SessionStatus::Refining => "refining...".yellow().to_string(),
        SessionStatus::Completed => "completed".green().to_string(),
        SessionStatus::Failed => "failed".red().to_string(),
    }
}

pub fn concepts(session: &GenerationSession) -> String {
    if session.concepts().is_empty() {
        return "No concepts yet. Set a topic and run 'analyze'.\n".to_string();
    }
    let mut out = String::new();
    for (i, concept) in session.concepts().iter().enumerate() {
        out.push_str(&concept_card(i + 1, concept));
    }
    if !session.trends().is_empty() {
        out.push_str(&format!("{}\n", "Trend sources".bold()));
        for trend in session.trends() {
            out.push_str(&format!("  - {} <{}>\n", trend.title, trend.uri));
        }
    }
    out
}

fn concept_card(position: usize, concept: &Concept) -> String {
    let mut out = format!(
        "{} {}\n",
        format!("[{position}]").bright_magenta(),
        concept.title.bold()
    );
    out.push_str(&format!("    {}\n", concept.description));
    out.push_str(&format!("    overlay: \"{}\"", concept.overlay_text));
    if !concept.overlay_variants.is_empty() {
        out.push_str(&format!(" (alt: {})", concept.overlay_variants.join(" / ")));
    }
    out.push('\n');
    out.push_str(&format!("    psychology: {}\n", concept.psychology));
    if !concept.color_palette.is_empty() {
        out.push_str(&format!("    palette: {}\n", concept.color_palette.join(" ")));
    }
    for sentiment in &concept.audience_sentiment {
        out.push_str(&format!("    {}: {}\n", sentiment.segment, sentiment.reaction));
    }
    out
}

pub fn thumbnail(result: &Thumbnail) -> String {
    let mut out = format!("{} {}\n", "Result:".bold(), result.concept.title.bold());
    out.push_str(&format!(
        "  {} | {} | ~{} KB | {}\n",
        result.params.aspect_ratio,
        result.image.mime_type(),
        result.image.approx_len() / 1024,
        timestamp(result.timestamp)
    ));
    out.push_str(&format!("  overlay: \"{}\"\n", result.concept.overlay_text));
    if !result.seo.suggested_titles.is_empty() {
        out.push_str(&format!("  {}\n", "Titles".bold()));
        for title in &result.seo.suggested_titles {
            out.push_str(&format!("    - {title}\n"));
        }
    }
    if !result.seo.tags.is_empty() {
        out.push_str(&format!("  {} {}\n", "Tags:".bold(), result.seo.tags.join(", ")));
    }
    out
}

pub fn vault(entries: &[Thumbnail]) -> String {
    if entries.is_empty() {
        return "The vault is empty.\n".to_string();
    }
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}  {}  {}\n",
            i + 1,
            entry.concept.title,
            entry.params.topic.bright_black(),
            timestamp(entry.timestamp).bright_black()
        ));
    }
    out
}

fn timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn rejection(rejection: &Rejection) -> String {
    rejection.to_string().yellow().to_string()
}

/// One-line summary for an outcome that did not complete.
pub fn unfinished<T>(outcome: &OperationOutcome<T>, session: &GenerationSession) -> Option<String> {
    match outcome {
        OperationOutcome::Completed(_) => None,
        OperationOutcome::Rejected(reason) => Some(rejection(reason)),
        OperationOutcome::Failed(kind) => Some(kind.message().red().to_string()),
        OperationOutcome::Discarded => Some(format!(
            "{} (now in {})",
            "Response arrived after you moved on; ignored.".bright_black(),
            session.step()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickforge_core::concept::ConceptDraft;
    use clickforge_core::{GenerationParams, ImageData, SeoBundle};

    fn sample() -> Thumbnail {
        let concept = Concept::from_draft(ConceptDraft {
            title: "The 10k Wall".into(),
            description: "Founder facing a wall".into(),
            visual_prompt: "wall".into(),
            overlay_text: "STUCK AT 9K?".into(),
            overlay_variants: vec!["WHY 10K?".into()],
            psychology: "curiosity gap".into(),
            color_palette: vec!["#FF0000".into()],
            audience_sentiment: vec![],
        });
        Thumbnail::new(
            ImageData::from_base64("image/png", "QUJD"),
            concept,
            SeoBundle {
                suggested_titles: vec!["How I broke the 10k wall".into()],
                tags: vec!["saas".into(), "mrr".into()],
            },
            GenerationParams {
                topic: "Scaling a SaaS".into(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_help_lists_every_command() {
        let text = help();
        for (_, _, description) in COMMANDS {
            assert!(text.contains(description));
        }
    }

    #[test]
    fn test_thumbnail_shows_seo() {
        let text = thumbnail(&sample());
        assert!(text.contains("How I broke the 10k wall"));
        assert!(text.contains("saas, mrr"));
        assert!(text.contains("16:9"));
    }

    #[test]
    fn test_vault_numbers_from_one() {
        let text = vault(&[sample(), sample()]);
        assert!(text.contains("  1. The 10k Wall"));
        assert!(text.contains("  2. The 10k Wall"));
        assert_eq!(vault(&[]), "The vault is empty.\n");
    }

    #[test]
    fn test_status_for_fresh_session() {
        let text = status(&GenerationSession::new());
        assert!(text.contains("(not set)"));
        assert!(text.contains("viral off"));
        assert!(text.contains("setup"));
    }
}
