use anyhow::{Context, Result};
use intellimail_core::models::{RefineReplyRequest, ReplyRequest, Summary};

use crate::app::App;
use crate::cli::ReplyCommands;

pub async fn summarize(app: &App, email_id: &str, max_length: u32) -> Result<()> {
    app.require_session()?;
    let summary = app
        .api()
        .ai()
        .summarize(email_id, max_length)
        .await
        .context("Failed to summarize email")?;
    print_summary(&summary);
    Ok(())
}

pub async fn summarize_thread(app: &App, thread_id: &str, max_length: u32) -> Result<()> {
    app.require_session()?;
    let summary = app
        .api()
        .ai()
        .summarize_thread(thread_id, max_length)
        .await
        .context("Failed to summarize thread")?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("{}\n", summary.summary);
    if !summary.key_points.is_empty() {
        println!("Key points:");
        for point in &summary.key_points {
            println!("  - {}", point);
        }
        println!();
    }
    println!(
        "{} -> {} words ({:.0}% of original)",
        summary.original_length,
        summary.summary_length,
        summary.compression_ratio * 100.0
    );
}

pub async fn reply(app: &App, command: ReplyCommands) -> Result<()> {
    app.require_session()?;
    let ai = app.api().ai();

    match command {
        ReplyCommands::Generate {
            email_id,
            tone,
            length,
            instructions,
        } => {
            let request = ReplyRequest {
                email_id,
                tone,
                length,
                custom_instructions: instructions,
            };
            let reply = ai.generate_reply(&request).await.context("Failed to generate reply")?;
            if let Some(subject) = reply.suggested_subject {
                println!("Subject: {}\n", subject);
            }
            println!("{}", reply.generated_reply);
            if let Some(confidence) = reply.confidence_score {
                println!("\nConfidence: {:.0}%", confidence * 100.0);
            }
            for (i, alternative) in reply.alternative_replies.unwrap_or_default().iter().enumerate() {
                println!("\nAlternative {}:\n{}", i + 1, alternative);
            }
        }
        ReplyCommands::Refine {
            text,
            tone,
            instructions,
        } => {
            let request = RefineReplyRequest {
                reply_text: text,
                target_tone: tone,
                refinement_instructions: instructions,
            };
            let refined = ai.refine_reply(&request).await.context("Failed to refine reply")?;
            println!("{}", refined.refined_reply);
            if !refined.changes_made.is_empty() {
                println!("\nChanges:");
                for change in &refined.changes_made {
                    println!("  - {}", change);
                }
            }
        }
        ReplyCommands::AnalyzeTone { text } => {
            let analysis = ai.analyze_tone(&text).await.context("Failed to analyze tone")?;
            println!(
                "Detected tone: {} ({:.0}% confidence)",
                analysis.detected_tone,
                analysis.confidence * 100.0
            );
            for (tone, score) in &analysis.tone_breakdown {
                println!("  {:<14} {:.2}", tone, score);
            }
            for suggestion in &analysis.suggestions {
                println!("Suggestion: {}", suggestion);
            }
        }
        ReplyCommands::Tones => {
            let tones = ai.tones().await.context("Failed to load tones")?;
            for (name, description) in &tones.available_tones {
                let marker = if *name == tones.default_tone { "*" } else { " " };
                println!("{} {:<14} {}", marker, name, description);
            }
        }
    }
    Ok(())
}
