use anyhow::{Context, Result};
use intellimail_core::models::{EmailDetail, EmailListQuery, SendEmailRequest};

use crate::app::App;
use crate::cli::EmailCommands;
use crate::utils::{format_date, strip_html, truncate_string};

const SENDER_WIDTH: usize = 28;
const SUBJECT_WIDTH: usize = 50;

pub async fn run(app: &App, command: EmailCommands) -> Result<()> {
    app.require_session()?;
    let emails = app.api().emails();

    match command {
        EmailCommands::List { max_results, query } => {
            let query = EmailListQuery {
                max_results: Some(max_results),
                query,
            };
            let list = emails.list(&query).await.context("Failed to load emails")?;
            if list.is_empty() {
                println!("No messages.");
            }
            for email in list {
                println!(
                    "{} {:<12} {:<sender$} {:<subject$} {}",
                    if email.is_read { " " } else { "*" },
                    format_date(&email.date),
                    truncate_string(&email.sender, SENDER_WIDTH),
                    truncate_string(&email.subject, SUBJECT_WIDTH),
                    email.id,
                    sender = SENDER_WIDTH,
                    subject = SUBJECT_WIDTH,
                );
            }
        }
        EmailCommands::Show { id } => {
            let email = emails.get(&id).await.context("Failed to load email")?;
            print_email(&email);
        }
        EmailCommands::Thread { id } => {
            let thread = emails.thread(&id).await.context("Failed to load thread")?;
            println!("Thread {} ({} messages)\n", thread.thread_id, thread.message_count);
            for email in &thread.emails {
                print_email(email);
                println!("{}", "-".repeat(60));
            }
        }
        EmailCommands::Send {
            to,
            subject,
            body,
            reply_to,
        } => {
            let request = SendEmailRequest {
                to,
                subject,
                body,
                reply_to_id: reply_to,
            };
            let sent = emails.send(&request).await.context("Failed to send email")?;
            match sent.message_id {
                Some(id) => println!("Sent ({}).", id),
                None => println!("{}", sent.message),
            }
        }
        EmailCommands::MarkRead { id } => {
            let result = emails.mark_read(&id).await.context("Failed to mark email as read")?;
            println!("{}", result.message);
        }
    }
    Ok(())
}

fn print_email(email: &EmailDetail) {
    println!("From:    {}", email.sender);
    println!("To:      {}", email.recipient);
    println!("Date:    {}", format_date(&email.date));
    println!("Subject: {}", email.subject);
    println!();
    println!("{}", strip_html(&email.body));
    println!();
}
