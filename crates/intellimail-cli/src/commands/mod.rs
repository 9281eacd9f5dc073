//! Command handlers. Each takes the hydrated `App` and prints its result.

mod ai;
mod auth;
mod mail;

use anyhow::Result;

use crate::app::App;
use crate::cli::Commands;

pub async fn run(app: &mut App, command: Commands) -> Result<()> {
    match command {
        Commands::Login => auth::login(app).await,
        Commands::Callback { url } => auth::callback(app, &url).await,
        Commands::Logout => auth::logout(app).await,
        Commands::Status => auth::status(app),
        Commands::Whoami { verify } => auth::whoami(app, verify).await,
        Commands::Refresh { refresh_token } => auth::refresh(app, &refresh_token).await,
        Commands::Emails { command } => mail::run(app, command).await,
        Commands::Summarize {
            email_id,
            max_length,
        } => ai::summarize(app, &email_id, max_length).await,
        Commands::SummarizeThread {
            thread_id,
            max_length,
        } => ai::summarize_thread(app, &thread_id, max_length).await,
        Commands::Reply { command } => ai::reply(app, command).await,
    }
}
