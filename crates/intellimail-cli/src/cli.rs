use clap::{Parser, Subcommand};
use intellimail_core::models::ai::{DEFAULT_SUMMARY_LENGTH, DEFAULT_THREAD_SUMMARY_LENGTH};
use intellimail_core::models::{ReplyLength, Tone};

#[derive(Parser)]
#[command(name = "intellimail")]
#[command(version)]
#[command(about = "IntelliMail - AI summaries and replies for your inbox")]
pub struct Cli {
    /// Backend base URL (overrides INTELLIMAIL_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with Google
    Login,
    /// Complete a sign-in from the address the browser was redirected to
    Callback {
        /// The full redirect URL, including its query string
        #[arg(value_name = "REDIRECT_URL")]
        url: String,
    },
    /// Sign out and forget the stored tokens
    Logout,
    /// Show what is stored locally and whether it decodes
    Status,
    /// Show the signed-in user
    Whoami {
        /// Confirm the session with the backend
        #[arg(long)]
        verify: bool,
    },
    /// Exchange a refresh token for a new access token
    Refresh {
        #[arg(long, env = "INTELLIMAIL_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,
    },
    /// Read and send email
    Emails {
        #[command(subcommand)]
        command: EmailCommands,
    },
    /// Summarize a single email
    Summarize {
        #[arg(value_name = "EMAIL_ID")]
        email_id: String,
        /// Upper bound on summary length, in words
        #[arg(long, default_value_t = DEFAULT_SUMMARY_LENGTH)]
        max_length: u32,
    },
    /// Summarize a whole conversation
    SummarizeThread {
        #[arg(value_name = "THREAD_ID")]
        thread_id: String,
        #[arg(long, default_value_t = DEFAULT_THREAD_SUMMARY_LENGTH)]
        max_length: u32,
    },
    /// Draft and polish replies
    Reply {
        #[command(subcommand)]
        command: ReplyCommands,
    },
}

#[derive(Subcommand)]
pub enum EmailCommands {
    /// List recent messages
    List {
        #[arg(short = 'n', long, default_value_t = 10)]
        max_results: u32,
        /// Gmail search query, e.g. "is:unread"
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show a message
    Show {
        #[arg(value_name = "EMAIL_ID")]
        id: String,
    },
    /// Show every message in a conversation
    Thread {
        #[arg(value_name = "THREAD_ID")]
        id: String,
    },
    /// Send a message
    Send {
        to: String,
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        body: String,
        /// Message this one replies to
        #[arg(long, value_name = "EMAIL_ID")]
        reply_to: Option<String>,
    },
    /// Mark a message as read
    MarkRead {
        #[arg(value_name = "EMAIL_ID")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReplyCommands {
    /// Generate a reply to a message
    Generate {
        #[arg(value_name = "EMAIL_ID")]
        email_id: String,
        #[arg(long, default_value_t = Tone::Professional)]
        tone: Tone,
        #[arg(long, default_value = "medium")]
        length: ReplyLength,
        /// Extra guidance for the draft
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Rewrite a draft in another tone
    Refine {
        text: String,
        #[arg(long)]
        tone: Tone,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Detect the tone of a piece of text
    AnalyzeTone { text: String },
    /// List the tones the backend supports
    Tones,
}
