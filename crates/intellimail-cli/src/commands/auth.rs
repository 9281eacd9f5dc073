use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use intellimail_core::auth::FlowState;
use url::Url;

use crate::app::App;
use crate::utils::presence;

pub async fn login(app: &mut App) -> Result<()> {
    if let Some(session) = app.session().current() {
        println!("Already signed in as {}.", session.email());
        return Ok(());
    }
    if let Some(ref email) = app.config().last_email {
        println!("Last signed in as {}.", email);
    }

    if let FlowState::Failed(reason) = app.flow_mut().begin_login().await {
        bail!("{}", reason);
    }

    println!("After approving access, paste the address your browser was sent back to.");
    print!("Redirect URL: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    complete(app, input.trim()).await
}

pub async fn callback(app: &mut App, url: &str) -> Result<()> {
    // A repeated run with the same redirect must not redeem its code again
    if let Some(session) = app.session().current() {
        println!("Already signed in as {}.", session.email());
        return Ok(());
    }
    complete(app, url.trim()).await
}

async fn complete(app: &mut App, raw: &str) -> Result<()> {
    let location = Url::parse(raw).with_context(|| format!("Not a valid URL: {}", raw))?;

    let state = app.flow_mut().handle_redirect(&location).await.clone();
    match state {
        FlowState::Failed(reason) => Err(reason.into()),
        state if state.is_authenticated() => {
            let session = app.require_session()?;
            println!("Signed in as {} <{}>.", session.display_name(), session.email());
            if let Some(token) = app.flow_mut().refresh_token() {
                println!("{}", refresh_token_notice(token));
            }
            app.remember_email(session.email());
            Ok(())
        }
        _ => bail!("No sign-in parameters found in {}", location),
    }
}

/// The refresh token is not stored, so this is the user's only copy.
fn refresh_token_notice(token: &str) -> String {
    format!(
        "Refresh token: {}\nRenew this session later with `intellimail refresh --refresh-token <TOKEN>` or by setting INTELLIMAIL_REFRESH_TOKEN.",
        token
    )
}

pub async fn logout(app: &App) -> Result<()> {
    app.session().logout().await;
    println!("Signed out.");
    Ok(())
}

pub fn status(app: &App) -> Result<()> {
    let report = app.session().diagnostics();

    println!("Backend:        {}", app.api().base_url());
    println!(
        "Storage:        {:?}{}",
        app.config().storage,
        if report.storage_degraded { " (unavailable, this run only)" } else { "" }
    );
    println!("Access token:   {}", presence(report.access_token_present));
    println!("Identity token: {}", presence(report.identity_token_present));
    match report.claims {
        Some(Ok(identity)) => {
            println!("Claims:         {} <{}>", identity.display_name, identity.email);
            if let Some(expires_at) = identity.expires_at {
                let note = if identity.is_expired() { " (expired)" } else { "" };
                println!("Expires:        {}{}", expires_at.format("%Y-%m-%d %H:%M UTC"), note);
            }
        }
        Some(Err(e)) => println!("Claims:         unreadable ({})", e),
        None => {}
    }
    println!("Signed in:      {}", if report.authenticated { "yes" } else { "no" });
    Ok(())
}

pub async fn whoami(app: &App, verify: bool) -> Result<()> {
    let session = app.require_session()?;
    println!("{} <{}>", session.display_name(), session.email());

    if verify {
        let user = app
            .api()
            .auth()
            .current_user()
            .await
            .context("Failed to verify session")?;
        println!("Backend confirms {}", user.email);
    }
    Ok(())
}

pub async fn refresh(app: &App, refresh_token: &str) -> Result<()> {
    let session = app
        .session()
        .refresh(refresh_token)
        .await
        .context("Failed to refresh session")?;
    println!("Session renewed for {}.", session.email());
    Ok(())
}
