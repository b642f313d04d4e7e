use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tunedeck_application::MusicClient;
use tunedeck_core::song::Song;
use tunedeck_core::user::UserProfile;
use tunedeck_core::TunedeckError;

const LOGIN_HINT: &str = "Your session is missing or was rejected. Run `tunedeck login`.";

/// Restores the persisted session, failing with a hint when there is none.
pub async fn require_session(client: &MusicClient) -> Result<UserProfile> {
    match client
        .session()
        .restore()
        .await
        .context("Failed to restore session")?
    {
        Some(user) => Ok(user),
        None => anyhow::bail!("Not logged in. Run `tunedeck login` first."),
    }
}

/// Restores the session and loads the catalog.
pub async fn require_catalog(client: &MusicClient) -> Result<Vec<Song>> {
    require_session(client).await?;
    client
        .catalog()
        .refresh()
        .await
        .context("Failed to fetch songs")
}

/// Puts the login hint in front of errors whose root cause means the user has
/// to log in again.
pub fn with_login_hint(err: anyhow::Error) -> anyhow::Error {
    let needs_login = err.chain().any(|cause| {
        cause
            .downcast_ref::<TunedeckError>()
            .is_some_and(TunedeckError::requires_login)
    });
    if needs_login {
        err.context(LOGIN_HINT)
    } else {
        err
    }
}

/// Returns `value`, or asks for it on stdin.
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    print!("{}: ", label);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", label.to_lowercase()))?;

    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        anyhow::bail!("{} must not be empty", label);
    }
    Ok(line)
}
