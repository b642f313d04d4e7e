use super::utils::value_or_prompt;
use anyhow::{Context, Result};
use colored::Colorize;
use tunedeck_application::MusicClient;

pub async fn login(client: &MusicClient, username: Option<String>, password: Option<String>) -> Result<()> {
    let username = value_or_prompt(username, "Username")?;
    let password = value_or_prompt(password, "Password")?;

    let user = client
        .login(&username, &password)
        .await
        .context("Login failed")?;

    println!("{} Logged in as {}", "✓".green(), user.username.bold());
    println!("  {} songs in your library", client.catalog().songs().len());
    Ok(())
}

pub async fn register(
    client: &MusicClient,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = value_or_prompt(username, "Username")?;
    let email = value_or_prompt(email, "Email")?;
    let password = value_or_prompt(password, "Password")?;

    let user = client
        .register(&username, &email, &password)
        .await
        .context("Registration failed")?;

    println!("{} Registered and logged in as {}", "✓".green(), user.username.bold());
    Ok(())
}

pub async fn logout(client: &MusicClient) -> Result<()> {
    client.logout().await.context("Failed to clear session")?;
    println!("{} Logged out", "✓".green());
    Ok(())
}

pub async fn whoami(client: &MusicClient) -> Result<()> {
    match client.start().await.context("Failed to validate session")? {
        Some(user) => {
            println!("{}", user.username.bold());
            if let Some(email) = user.email {
                println!("  {}", email.dimmed());
            }
            println!("  {} songs in your library", client.catalog().songs().len());
        }
        None => println!("{}", "Not logged in".yellow()),
    }
    Ok(())
}
