//! login, logout, signup, status, whoami, users

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::require_login;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::models::SignupRequest;
use crate::storage::LANDING_PAGE_KEY;

/// Read a password from stdin when not given on the command line.
fn read_password(password: Option<String>) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    print!("Password: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(dashboard: &mut Dashboard, email: &str, password: Option<String>) -> Result<()> {
    if dashboard.user.is_logged_in() {
        tracing::info!("Replacing existing session");
    }
    let password = read_password(password)?;

    match dashboard.login(email, &password).await {
        Ok(Some(user)) => println!("Logged in as {} <{}>.", user.full_name(), user.email),
        Ok(None) => println!("Logged in (profile unavailable)."),
        Err(e) => {
            let message = dashboard.global.message();
            if message.is_empty() {
                return Err(e);
            }
            return Err(e.context(message));
        }
    }
    Ok(())
}

pub fn logout(dashboard: &mut Dashboard) -> Result<()> {
    dashboard.logout()?;
    println!("Logged out.");
    Ok(())
}

pub async fn signup(dashboard: &Dashboard, request: SignupRequest) -> Result<()> {
    if dashboard.user.signup(&request).await? {
        println!("Account created for {}. Run 'aw-dashboard login' next.", request.email);
    } else {
        println!("Server did not create the account.");
    }
    Ok(())
}

/// Display session and server status
pub async fn status(dashboard: &Dashboard, config: &Config) -> Result<()> {
    let state = dashboard.user.state();

    println!("Server:      {}", config.server_origin());
    println!("Client name: {}", config.client_name);
    println!("Storage:     {}", dashboard.storage.dir().display());
    println!("Testing:     {}", config.testing);

    if state.is_logged_in {
        println!("Session:     logged in");
        if !state.user_id.is_empty() {
            println!("  user id:   {}", state.user_id);
        }
        if !state.team_ids.is_empty() {
            println!("  teams:     {}", state.team_ids.join(", "));
        }
    } else {
        println!("Session:     none");
    }

    match dashboard.storage.get_item(LANDING_PAGE_KEY)? {
        Some(page) => println!("Landing:     {}", page.trim()),
        None => println!("Landing:     (default)"),
    }

    match dashboard.api.get_info().await {
        Ok(info) => println!(
            "Reachable:   yes ({} {}, host {})",
            info.version,
            if info.testing { "testing" } else { "production" },
            info.hostname
        ),
        Err(e) => println!("Reachable:   no ({})", e),
    }

    if !state.is_logged_in {
        println!("\nRun 'aw-dashboard login --email <email>' to authenticate.");
    }
    Ok(())
}

pub async fn whoami(dashboard: &mut Dashboard) -> Result<()> {
    require_login(dashboard)?;
    let user = dashboard.user.get_user().await?;
    if let Err(e) = dashboard.user.refresh_team_ids().await {
        tracing::warn!("Could not load team membership: {:#}", e);
    }

    println!();
    println!("Name:   {}", user.full_name());
    println!("Email:  {}", user.email);
    println!("Role:   {}", user.role);
    println!("ID:     {}", user.id);
    let teams = &dashboard.user.state().team_ids;
    if !teams.is_empty() {
        println!("Teams:  {}", teams.join(", "));
    }
    Ok(())
}

pub async fn users(dashboard: &Dashboard) -> Result<()> {
    require_login(dashboard)?;
    let users = dashboard.user.get_all_users().await?;

    println!("\n{:<6} {:<30} {}", "ID", "EMAIL", "NAME");
    println!("{:-<60}", "");
    if users.is_empty() {
        println!("  (no users)");
    }
    for user in &users {
        println!("{:<6} {:<30} {}", user.id, user.email, user.full_name());
    }
    Ok(())
}

/// Set or clear the page `/` redirects to.
pub fn landing(dashboard: &Dashboard, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => {
            let route = dashboard.router.resolve(path)?;
            dashboard.storage.set_item(LANDING_PAGE_KEY, &route.path)?;
            println!("Landing page set to {} ({}).", route.path, route.view);
        }
        None => {
            dashboard.storage.remove_item(LANDING_PAGE_KEY)?;
            println!("Landing page cleared.");
        }
    }
    Ok(())
}
