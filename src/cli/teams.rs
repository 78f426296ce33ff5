//! Team management commands

use anyhow::{bail, Context, Result};

use super::{require_login, truncate};
use crate::dashboard::Dashboard;
use crate::models::NewTeam;

/// List teams owned by the current user (prints to stdout).
pub async fn list(dashboard: &mut Dashboard) -> Result<()> {
    require_login(dashboard)?;
    let teams = dashboard.team.get_teams().await?;

    println!("\n{:<6} {:<24} {:>7}  {}", "ID", "NAME", "MEMBERS", "DESCRIPTION");
    println!("{:-<70}", "");
    if teams.is_empty() {
        println!("  (no teams found)");
        return Ok(());
    }
    for team in teams {
        let members = team
            .count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<24} {:>7}  {}",
            team.id,
            truncate(&team.name, 24),
            members,
            truncate(&team.description, 40)
        );
    }
    Ok(())
}

/// Teams the current user is a member of.
pub async fn mine(dashboard: &Dashboard) -> Result<()> {
    require_login(dashboard)?;
    let teams = dashboard
        .api
        .get_user_teams()
        .await
        .context("Failed to list user teams")?;

    println!("\nMember of:");
    println!("{:-<60}", "");
    if teams.is_empty() {
        println!("  (no teams)");
    }
    for team in &teams {
        println!("{:<6} {:<24} {}", team.id, truncate(&team.name, 24), team.description);
    }
    Ok(())
}

pub async fn show(dashboard: &mut Dashboard, team_id: i32) -> Result<()> {
    require_login(dashboard)?;
    let route = dashboard.navigate(&format!("/team/{}", team_id))?;
    tracing::debug!("Showing {}", route.path);

    let team = dashboard.team.get_team(team_id).await?;

    println!();
    println!("Team:        {} ({})", team.name, team.id);
    println!("Description: {}", team.description);
    println!(
        "Apps:        {}",
        if team.apps.is_empty() {
            "(all)".to_string()
        } else {
            team.apps.join(", ")
        }
    );
    println!("\nMembers ({}):", team.members.len());
    for m in &team.members {
        println!(
            "  {:<6} {:<24} {}",
            m.user_id,
            truncate(&format!("{} {}", m.name, m.lastname), 24),
            m.email
        );
    }
    Ok(())
}

pub async fn add(dashboard: &mut Dashboard, name: String, description: String) -> Result<()> {
    require_login(dashboard)?;
    if name.trim().is_empty() {
        bail!("Team name must not be empty");
    }
    let created = dashboard
        .team
        .add_team(NewTeam {
            name: name.clone(),
            description,
        })
        .await?;
    if created {
        println!("Created team '{}'.", name);
    } else {
        println!("Server did not create team '{}'.", name);
    }
    Ok(())
}

pub async fn edit(
    dashboard: &mut Dashboard,
    team_id: i32,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    require_login(dashboard)?;
    let mut team = dashboard
        .team
        .get_teams()
        .await?
        .iter()
        .find(|t| t.id == team_id)
        .cloned()
        .with_context(|| format!("You do not own a team with id {}", team_id))?;

    if let Some(name) = name {
        team.name = name;
    }
    if let Some(description) = description {
        team.description = description;
    }
    dashboard.team.edit_team(team).await?;
    println!("Updated team {}.", team_id);
    Ok(())
}

pub async fn add_members(dashboard: &Dashboard, team_id: i32, members: &[i32]) -> Result<()> {
    require_login(dashboard)?;
    if members.is_empty() {
        bail!("No member ids given");
    }
    if dashboard.team.add_members(team_id, members).await? {
        println!("Added {} member(s) to team {}.", members.len(), team_id);
    } else {
        println!("Server rejected the member list.");
    }
    Ok(())
}

pub async fn remove_member(dashboard: &Dashboard, team_id: i32, member_id: i32) -> Result<()> {
    require_login(dashboard)?;
    if dashboard.team.remove_member(team_id, member_id).await? {
        println!("Removed member {} from team {}.", member_id, team_id);
    } else {
        println!("Server did not remove member {}.", member_id);
    }
    Ok(())
}

pub async fn config(dashboard: &Dashboard, team_id: i32) -> Result<()> {
    require_login(dashboard)?;
    let apps = dashboard.team.get_configuration(team_id).await?;
    if apps.is_empty() {
        println!("Team {} tracks all applications.", team_id);
    } else {
        println!("Team {} tracks:", team_id);
        for app in &apps {
            println!("  {}", app);
        }
    }
    Ok(())
}

pub async fn set_config(dashboard: &Dashboard, team_id: i32, apps: Vec<String>) -> Result<()> {
    require_login(dashboard)?;
    dashboard.team.add_configuration(team_id, &apps).await?;
    println!("Team {} now tracks {} application(s).", team_id, apps.len());
    Ok(())
}
