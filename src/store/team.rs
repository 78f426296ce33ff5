//! Teams owned by the current user

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::DashboardApi;
use crate::models::{NewTeam, Team, TeamDetail};

pub struct TeamStore {
    teams: Vec<Team>,
    client: Arc<dyn DashboardApi>,
}

impl TeamStore {
    pub fn new(client: Arc<dyn DashboardApi>) -> Self {
        Self {
            teams: Vec::new(),
            client,
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Reload the team list from the server.
    pub async fn get_teams(&mut self) -> Result<&[Team]> {
        self.teams = self
            .client
            .get_teams()
            .await
            .context("Failed to load teams")?;
        Ok(&self.teams)
    }

    /// Create a team (only name and description are sent), then reload.
    pub async fn add_team(&mut self, team: NewTeam) -> Result<bool> {
        let created = self
            .client
            .add_team(&team)
            .await
            .context("Failed to create team")?;
        if !created {
            tracing::warn!("Server did not create team '{}'", team.name);
        }
        self.get_teams().await?;
        Ok(created)
    }

    /// Update a team and mirror the change locally.
    pub async fn edit_team(&mut self, team: Team) -> Result<()> {
        self.client
            .edit_team(&team)
            .await
            .context("Failed to update team")?;
        if let Some(existing) = self.teams.iter_mut().find(|t| t.id == team.id) {
            *existing = team;
        }
        Ok(())
    }

    pub async fn get_team(&self, team_id: i32) -> Result<TeamDetail> {
        self.client
            .get_team(team_id)
            .await
            .with_context(|| format!("Failed to load team {}", team_id))
    }

    pub async fn add_members(&self, team_id: i32, members: &[i32]) -> Result<bool> {
        self.client
            .add_members(team_id, members)
            .await
            .with_context(|| format!("Failed to add members to team {}", team_id))
    }

    pub async fn remove_member(&self, team_id: i32, member_id: i32) -> Result<bool> {
        self.client
            .remove_member(team_id, member_id)
            .await
            .with_context(|| format!("Failed to remove member {} from team {}", member_id, team_id))
    }

    /// Replace the list of applications tracked for the team.
    pub async fn add_configuration(&self, team_id: i32, apps: &[String]) -> Result<()> {
        self.client
            .add_configuration(team_id, apps)
            .await
            .with_context(|| format!("Failed to configure team {}", team_id))
    }

    pub async fn get_configuration(&self, team_id: i32) -> Result<Vec<String>> {
        self.client
            .get_configuration(team_id)
            .await
            .with_context(|| format!("Failed to load configuration of team {}", team_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FakeApi;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_get_teams_replaces_state() {
        let api = Arc::new(FakeApi::with_token("t"));
        let mut store = TeamStore::new(api);
        assert!(store.teams().is_empty());

        let teams = store.get_teams().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(store.teams()[0].name, "Core");
    }

    #[tokio::test]
    async fn test_add_team_sends_name_and_description_then_reloads() {
        let api = Arc::new(FakeApi::with_token("t"));
        let mut store = TeamStore::new(api.clone());

        let created = store
            .add_team(NewTeam {
                name: "Design".into(),
                description: "ux".into(),
            })
            .await
            .unwrap();
        assert!(created);
        assert_eq!(store.teams().len(), 2);
        assert_eq!(api.calls(), vec!["add_team:Design", "get_teams"]);
    }

    #[tokio::test]
    async fn test_edit_team_updates_local_copy() {
        let api = Arc::new(FakeApi::with_token("t"));
        let mut store = TeamStore::new(api);
        store.get_teams().await.unwrap();

        let mut team = store.teams()[0].clone();
        team.description = "renamed".into();
        store.edit_team(team).await.unwrap();
        assert_eq!(store.teams()[0].description, "renamed");
    }

    #[tokio::test]
    async fn test_configuration_roundtrip() {
        let api = Arc::new(FakeApi::with_token("t"));
        let store = TeamStore::new(api);
        store
            .add_configuration(1, &["firefox".to_string(), "code".to_string()])
            .await
            .unwrap();
        assert_eq!(
            store.get_configuration(1).await.unwrap(),
            vec!["firefox".to_string(), "code".to_string()]
        );
    }

    #[tokio::test]
    async fn test_member_changes_are_forwarded() {
        let api = Arc::new(FakeApi::with_token("t"));
        let store = TeamStore::new(api.clone());
        assert!(assert_ok!(store.add_members(1, &[4, 5]).await));
        assert!(assert_ok!(store.remove_member(1, 4).await));
        assert_eq!(api.calls(), vec!["add_members:1:[4, 5]", "remove_member:1:4"]);
    }

    #[tokio::test]
    async fn test_errors_carry_context() {
        let api = Arc::new(FakeApi::default());
        let store = TeamStore::new(api);
        let err = assert_err!(store.get_team(99).await);
        assert_eq!(err.to_string(), "Failed to load team 99");
    }
}
