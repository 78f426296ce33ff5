//! In-memory `DashboardApi` used by store and TUI tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, ApiResult, DashboardApi};
use crate::models::{
    Bucket, BucketMap, Event, EventQuery, NewTeam, PublicUser, ServerInfo, SignupRequest, Team,
    TeamDetail, TeamMembership,
};

#[derive(Default)]
pub struct FakeApi {
    /// Token handed out by `login`; `None` rejects every login.
    login_token: Option<String>,
    token: Mutex<Option<String>>,
    teams: Mutex<Vec<Team>>,
    configuration: Mutex<HashMap<i32, Vec<String>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_token(token: &str) -> Self {
        Self {
            login_token: Some(token.to_string()),
            teams: Mutex::new(vec![Team {
                id: 1,
                name: "Core".into(),
                description: "core team".into(),
                owner_id: 7,
                count: Some(2),
            }]),
            ..Default::default()
        }
    }

    /// Token currently applied by the stores.
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("{} not found", what),
        }
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }

    async fn login(&self, email: &str, _password: &str) -> ApiResult<String> {
        self.record(format!("login:{}", email));
        self.login_token.clone().ok_or(ApiError::Status {
            status: 400,
            message: "No user with this password found".into(),
        })
    }

    async fn signup(&self, user: &SignupRequest) -> ApiResult<bool> {
        self.record(format!("signup:{}", user.email));
        Ok(!user.email.is_empty())
    }

    async fn get_user(&self) -> ApiResult<PublicUser> {
        self.record("get_user");
        Ok(PublicUser {
            id: 7,
            email: "ada@example.org".into(),
            name: "Ada".into(),
            lastname: "Lovelace".into(),
            role: 1,
        })
    }

    async fn get_all_users(&self) -> ApiResult<Vec<PublicUser>> {
        self.record("get_all_users");
        Ok(vec![self.get_user().await?])
    }

    async fn get_teams(&self) -> ApiResult<Vec<Team>> {
        self.record("get_teams");
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn get_user_teams(&self) -> ApiResult<Vec<TeamMembership>> {
        self.record("get_user_teams");
        Ok([1, 3]
            .into_iter()
            .map(|id| TeamMembership {
                id,
                name: format!("team {}", id),
                description: String::new(),
            })
            .collect())
    }

    async fn add_team(&self, team: &NewTeam) -> ApiResult<bool> {
        self.record(format!("add_team:{}", team.name));
        let mut teams = self.teams.lock().unwrap();
        let id = teams.len() as i32 + 1;
        teams.push(Team {
            id,
            name: team.name.clone(),
            description: team.description.clone(),
            owner_id: 7,
            count: Some(0),
        });
        Ok(true)
    }

    async fn edit_team(&self, team: &Team) -> ApiResult<()> {
        self.record(format!("edit_team:{}", team.id));
        let mut teams = self.teams.lock().unwrap();
        let existing = teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or_else(|| Self::not_found("team"))?;
        *existing = team.clone();
        Ok(())
    }

    async fn get_team(&self, team_id: i32) -> ApiResult<TeamDetail> {
        self.record(format!("get_team:{}", team_id));
        let teams = self.teams.lock().unwrap();
        let team = teams
            .iter()
            .find(|t| t.id == team_id)
            .ok_or_else(|| Self::not_found("team"))?;
        Ok(TeamDetail {
            id: team.id,
            name: team.name.clone(),
            description: team.description.clone(),
            members: Vec::new(),
            apps: Vec::new(),
        })
    }

    async fn add_members(&self, team_id: i32, members: &[i32]) -> ApiResult<bool> {
        self.record(format!("add_members:{}:{:?}", team_id, members));
        Ok(true)
    }

    async fn remove_member(&self, team_id: i32, member_id: i32) -> ApiResult<bool> {
        self.record(format!("remove_member:{}:{}", team_id, member_id));
        Ok(true)
    }

    async fn get_configuration(&self, team_id: i32) -> ApiResult<Vec<String>> {
        self.record(format!("get_configuration:{}", team_id));
        Ok(self
            .configuration
            .lock()
            .unwrap()
            .get(&team_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_configuration(&self, team_id: i32, apps: &[String]) -> ApiResult<()> {
        self.record(format!("add_configuration:{}", team_id));
        self.configuration
            .lock()
            .unwrap()
            .insert(team_id, apps.to_vec());
        Ok(())
    }

    async fn get_info(&self) -> ApiResult<ServerInfo> {
        Ok(ServerInfo {
            hostname: "test-host".into(),
            version: "v0.12.3".into(),
            testing: true,
            device_id: None,
        })
    }

    async fn get_user_buckets(&self, user_id: i32) -> ApiResult<BucketMap> {
        self.record(format!("get_user_buckets:{}", user_id));
        Ok(BucketMap::new())
    }

    async fn get_bucket(&self, bucket_id: &str) -> ApiResult<Bucket> {
        Err(Self::not_found(bucket_id))
    }

    async fn get_events(&self, bucket_id: &str, _query: &EventQuery) -> ApiResult<Vec<Event>> {
        self.record(format!("get_events:{}", bucket_id));
        Ok(Vec::new())
    }

    async fn get_user_events(
        &self,
        bucket_id: &str,
        _query: &EventQuery,
    ) -> ApiResult<Vec<Event>> {
        self.record(format!("get_user_events:{}", bucket_id));
        Ok(Vec::new())
    }
}
