//! API client module for aw-server
//!
//! [`DashboardApi`] lists every endpoint the dashboard uses. Stores depend on
//! the trait, [`AwClient`] implements it over HTTP.

pub mod client;
mod error;

use async_trait::async_trait;
use reqwest::Method;

use crate::models::{
    Bucket, BucketMap, Event, EventQuery, LoginRequest, NewTeam, PublicUser, ServerInfo,
    SignupRequest, Team, TeamDetail, TeamMembership,
};

pub use client::AwClient;
pub use error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Endpoints consumed by the dashboard.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    fn set_token(&self, token: &str);
    fn clear_token(&self);

    async fn login(&self, email: &str, password: &str) -> ApiResult<String>;
    async fn signup(&self, user: &SignupRequest) -> ApiResult<bool>;
    async fn get_user(&self) -> ApiResult<PublicUser>;
    async fn get_all_users(&self) -> ApiResult<Vec<PublicUser>>;

    async fn get_teams(&self) -> ApiResult<Vec<Team>>;
    async fn get_user_teams(&self) -> ApiResult<Vec<TeamMembership>>;
    async fn add_team(&self, team: &NewTeam) -> ApiResult<bool>;
    async fn edit_team(&self, team: &Team) -> ApiResult<()>;
    async fn get_team(&self, team_id: i32) -> ApiResult<TeamDetail>;
    async fn add_members(&self, team_id: i32, members: &[i32]) -> ApiResult<bool>;
    async fn remove_member(&self, team_id: i32, member_id: i32) -> ApiResult<bool>;
    async fn get_configuration(&self, team_id: i32) -> ApiResult<Vec<String>>;
    async fn add_configuration(&self, team_id: i32, apps: &[String]) -> ApiResult<()>;

    async fn get_info(&self) -> ApiResult<ServerInfo>;
    async fn get_user_buckets(&self, user_id: i32) -> ApiResult<BucketMap>;
    async fn get_bucket(&self, bucket_id: &str) -> ApiResult<Bucket>;
    async fn get_events(&self, bucket_id: &str, query: &EventQuery) -> ApiResult<Vec<Event>>;
    /// Like `get_events`, scoped to a team the caller manages.
    async fn get_user_events(&self, bucket_id: &str, query: &EventQuery)
        -> ApiResult<Vec<Event>>;
}

#[async_trait]
impl DashboardApi for AwClient {
    fn set_token(&self, token: &str) {
        AwClient::set_token(self, token)
    }

    fn clear_token(&self) {
        AwClient::clear_token(self)
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let body = LoginRequest { email, password };
        self.send_json(Method::POST, &["user", "login"], |b| b.json(&body))
            .await
    }

    async fn signup(&self, user: &SignupRequest) -> ApiResult<bool> {
        self.send_json(Method::POST, &["user", "signup"], |b| b.json(user))
            .await
    }

    async fn get_user(&self) -> ApiResult<PublicUser> {
        self.send_json(Method::GET, &["user", "getuser"], |b| b).await
    }

    async fn get_all_users(&self) -> ApiResult<Vec<PublicUser>> {
        self.send_json(Method::GET, &["user", "users"], |b| b).await
    }

    async fn get_teams(&self) -> ApiResult<Vec<Team>> {
        self.send_json(Method::GET, &["teams"], |b| b).await
    }

    async fn get_user_teams(&self) -> ApiResult<Vec<TeamMembership>> {
        self.send_json(Method::GET, &["teams", "user"], |b| b).await
    }

    async fn add_team(&self, team: &NewTeam) -> ApiResult<bool> {
        self.send_json(Method::POST, &["teams"], |b| b.json(team)).await
    }

    async fn edit_team(&self, team: &Team) -> ApiResult<()> {
        self.send(Method::PUT, &["teams"], |b| b.json(team)).await?;
        Ok(())
    }

    async fn get_team(&self, team_id: i32) -> ApiResult<TeamDetail> {
        let id = team_id.to_string();
        self.send_json(Method::GET, &["teams", "team", &id], |b| b)
            .await
    }

    async fn add_members(&self, team_id: i32, members: &[i32]) -> ApiResult<bool> {
        let id = team_id.to_string();
        self.send_json(Method::POST, &["teams", &id, "members"], |b| {
            b.json(members)
        })
        .await
    }

    async fn remove_member(&self, team_id: i32, member_id: i32) -> ApiResult<bool> {
        let id = team_id.to_string();
        let member = member_id.to_string();
        self.send_json(Method::DELETE, &["teams", &id, "member", &member], |b| b)
            .await
    }

    async fn get_configuration(&self, team_id: i32) -> ApiResult<Vec<String>> {
        let id = team_id.to_string();
        self.send_json(Method::GET, &["teams", "configuration", &id], |b| b)
            .await
    }

    async fn add_configuration(&self, team_id: i32, apps: &[String]) -> ApiResult<()> {
        let id = team_id.to_string();
        self.send(Method::POST, &["teams", &id, "configuration"], |b| {
            b.json(apps)
        })
        .await?;
        Ok(())
    }

    async fn get_info(&self) -> ApiResult<ServerInfo> {
        self.send_json(Method::GET, &["0", "info"], |b| b).await
    }

    async fn get_user_buckets(&self, user_id: i32) -> ApiResult<BucketMap> {
        let id = user_id.to_string();
        self.send_json(Method::GET, &["0", "buckets", &id], |b| b).await
    }

    async fn get_bucket(&self, bucket_id: &str) -> ApiResult<Bucket> {
        self.send_json(Method::GET, &["0", "buckets", bucket_id, "info"], |b| b)
            .await
    }

    async fn get_events(&self, bucket_id: &str, query: &EventQuery) -> ApiResult<Vec<Event>> {
        let query = EventQuery {
            team_id: None,
            ..query.clone()
        };
        let pairs = query.to_pairs();
        self.send_json(Method::GET, &["0", "buckets", bucket_id, "events"], |b| {
            b.query(&pairs)
        })
        .await
    }

    async fn get_user_events(
        &self,
        bucket_id: &str,
        query: &EventQuery,
    ) -> ApiResult<Vec<Event>> {
        let pairs = query.to_pairs();
        self.send_json(Method::GET, &["0", "buckets", bucket_id, "events"], |b| {
            b.query(&pairs)
        })
        .await
    }
}
