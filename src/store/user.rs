//! Session state: login token, user id, team membership and roles

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DashboardApi;
use crate::models::{PublicUser, SignupRequest};
use crate::storage::{LocalStorage, USER_KEY};

/// Persisted session, stored as JSON under the `user` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    pub user_id: String,
    pub team_ids: Vec<String>,
    pub roles: Vec<i32>,
    pub is_logged_in: bool,
    pub token: String,
}

pub struct UserStore {
    state: SessionState,
    client: Arc<dyn DashboardApi>,
    storage: LocalStorage,
}

impl UserStore {
    /// Restore the session from storage, falling back to a logged-out state.
    ///
    /// A restored logged-in session re-applies its token to the client.
    pub fn restore(storage: LocalStorage, client: Arc<dyn DashboardApi>) -> Result<Self> {
        let state: SessionState = storage.get_json(USER_KEY)?.unwrap_or_default();
        let store = Self {
            state,
            client,
            storage,
        };
        if store.state.is_logged_in && !store.state.token.is_empty() {
            tracing::debug!("Restored session for user '{}'", store.state.user_id);
            store.set_token();
        }
        Ok(store)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in
    }

    /// Authenticate, persist the session and fetch the profile.
    ///
    /// A failed profile fetch does not undo the login; the profile is `None`.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Option<PublicUser>> {
        let token = self
            .client
            .login(email, password)
            .await
            .context("Login failed")?;

        self.set_login_state(token);
        self.set_token();
        self.persist()?;

        match self.get_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Logged in but could not load profile: {:#}", e);
                Ok(None)
            }
        }
    }

    /// Apply the current token to the API client.
    pub fn set_token(&self) {
        self.client.set_token(&self.state.token);
    }

    pub async fn signup(&self, user: &SignupRequest) -> Result<bool> {
        self.client.signup(user).await.context("Signup failed")
    }

    pub fn set_login_state(&mut self, token: String) {
        self.state.token = token;
        self.state.is_logged_in = true;
    }

    pub fn logout(&mut self) -> Result<()> {
        self.state.token.clear();
        self.state.is_logged_in = false;
        self.client.clear_token();
        self.clear_storage()
    }

    pub fn persist(&self) -> Result<()> {
        self.storage.set_json(USER_KEY, &self.state)
    }

    pub fn clear_storage(&self) -> Result<()> {
        self.storage.remove_item(USER_KEY)
    }

    /// Fetch the current user's profile and remember its id.
    pub async fn get_user(&mut self) -> Result<PublicUser> {
        let user = self
            .client
            .get_user()
            .await
            .context("Failed to load user profile")?;
        self.state.user_id = user.id.to_string();
        self.state.roles = vec![i32::from(user.role)];
        self.persist()?;
        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<PublicUser>> {
        self.client
            .get_all_users()
            .await
            .context("Failed to list users")
    }

    /// Refresh `team_ids` from the teams the user belongs to.
    pub async fn refresh_team_ids(&mut self) -> Result<()> {
        let teams = self
            .client
            .get_user_teams()
            .await
            .context("Failed to list user teams")?;
        self.state.team_ids = teams.iter().map(|t| t.id.to_string()).collect();
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FakeApi;

    fn store_in(dir: &std::path::Path, api: Arc<FakeApi>) -> UserStore {
        UserStore::restore(LocalStorage::new(dir), api).unwrap()
    }

    #[test]
    fn test_restore_defaults_when_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::default());
        let store = store_in(dir.path(), api.clone());
        assert_eq!(store.state(), &SessionState::default());
        assert_eq!(api.token(), None);
    }

    #[test]
    fn test_restore_applies_saved_token() {
        let dir = tempfile::tempdir().unwrap();
        LocalStorage::new(dir.path())
            .set_item(
                USER_KEY,
                r#"{"isLoggedIn":true,"teamIds":["2"],"userId":"5","roles":[1],"token":"t0"}"#,
            )
            .unwrap();

        let api = Arc::new(FakeApi::default());
        let store = store_in(dir.path(), api.clone());
        assert!(store.is_logged_in());
        assert_eq!(store.state().team_ids, vec!["2".to_string()]);
        assert_eq!(api.token().as_deref(), Some("t0"));
    }

    #[tokio::test]
    async fn test_login_persists_session_and_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::with_token("jwt"));
        let mut store = store_in(dir.path(), api.clone());

        let user = store.login("a@b.c", "pw").await.unwrap().unwrap();
        assert_eq!(user.id, 7);
        assert!(store.is_logged_in());
        assert_eq!(api.token().as_deref(), Some("jwt"));

        let saved: SessionState = LocalStorage::new(dir.path())
            .get_json(USER_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(saved.token, "jwt");
        assert_eq!(saved.user_id, "7");
        assert!(saved.is_logged_in);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::default());
        let mut store = store_in(dir.path(), api);

        assert!(store.login("a@b.c", "wrong").await.is_err());
        assert!(!store.is_logged_in());
        assert_eq!(LocalStorage::new(dir.path()).get_item(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::with_token("jwt"));
        let mut store = store_in(dir.path(), api.clone());
        store.login("a@b.c", "pw").await.unwrap();

        store.logout().unwrap();
        assert!(!store.is_logged_in());
        assert!(store.state().token.is_empty());
        assert_eq!(api.token(), None);
        assert_eq!(LocalStorage::new(dir.path()).get_item(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_signup_does_not_log_in() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::with_token("jwt"));
        let store = store_in(dir.path(), api.clone());

        let request = SignupRequest {
            email: "new@example.org".into(),
            password: "pw".into(),
            ..Default::default()
        };
        assert!(store.signup(&request).await.unwrap());
        assert!(!store.signup(&SignupRequest::default()).await.unwrap());

        assert_eq!(api.calls(), vec!["signup:new@example.org", "signup:"]);
        assert!(!store.is_logged_in());
        assert_eq!(api.token(), None);
        assert_eq!(LocalStorage::new(dir.path()).get_item(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_users_leaves_session_alone() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::with_token("jwt"));
        let store = store_in(dir.path(), api.clone());

        let users = store.get_all_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "ada@example.org");
        assert_eq!(api.calls(), vec!["get_all_users", "get_user"]);
        assert!(store.state().user_id.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_team_ids() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::with_token("jwt"));
        let mut store = store_in(dir.path(), api);
        store.refresh_team_ids().await.unwrap();
        assert_eq!(store.state().team_ids, vec!["1".to_string(), "3".to_string()]);
    }
}
