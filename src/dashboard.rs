//! Wiring of client, stores, storage and router

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{AwClient, DashboardApi};
use crate::config::Config;
use crate::models::PublicUser;
use crate::router::{GuardDecision, ResolvedRoute, Router, LOGIN_PATH};
use crate::storage::LocalStorage;
use crate::store::{GlobalStore, TeamStore, UserStore};

/// Where a successful login lands.
pub const POST_LOGIN_PATH: &str = "/teams";

pub struct Dashboard {
    pub api: Arc<dyn DashboardApi>,
    pub global: GlobalStore,
    pub user: UserStore,
    pub team: TeamStore,
    pub router: Router,
    pub storage: LocalStorage,
}

impl Dashboard {
    /// Build the HTTP client from config and restore the saved session.
    pub fn open(config: &Config) -> Result<Self> {
        let global = GlobalStore::new();
        let client = AwClient::from_config(config, global.clone())
            .context("Failed to create API client")?;
        tracing::debug!("API base {}", client.base_url());
        let storage = LocalStorage::open_default()?;
        Self::with_api(Arc::new(client), global, storage)
    }

    pub fn with_api(
        api: Arc<dyn DashboardApi>,
        global: GlobalStore,
        storage: LocalStorage,
    ) -> Result<Self> {
        let user = UserStore::restore(storage.clone(), Arc::clone(&api))?;
        let team = TeamStore::new(Arc::clone(&api));
        let landing = storage.clone();
        let mut router = Router::with_default_routes(Box::new(move || landing.landing_page()));
        router.before_each(Box::new(|to: &ResolvedRoute, from: Option<&ResolvedRoute>| {
            tracing::debug!(
                "Navigating {} -> {}",
                from.map_or("(start)", |r| r.path.as_str()),
                to.path
            );
            GuardDecision::Continue
        }));

        Ok(Self {
            api,
            global,
            user,
            team,
            router,
            storage,
        })
    }

    /// Log in and navigate to the teams page.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Option<PublicUser>> {
        let user = self.user.login(email, password).await?;
        self.router.push(POST_LOGIN_PATH)?;
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.user.logout()?;
        self.router.push(LOGIN_PATH)?;
        Ok(())
    }

    /// Navigate to `path`.
    pub fn navigate(&mut self, path: &str) -> Result<&ResolvedRoute> {
        Ok(self.router.push(path)?)
    }
}
