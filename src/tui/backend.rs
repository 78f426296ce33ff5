//! Async backend: owns the dashboard state and runs API calls off the UI loop.
//!
//! The TUI sends `BackendCommand` values over an mpsc channel; a background
//! tokio task applies them to the `Dashboard` one at a time and answers with
//! `BackendResponse` values. Messages from the global store are forwarded as
//! they change.

use tokio::sync::mpsc;

use crate::dashboard::Dashboard;
use crate::models::{BucketMap, Event, EventQuery, NewTeam, Team, TeamDetail};
use crate::router::ResolvedRoute;
use crate::store::SessionState;

/// Events fetched per bucket view.
const EVENT_LIMIT: u64 = 100;

/// Commands sent from the TUI event loop to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    Navigate(String),
    Back,
    Login { email: String, password: String },
    Logout,
    LoadTeams,
    LoadTeam(i32),
    AddTeam(NewTeam),
    LoadBuckets,
    LoadEvents(String),
}

/// Responses from the backend to the TUI.
pub enum BackendResponse {
    Route(Result<ResolvedRoute, String>),
    Session(SessionState),
    Teams(Result<Vec<Team>, String>),
    Team(Result<TeamDetail, String>),
    Buckets(Result<BucketMap, String>),
    Events {
        bucket_id: String,
        result: Result<Vec<Event>, String>,
    },
    /// Global store message changed (empty = cleared).
    Message(String),
}

/// Handle for interacting with the backend from the TUI side.
pub struct Backend {
    cmd_tx: mpsc::UnboundedSender<BackendCommand>,
    resp_rx: mpsc::UnboundedReceiver<BackendResponse>,
}

impl Backend {
    /// Spawn the backend task around `dashboard`.
    pub fn start(dashboard: Dashboard) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        tokio::spawn(backend_loop(dashboard, cmd_rx, resp_tx));

        Self { cmd_tx, resp_rx }
    }

    /// Send a command to the backend (non-blocking).
    pub fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Backend channel closed -- command dropped");
        }
    }

    /// Next response; `None` once the backend task has exited.
    pub async fn recv(&mut self) -> Option<BackendResponse> {
        self.resp_rx.recv().await
    }
}

async fn backend_loop(
    mut dashboard: Dashboard,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    resp_tx: mpsc::UnboundedSender<BackendResponse>,
) {
    let mut messages = dashboard.global.subscribe();
    let _ = resp_tx.send(BackendResponse::Session(dashboard.user.state().clone()));

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                tracing::debug!("Backend command: {:?}", redact(&cmd));
                for resp in handle(&mut dashboard, cmd).await {
                    if resp_tx.send(resp).is_err() {
                        return;
                    }
                }
            }
            changed = messages.changed() => {
                if changed.is_err() {
                    break;
                }
                let message = messages.borrow_and_update().clone();
                if resp_tx.send(BackendResponse::Message(message)).is_err() {
                    return;
                }
            }
        }
    }
}

/// Command as logged; the password never reaches the log.
fn redact(cmd: &BackendCommand) -> String {
    match cmd {
        BackendCommand::Login { email, .. } => format!("Login {{ email: {:?} }}", email),
        other => format!("{:?}", other),
    }
}

/// Apply one command and collect the responses it produces.
pub async fn handle(dashboard: &mut Dashboard, cmd: BackendCommand) -> Vec<BackendResponse> {
    match cmd {
        BackendCommand::Navigate(path) => {
            vec![BackendResponse::Route(
                dashboard
                    .navigate(&path)
                    .cloned()
                    .map_err(|e| format!("{:#}", e)),
            )]
        }
        BackendCommand::Back => match dashboard.router.back().cloned() {
            Some(route) => vec![BackendResponse::Route(Ok(route))],
            None => Vec::new(),
        },
        BackendCommand::Login { email, password } => {
            let mut out = Vec::new();
            match dashboard.login(&email, &password).await {
                Ok(_) => {
                    dashboard.global.clear();
                    out.push(BackendResponse::Session(dashboard.user.state().clone()));
                    if let Some(route) = dashboard.router.current() {
                        out.push(BackendResponse::Route(Ok(route.clone())));
                    }
                }
                Err(e) => {
                    tracing::warn!("Login failed: {:#}", e);
                    if dashboard.global.message().is_empty() {
                        dashboard.global.set_message(format!("{:#}", e));
                    }
                }
            }
            out
        }
        BackendCommand::Logout => {
            let route = dashboard
                .logout()
                .map(|_| dashboard.router.current().cloned())
                .map_err(|e| format!("{:#}", e));
            let mut out = vec![BackendResponse::Session(dashboard.user.state().clone())];
            match route {
                Ok(Some(route)) => out.push(BackendResponse::Route(Ok(route))),
                Ok(None) => {}
                Err(e) => out.push(BackendResponse::Route(Err(e))),
            }
            out
        }
        BackendCommand::LoadTeams => {
            let result = dashboard
                .team
                .get_teams()
                .await
                .map(<[Team]>::to_vec)
                .map_err(|e| format!("{:#}", e));
            vec![BackendResponse::Teams(result)]
        }
        BackendCommand::LoadTeam(id) => {
            let result = dashboard
                .team
                .get_team(id)
                .await
                .map_err(|e| format!("{:#}", e));
            vec![BackendResponse::Team(result)]
        }
        BackendCommand::AddTeam(team) => {
            let result = match dashboard.team.add_team(team).await {
                Ok(_) => Ok(dashboard.team.teams().to_vec()),
                Err(e) => Err(format!("{:#}", e)),
            };
            vec![BackendResponse::Teams(result)]
        }
        BackendCommand::LoadBuckets => {
            let result = load_buckets(dashboard).await;
            vec![BackendResponse::Buckets(result)]
        }
        BackendCommand::LoadEvents(bucket_id) => {
            let query = EventQuery {
                limit: Some(EVENT_LIMIT),
                ..Default::default()
            };
            let result = dashboard
                .api
                .get_events(&bucket_id, &query)
                .await
                .map_err(|e| format!("{:#}", e));
            vec![BackendResponse::Events { bucket_id, result }]
        }
    }
}

async fn load_buckets(dashboard: &mut Dashboard) -> Result<BucketMap, String> {
    let user_id = match dashboard.user.state().user_id.parse::<i32>() {
        Ok(id) => id,
        Err(_) => {
            dashboard
                .user
                .get_user()
                .await
                .map_err(|e| format!("{:#}", e))?
                .id
        }
    };
    dashboard
        .api
        .get_user_buckets(user_id)
        .await
        .map_err(|e| format!("{:#}", e))
}
