//! Command-line handlers. Each prints to stdout and returns errors to `main`.

pub mod buckets;
pub mod routes;
pub mod session;
pub mod settings;
pub mod teams;

use anyhow::{bail, Result};

use crate::api::ApiError;
use crate::dashboard::Dashboard;

/// Fail early with a hint when no session is stored.
fn require_login(dashboard: &Dashboard) -> Result<()> {
    if !dashboard.user.is_logged_in() {
        bail!("Not logged in. Run 'aw-dashboard login' first.");
    }
    Ok(())
}

/// Follow-up advice for errors the user can fix, e.g. an expired token.
pub fn hint(err: &anyhow::Error) -> Option<&'static str> {
    let api_err = err.chain().find_map(|e| e.downcast_ref::<ApiError>())?;
    if api_err.is_unauthorized() {
        return Some("The server rejected the stored session. Run 'aw-dashboard login' again.");
    }
    match api_err {
        ApiError::Transport { .. } => {
            Some("Check that aw-server is running, or pass --server / --testing.")
        }
        _ => None,
    }
}

/// Truncate to `max` characters, marking the cut with `~`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
