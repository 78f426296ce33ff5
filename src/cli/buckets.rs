//! Bucket and event commands

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

use super::{require_login, truncate};
use crate::dashboard::Dashboard;
use crate::models::EventQuery;

/// List buckets for a user; defaults to the logged-in user.
pub async fn list(dashboard: &mut Dashboard, user_id: Option<i32>) -> Result<()> {
    require_login(dashboard)?;
    let user_id = match user_id {
        Some(id) => id,
        None => match dashboard.user.state().user_id.parse() {
            Ok(id) => id,
            Err(_) => dashboard.user.get_user().await?.id,
        },
    };

    let buckets = dashboard
        .api
        .get_user_buckets(user_id)
        .await
        .with_context(|| format!("Failed to list buckets of user {}", user_id))?;

    let mut ids: Vec<&String> = buckets.keys().collect();
    ids.sort();

    println!("\n{:<40} {:<18} {}", "BUCKET", "TYPE", "LAST UPDATED");
    println!("{:-<80}", "");
    if ids.is_empty() {
        println!("  (no buckets)");
    }
    for id in ids {
        let bucket = &buckets[id];
        println!(
            "{:<40} {:<18} {}",
            truncate(id, 40),
            truncate(&bucket.kind, 18),
            format_time(bucket.last_updated)
        );
    }
    Ok(())
}

pub async fn info(dashboard: &Dashboard, bucket_id: &str) -> Result<()> {
    require_login(dashboard)?;
    let bucket = dashboard
        .api
        .get_bucket(bucket_id)
        .await
        .with_context(|| format!("Failed to load bucket {}", bucket_id))?;

    println!();
    println!("Bucket:   {}", bucket.id.as_deref().unwrap_or(bucket_id));
    println!("Type:     {}", bucket.kind);
    println!("Client:   {}", bucket.client.as_deref().unwrap_or("(unknown)"));
    println!("Host:     {}", bucket.hostname.as_deref().unwrap_or("(unknown)"));
    println!("Created:  {}", format_time(bucket.created));
    println!("Updated:  {}", format_time(bucket.last_updated));
    if !bucket.data.is_empty() {
        println!("Data:     {}", serde_json::Value::Object(bucket.data.clone()));
    }
    Ok(())
}

/// Print events; a team id scopes the query to a managed team member's data.
pub async fn events(dashboard: &Dashboard, bucket_id: &str, query: EventQuery) -> Result<()> {
    require_login(dashboard)?;
    let result = if query.team_id.is_some() {
        dashboard.api.get_user_events(bucket_id, &query).await
    } else {
        dashboard.api.get_events(bucket_id, &query).await
    };
    let events = result.with_context(|| format!("Failed to load events of {}", bucket_id))?;

    println!("\n{:<20} {:>10}  {}", "TIME", "DURATION", "LABEL");
    println!("{:-<70}", "");
    if events.is_empty() {
        println!("  (no events)");
    }
    let mut total = 0.0;
    for event in &events {
        total += event.duration;
        println!(
            "{:<20} {:>10}  {}",
            format_time(Some(event.timestamp)),
            format_duration(event.duration),
            truncate(&event.label(), 40)
        );
    }
    println!("{:-<70}", "");
    println!("{} event(s), {}", events.len(), format_duration(total));
    Ok(())
}

pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// `1h 02m`, `3m 05s` or `12s`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}
