//! Team-related models

use serde::{Deserialize, Serialize};

/// Team owned by the current user.
///
/// `GET /teams` also reports the member count, which the edit payload omits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "ownerId", default)]
    pub owner_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

/// Payload for creating a team; the owner is taken from the bearer token
#[derive(Debug, Clone, Serialize)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
}

/// Team member row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
}

/// Team with members and tracked applications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub apps: Vec<String>,
}

/// Team the current user is a member of (`GET /teams/user`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: i32,
    pub name: String,
    pub description: String,
}
