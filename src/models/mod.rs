//! Data models for aw-server entities

mod bucket;
mod team;
mod user;

pub use bucket::*;
pub use team::*;
pub use user::*;
