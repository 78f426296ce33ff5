//! State containers shared by the CLI and the TUI
//!
//! Each store owns a slice of client-side state and forwards server work to a
//! [`DashboardApi`](crate::api::DashboardApi) implementation.

pub mod global;
pub mod team;
pub mod user;

pub use global::GlobalStore;
pub use team::TeamStore;
pub use user::{SessionState, UserStore};

#[cfg(test)]
pub(crate) mod testing;
