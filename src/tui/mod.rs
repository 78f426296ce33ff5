//! Terminal dashboard
//!
//! Ratatui front end over the same stores and router the CLI uses.

mod app;
mod backend;
mod help;
mod input;
mod keymap;
mod log_capture;
mod ui;
mod views;

pub use app::run;
pub use log_capture::LogTail;
