//! Command-line front end: argument parsing, logging setup, the message
//! loop around `bookmark_core::update` and report printing.
mod app;
mod cli;
mod effects;
mod logging;
mod report;

pub use app::run_app;
