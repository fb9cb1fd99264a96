//! `vantedjo-dash` library crate.
//!
//! The binary (`vdash`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without a terminal or a server
//! - the TUI and the one-shot `show` command share one implementation
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod gate;
pub mod io;
pub mod logging;
pub mod plot;
pub mod render;
pub mod report;
pub mod series;
pub mod tui;
