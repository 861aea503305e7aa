//! PCQ (Project Cost & Quality) - stage overviews and Gantt timelines from the command line
//!
//! This library provides the core functionality for PCQ, including:
//! - Typed client for the task-workflow stages API, with a caching query layer
//! - The project timeline view and its Loading / Ready / Error state machine
//! - Gantt rendering behind a widget trait (terminal and JSON renderers)
//! - Local state: view preferences and unsent stage edits (SQLite)
//! - Database maintenance scripts for the backend's PostgreSQL database
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use pcq::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod admin;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;
pub mod view;
pub mod widget;
