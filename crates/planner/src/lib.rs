//! Presentation service for the UW course planner.
//!
//! Sits between the browser and the planner server: it fetches course data
//! and schedule options from the server, lays them out as weekly grids and
//! map layers, and keeps track of which schedule option is visible.

pub mod config;
pub mod error;
pub mod layout;
pub mod lookup;
pub mod schedule;
pub mod server;
pub mod types;
pub mod upstream;
