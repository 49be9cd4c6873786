//! Access to the planner server: tree lookups, geocode data, course checks,
//! and schedule options.

mod cache;
mod client;
mod error;
mod types;

#[cfg(test)]
pub(crate) mod scripted;

pub use cache::UpstreamCacheState;
pub use client::{HttpPlanner, UpstreamConfig};
pub use error::UpstreamError;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Operations offered by the planner server.
///
/// The service only talks to the server through this trait, so handlers can
/// run against an in-memory planner in tests.
#[async_trait]
pub trait PlannerApi: Send + Sync {
    /// Prerequisite tree for a course, or the coded reason there is none.
    async fn get_tree(&self, name: &str) -> Result<TreeOutcome, UpstreamError>;

    /// Search-bar lookup. Same endpoint as [`PlannerApi::get_tree`] with the
    /// search flag appended.
    async fn search_course(&self, name: &str) -> Result<TreeOutcome, UpstreamError> {
        self.get_tree(&format!("{name}{SEARCH_COURSE_FLAG}")).await
    }

    async fn keyword_search(&self, keyword: &str) -> Result<KeywordMatches, UpstreamError>;

    /// Building coordinates and the offered-section catalog.
    async fn geocode(&self) -> Result<Arc<GeocodePayload>, UpstreamError>;

    async fn check_course(&self, course: &str) -> Result<CourseCheck, UpstreamError>;

    /// Starts a new schedule search and returns its first option.
    async fn create_schedule(&self, courses: &[String]) -> Result<ScheduleResponse, UpstreamError>;

    /// Next option of the current search.
    async fn next_schedule(&self) -> Result<ScheduleResponse, UpstreamError>;

    /// Re-gathers the server's course data.
    async fn gather(&self) -> Result<(), UpstreamError>;
}
