//! Prerequisite-tree lookups, course search, and course checks.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::PlannerError;
use crate::types::{Control, WrapperState};
use crate::upstream::{CourseCheck, KeywordMatches, TreeOutcome};

/// A decoded lookup plus the dialog text when it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupReply {
    pub outcome: TreeOutcome,
    pub message: Option<String>,
}

impl From<TreeOutcome> for LookupReply {
    fn from(outcome: TreeOutcome) -> Self {
        let message = outcome.message();
        Self { outcome, message }
    }
}

/// Prerequisite tree for `name`. Shares the search control, so one lookup
/// runs at a time.
pub async fn lookup_tree(state: &Arc<WrapperState>, name: &str) -> Result<LookupReply, PlannerError> {
    let _claim = state.claim(Control::Search)?;
    let name = name.trim();
    if name.is_empty() {
        return Ok(TreeOutcome::Empty.into());
    }

    let outcome = state.planner.get_tree(name).await?;
    info!(course = %name, outcome = ?outcome, "Tree lookup finished");
    Ok(outcome.into())
}

/// Search-bar lookup. One search runs at a time.
pub async fn search_course(
    state: &Arc<WrapperState>,
    name: &str,
) -> Result<LookupReply, PlannerError> {
    let _claim = state.claim(Control::Search)?;
    let name = name.trim();
    if name.is_empty() {
        return Ok(TreeOutcome::Empty.into());
    }

    let outcome = state.planner.search_course(name).await?;
    info!(course = %name, outcome = ?outcome, "Course search finished");
    Ok(outcome.into())
}

pub async fn keyword_search(
    state: &Arc<WrapperState>,
    keyword: &str,
) -> Result<KeywordMatches, PlannerError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(PlannerError::InvalidRequest {
            message: "keyword must not be empty".to_string(),
        });
    }

    let matches = state.planner.keyword_search(keyword).await?;
    info!(keyword = %keyword, matches = matches.matches.len(), "Keyword search finished");
    Ok(matches)
}

/// Checks whether one course can be added to the planned list.
pub async fn check_course(
    state: &Arc<WrapperState>,
    course: &str,
) -> Result<CourseCheck, PlannerError> {
    let _claim = state.claim(Control::AddCourse)?;
    check_one(state, course).await
}

/// Checks several courses concurrently, keeping input order.
///
/// The first failing check fails the batch.
pub async fn check_courses(
    state: &Arc<WrapperState>,
    courses: &[String],
) -> Result<Vec<CourseCheck>, PlannerError> {
    let _claim = state.claim(Control::AddCourse)?;

    let checks = join_all(courses.iter().map(|c| check_one(state, c))).await;
    let checks = checks.into_iter().collect::<Result<Vec<_>, _>>()?;

    let offered = checks.iter().filter(|c| c.offered).count();
    info!(requested = courses.len(), offered = offered, "Batch course check finished");
    Ok(checks)
}

async fn check_one(state: &Arc<WrapperState>, course: &str) -> Result<CourseCheck, PlannerError> {
    let course = course.trim();
    if course.is_empty() {
        return Err(PlannerError::InvalidRequest {
            message: "course must not be empty".to_string(),
        });
    }

    let check = state.planner.check_course(course).await?;
    if !check.offered {
        warn!(course = %course, "Course is not offered");
    }
    Ok(check)
}

/// Asks the server to re-gather its course data.
pub async fn gather(state: &Arc<WrapperState>) -> Result<(), PlannerError> {
    let _claim = state.claim(Control::Gather)?;
    state.planner.gather().await?;
    info!("Gather finished");
    Ok(())
}
