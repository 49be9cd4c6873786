//! Weekly grids, campus buildings, and the paginated schedule map.
//!
//! Navigation follows one rule: the upstream request resolves first, then
//! the view is mutated. The view lock is never held across a request, and
//! the generation read before a fetch decides whether its layer may still
//! be appended.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::PlannerError;
use crate::layout::{
    build_grid, build_page, campus_markers, distance_between, ChosenCourse, Grid, Marker,
    PageOutcome, ScheduleOption, Step,
};
use crate::types::{Control, WrapperState};

/// Campus buildings for the map's initial layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampusBuildings {
    pub markers: Vec<Marker>,
    pub unplotted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingDistance {
    pub from: String,
    pub to: String,
    pub meters: f64,
}

/// Lays out the chosen courses on the weekly grid.
///
/// Each entry is a course id, optionally followed by a lecture letter
/// (`"CSE142 B"`).
pub async fn weekly_grid(state: &Arc<WrapperState>, courses: &[String]) -> Result<Grid, PlannerError> {
    let chosen: Vec<ChosenCourse> = courses
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(ChosenCourse::parse)
        .collect();
    if chosen.is_empty() {
        return Err(PlannerError::InvalidRequest {
            message: "no courses were chosen".to_string(),
        });
    }

    let payload = state.planner.geocode().await?;
    let grid = build_grid(&chosen, &payload.courses, &state.config.grid)?;
    info!(
        courses = chosen.len(),
        rows_used = grid.rows_used,
        truncated = grid.truncated.len(),
        "Built weekly grid"
    );
    Ok(grid)
}

pub async fn campus_buildings(state: &Arc<WrapperState>) -> Result<CampusBuildings, PlannerError> {
    let payload = state.planner.geocode().await?;
    let (markers, unplotted) = campus_markers(&payload.data);
    if !unplotted.is_empty() {
        warn!(count = unplotted.len(), "Some buildings have no coordinates");
    }
    Ok(CampusBuildings { markers, unplotted })
}

pub async fn building_distance(
    state: &Arc<WrapperState>,
    from: &str,
    to: &str,
) -> Result<BuildingDistance, PlannerError> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();
    let payload = state.planner.geocode().await?;
    let meters = distance_between(&from, &to, &payload.data)?;
    Ok(BuildingDistance { from, to, meters })
}

/// Starts a new schedule search and shows its first option.
///
/// Replaces every previously built layer.
pub async fn create_schedule(
    state: &Arc<WrapperState>,
    courses: &[String],
) -> Result<PageOutcome, PlannerError> {
    let _claim = state.claim(Control::BuildSchedule)?;

    let courses: Vec<String> = courses
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if courses.is_empty() {
        return Err(PlannerError::InvalidRequest {
            message: "no courses were chosen".to_string(),
        });
    }

    let start = Instant::now();
    let response = state.planner.create_schedule(&courses).await?;

    let Some(option) = response.option else {
        state.view.lock().await.clear();
        info!(courses = ?courses, "No schedule combination found");
        return Ok(PageOutcome::NoCombinations);
    };

    // The server is already on the new search
    let layer = match build_page(&option, &response.coords) {
        Ok(layer) => layer.stamped(),
        Err(e) => {
            state.view.lock().await.clear();
            warn!(courses = ?courses, error = %e, "First schedule option could not be laid out");
            return Err(e.into());
        }
    };
    let view = state.view.lock().await.reset(layer);
    info!(
        courses = ?courses,
        header = %view.layer.header,
        duration_ms = start.elapsed().as_millis() as u64,
        "Built first schedule option"
    );
    Ok(PageOutcome::Shown(view))
}

/// Shows the next option, fetching it when the cached layers run out.
pub async fn next_page(state: &Arc<WrapperState>) -> Result<PageOutcome, PlannerError> {
    let _claim = state.claim(Control::AdvancePage)?;

    let generation = {
        let mut view = state.view.lock().await;
        match view.forward() {
            Step::Empty => return Ok(PageOutcome::NoSchedule),
            Step::Moved(_) | Step::AtStart => return Ok(shown(&view)),
            Step::NeedsFetch => view.generation(),
        }
    };

    let response = state.planner.next_schedule().await?;

    let Some(option) = response.option else {
        let view = state.view.lock().await;
        if view.generation() != generation {
            return Err(PlannerError::Superseded);
        }
        info!(total = view.len(), "No more schedule options");
        return Ok(match view.current() {
            Some(current) => PageOutcome::NoMoreOptions(current),
            None => PageOutcome::NoSchedule,
        });
    };

    let layer = match build_page(&option, &response.coords) {
        Ok(layer) => layer.stamped(),
        Err(e) => {
            warn!(
                courses = ?option_courses(&option),
                error = %e,
                "Skipping schedule option that could not be laid out"
            );
            return Err(e.into());
        }
    };
    let mut view = state.view.lock().await;
    match view.append(generation, layer) {
        Some(page) => {
            info!(index = page.index, header = %page.layer.header, "Fetched next schedule option");
            Ok(PageOutcome::Shown(page))
        }
        None => {
            warn!("Schedule was rebuilt during the fetch, dropping the option");
            Err(PlannerError::Superseded)
        }
    }
}

/// Shows the previous layer. No request is made.
pub async fn previous_page(state: &Arc<WrapperState>) -> PageOutcome {
    let mut view = state.view.lock().await;
    match view.back() {
        Step::Empty => PageOutcome::NoSchedule,
        Step::AtStart => match view.current() {
            Some(current) => PageOutcome::AtStart(current),
            None => PageOutcome::NoSchedule,
        },
        Step::Moved(_) | Step::NeedsFetch => shown(&view),
    }
}

pub async fn current_page(state: &Arc<WrapperState>) -> PageOutcome {
    shown(&*state.view.lock().await)
}

/// Each course of an option once, in order.
fn option_courses(option: &ScheduleOption) -> Vec<&str> {
    let mut courses: Vec<&str> = Vec::new();
    for section in option.sections() {
        if !courses.contains(&section.course.as_str()) {
            courses.push(&section.course);
        }
    }
    courses
}

fn shown(view: &crate::layout::ScheduleViewState) -> PageOutcome {
    match view.current() {
        Some(current) => PageOutcome::Shown(current),
        None => PageOutcome::NoSchedule,
    }
}
