/// Wire types for the planner server endpoints
use crate::layout::{CoordinateTable, CourseCatalog, ScheduleOption};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Appended to a tree lookup when it comes from the search bar.
pub const SEARCH_COURSE_FLAG: &str = " SearchCourse";

/// Raw `/_get_tree/` response
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub data: String,
}

/// A tree or search lookup, decoded once from the server's coded string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeOutcome {
    /// Path of the rendered prerequisite tree
    Image { path: String },
    /// Search-bar hit: the course or department page to open
    Found { name: String },
    /// `NA` - not a course
    NotACourse { name: String },
    /// `NP` - no prerequisites
    NoPrereqs { name: String },
    /// `ND` - not a department
    NotADepartment { name: String },
    /// `AT` - already taken
    AlreadyTaken { name: String },
    /// Any other coded reply
    NotFound { name: String },
    /// Nothing was entered
    Empty,
}

impl TreeOutcome {
    pub fn decode(data: &str) -> Self {
        let data = data.trim();
        if data.is_empty() {
            return TreeOutcome::Empty;
        }

        let lower = data.to_lowercase();
        if lower.ends_with(".svg") || lower.ends_with(".png") {
            return TreeOutcome::Image {
                path: data.to_string(),
            };
        }

        let Some((code, rest)) = data.split_once(' ') else {
            return TreeOutcome::Found {
                name: data.to_string(),
            };
        };

        let name = rest.trim().to_string();
        match code {
            "NA" => TreeOutcome::NotACourse { name },
            "NP" => TreeOutcome::NoPrereqs { name },
            "ND" => TreeOutcome::NotADepartment { name },
            "AT" => TreeOutcome::AlreadyTaken { name },
            _ => TreeOutcome::NotFound { name },
        }
    }

    /// Text for the dialog shown when the lookup was rejected.
    pub fn message(&self) -> Option<String> {
        match self {
            TreeOutcome::NotACourse { name } => Some(format!("{name} is not a course offered at UW")),
            TreeOutcome::NoPrereqs { name } => Some(format!("{name} has no Prerequisites")),
            TreeOutcome::NotADepartment { name } => Some(format!("{name} is not a Department")),
            TreeOutcome::AlreadyTaken { name } => Some(format!("{name} has already been taken")),
            TreeOutcome::NotFound { name } => Some(format!("{name} not found")),
            TreeOutcome::Image { .. } | TreeOutcome::Found { .. } | TreeOutcome::Empty => None,
        }
    }
}

/// `/get_geocode/` payload: building coordinates plus offered sections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeocodePayload {
    #[serde(alias = "coords", default)]
    pub data: CoordinateTable,

    #[serde(default)]
    pub courses: CourseCatalog,
}

/// Raw `/check_course/` response
#[derive(Debug, Clone, Deserialize)]
pub struct CheckCourseResponse {
    #[serde(default)]
    pub data: bool,
    #[serde(default)]
    pub name: Option<String>,
}

/// Whether a course can be added to the planned list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCheck {
    /// The id as entered
    pub course: String,
    pub offered: bool,
    /// Name to show in the planned list, e.g. `CSE142 B`
    pub name: Option<String>,
}

/// `/create_schedule/` and `/get_schedules/` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub option: Option<ScheduleOption>,
    #[serde(default)]
    pub coords: CoordinateTable,
}

/// `/_keyword_search/` response: course id to catalog record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatches {
    #[serde(default)]
    pub matches: BTreeMap<String, serde_json::Value>,
}
