//! Turns one schedule option into a map layer.

use super::days::parse_days;
use super::error::LayoutError;
use super::geo::{locate, CoordinateTable, Marker};
use super::types::{ScheduleOption, ScheduledSection};
use serde::Serialize;
use tracing::warn;

/// One schedule option rendered for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    /// Each course once, followed by its sections
    pub header: String,
    /// One marker per building, in first-encounter order
    pub markers: Vec<Marker>,
    /// Buildings referenced by the option that have no coordinates
    pub unplotted: Vec<String>,
    /// RFC 3339 time the layer entered the view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
}

impl MapLayer {
    pub fn stamped(mut self) -> Self {
        self.fetched_at = Some(chrono::Utc::now().to_rfc3339());
        self
    }

    pub fn marker(&self, building: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.building == building)
    }
}

/// Checks the per-occurrence arrays line up and returns their length.
fn occurrence_count(section: &ScheduledSection) -> Result<usize, LayoutError> {
    let lengths = [
        ("Building", section.buildings.len()),
        ("Days", section.days.len()),
        ("Time", section.times.len()),
        ("Room Number", section.rooms.len()),
    ];
    let count = lengths[0].1;

    if lengths.iter().any(|(_, len)| *len != count) {
        let detail = lengths
            .iter()
            .map(|(name, len)| format!("{name}={len}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(LayoutError::MismatchedOccurrences {
            course: section.course.clone(),
            section: section.section.clone(),
            detail,
        });
    }

    Ok(count)
}

fn popup_line(section: &ScheduledSection, k: usize) -> String {
    format!(
        "{} {} {} {} {} {} {}",
        section.course,
        section.kind,
        section.section,
        section.days[k],
        section.times[k],
        section.buildings[k],
        section.rooms[k]
    )
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Builds the map layer for one schedule option.
///
/// Every meeting occurrence adds a line to its building's popup. Buildings
/// keep the order in which the option first mentions them, so the same
/// option always yields the same layer.
pub fn build_page(
    option: &ScheduleOption,
    coords: &CoordinateTable,
) -> Result<MapLayer, LayoutError> {
    let mut buildings: Vec<(String, Vec<String>)> = Vec::new();
    let mut courses: Vec<(String, Vec<String>)> = Vec::new();

    for section in option.sections() {
        let count = occurrence_count(section)?;

        for k in 0..count {
            parse_days(&section.days[k])?;

            let building = section.buildings[k].trim();
            let line = popup_line(section, k);
            match buildings.iter_mut().find(|(b, _)| b == building) {
                Some((_, lines)) => lines.push(line),
                None => buildings.push((building.to_string(), vec![line])),
            }
        }

        let index = match courses.iter().position(|(c, _)| *c == section.course) {
            Some(i) => i,
            None => {
                courses.push((section.course.clone(), Vec::new()));
                courses.len() - 1
            }
        };
        let labels = &mut courses[index].1;
        if !labels.contains(&section.section) {
            labels.push(section.section.clone());
        }
    }

    let header = courses
        .iter()
        .flat_map(|(course, sections)| std::iter::once(course).chain(sections))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    let mut markers = Vec::new();
    let mut unplotted = Vec::new();
    for (building, popup) in buildings {
        match locate(&building, coords) {
            Some(position) => markers.push(Marker {
                building,
                position,
                popup,
            }),
            None => {
                warn!(building = %building, "No coordinates for building, leaving it off the map");
                unplotted.push(building);
            }
        }
    }

    Ok(MapLayer {
        header,
        markers,
        unplotted,
        fetched_at: None,
    })
}
