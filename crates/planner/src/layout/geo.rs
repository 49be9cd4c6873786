//! Building coordinates and markers.

use super::error::LayoutError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A plottable position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Coordinates as geocoded by the server. Either side may be blank when
/// geocoding failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoordinates {
    #[serde(rename = "Latitude", alias = "lat", default, deserialize_with = "text_or_number")]
    pub latitude: String,

    #[serde(rename = "Longitude", alias = "lon", default, deserialize_with = "text_or_number")]
    pub longitude: String,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RawCoordinates {
    /// The position, or `None` when either side is blank or not a number.
    ///
    /// Blank coordinates are never treated as `0,0`.
    pub fn point(&self) -> Option<GeoPoint> {
        let latitude = self.latitude.trim().parse::<f64>().ok()?;
        let longitude = self.longitude.trim().parse::<f64>().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

/// Building code to its geocoded coordinates.
pub type CoordinateTable = BTreeMap<String, RawCoordinates>;

/// Resolves a building in the table.
pub fn locate(building: &str, coords: &CoordinateTable) -> Option<GeoPoint> {
    coords.get(building).and_then(RawCoordinates::point)
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(f64),
        Missing(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Missing(()) => String::new(),
    })
}

/// A map marker for one building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub building: String,
    pub position: GeoPoint,
    /// Popup lines, in the order they were added
    pub popup: Vec<String>,
}

impl Marker {
    pub fn popup_text(&self) -> String {
        self.popup.join("\n")
    }
}

/// Markers for every plottable building, by building code.
///
/// Returns the markers and the codes of buildings that could not be placed.
pub fn campus_markers(coords: &CoordinateTable) -> (Vec<Marker>, Vec<String>) {
    let mut markers = Vec::new();
    let mut unplotted = Vec::new();

    for (building, raw) in coords {
        match raw.point() {
            Some(position) => markers.push(Marker {
                building: building.clone(),
                position,
                popup: raw.name.iter().filter(|n| !n.is_empty()).cloned().collect(),
            }),
            None => unplotted.push(building.clone()),
        }
    }

    (markers, unplotted)
}

/// Great-circle distance between two buildings, in metres.
pub fn distance_between(
    from: &str,
    to: &str,
    coords: &CoordinateTable,
) -> Result<f64, LayoutError> {
    let a = locate(from, coords).ok_or_else(|| LayoutError::Unplottable {
        building: from.to_string(),
    })?;
    let b = locate(to, coords).ok_or_else(|| LayoutError::Unplottable {
        building: to.to_string(),
    })?;

    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    Ok(2.0 * EARTH_RADIUS_M * h.sqrt().asin())
}
