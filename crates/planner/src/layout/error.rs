//! Error types for the layout engine.

use super::days::DayToken;
use thiserror::Error;

/// Errors raised while decoding or laying out section data.
///
/// These are raised at the parser/classifier boundary so malformed server
/// data never reaches a grid or a map layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// A day-string contained a fragment that is not a known short code
    #[error("Unrecognized day code in {raw:?} at {remainder:?}")]
    UnrecognizedDays { raw: String, remainder: String },

    /// A day has no short code and cannot be formatted
    #[error("{day:?} has no short day code")]
    NoShortCode { day: DayToken },

    /// A quiz/lab/studio section appeared before any lecture
    #[error("{course} {kind} {section} has no preceding lecture section")]
    OrphanSection {
        course: String,
        kind: String,
        section: String,
    },

    /// A section carried a type code the classifier does not handle
    #[error("{course} section {section} has unsupported type {kind:?}")]
    UnknownSectionKind {
        course: String,
        section: String,
        kind: String,
    },

    /// The chosen course is not present in the course catalog
    #[error("Course {course} is not in the course catalog")]
    UnknownCourse { course: String },

    /// The chosen course has no lecture with the requested key
    #[error("Course {course} has no {lecture}")]
    NoLecture { course: String, lecture: String },

    /// The grid ran out of rows under the `reject` overflow policy
    #[error("Grid needs {needed} rows but holds {capacity}")]
    RowCapacityExceeded { needed: usize, capacity: usize },

    /// Two sections wanted the same cell under the `reject` conflict policy
    #[error("Cell {day:?} row {row} already holds {existing}, cannot place {incoming}")]
    CellConflict {
        row: usize,
        day: DayToken,
        existing: String,
        incoming: String,
    },

    /// A scheduled section's per-occurrence arrays differ in length
    #[error("{course} {section} has mismatched occurrence arrays ({detail})")]
    MismatchedOccurrences {
        course: String,
        section: String,
        detail: String,
    },

    /// A building has no usable coordinates
    #[error("No coordinates for building {building}")]
    Unplottable { building: String },
}
