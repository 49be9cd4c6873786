/// Client-side layout engine: day strings, section grouping, the weekly
/// grid, and schedule map layers
mod days;
mod error;
mod geo;
mod grid;
mod page;
mod sections;
mod types;
mod view;

pub use days::{format_days, parse_days, DayToken};
pub use error::LayoutError;
pub use geo::{
    campus_markers, distance_between, locate, CoordinateTable, GeoPoint, Marker, RawCoordinates,
};
pub use grid::{
    build_grid, ConflictPolicy, Grid, GridOptions, OverflowPolicy, COLUMN_COUNT,
    DEFAULT_ROW_CAPACITY,
};
pub use page::{build_page, MapLayer};
pub use sections::{classify, ClassifiedCourse, LectureBundle};
pub use types::{
    lecture_key, ChosenCourse, CourseCatalog, ScheduleOption, ScheduledSection, SectionKind,
    SectionRecord,
};
pub use view::{PageOutcome, PageView, ScheduleViewState, Step};
