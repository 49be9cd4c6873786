//! Weekly grid: one row per lecture, one more per quiz/lab companion.

use super::days::{parse_days, DayToken};
use super::error::LayoutError;
use super::sections::{classify, ClassifiedCourse, LectureBundle};
use super::types::{ChosenCourse, CourseCatalog, SectionRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Rows available before the overflow policy applies.
pub const DEFAULT_ROW_CAPACITY: usize = 20;

/// Label column plus seven days.
pub const COLUMN_COUNT: usize = 8;

/// What to do when courses need more rows than the grid holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Add rows as needed
    #[default]
    Grow,
    /// Fail with `RowCapacityExceeded`
    Reject,
    /// Drop courses that do not fit and list them in `Grid::truncated`
    Truncate,
}

/// What to do when two sections land on the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    #[default]
    Reject,
    Overwrite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridOptions {
    #[serde(default = "default_row_capacity")]
    pub row_capacity: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default)]
    pub conflicts: ConflictPolicy,
}

fn default_row_capacity() -> usize {
    DEFAULT_ROW_CAPACITY
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_capacity: DEFAULT_ROW_CAPACITY,
            overflow: OverflowPolicy::default(),
            conflicts: ConflictPolicy::default(),
        }
    }
}

/// A filled weekly grid.
///
/// `rows[r][c]` is the cell at row `r`, column `c`. Column 0 is the blank
/// label column; columns 1..=7 are Monday..Sunday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Rows holding course content, counted from the top
    pub rows_used: usize,
    /// Course id owning each used row
    pub row_owners: Vec<String>,
    /// Courses left out under the `truncate` policy
    pub truncated: Vec<String>,
}

impl Grid {
    fn with_capacity(capacity: usize) -> Self {
        let header = std::iter::once(String::new())
            .chain(DayToken::ALL.iter().map(|d| d.name().to_string()))
            .collect();

        Self {
            header,
            rows: vec![vec![None; COLUMN_COUNT]; capacity],
            rows_used: 0,
            row_owners: Vec::new(),
            truncated: Vec::new(),
        }
    }

    pub fn cell(&self, row: usize, day: DayToken) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r[day.column()].as_deref())
    }

    fn allocate_row(&mut self, owner: &str) -> usize {
        let row = self.rows_used;
        if row == self.rows.len() {
            self.rows.push(vec![None; COLUMN_COUNT]);
        }
        self.rows_used += 1;
        self.row_owners.push(owner.to_string());
        row
    }

    fn write(
        &mut self,
        row: usize,
        day: DayToken,
        text: String,
        conflicts: ConflictPolicy,
    ) -> Result<(), LayoutError> {
        let cell = &mut self.rows[row][day.column()];

        if let Some(existing) = cell.as_ref() {
            match conflicts {
                ConflictPolicy::Reject => {
                    return Err(LayoutError::CellConflict {
                        row,
                        day,
                        existing: existing.clone(),
                        incoming: text,
                    })
                }
                ConflictPolicy::Overwrite => {
                    warn!(row = row, day = ?day, "Overwriting occupied grid cell");
                }
            }
        }

        *cell = Some(text);
        Ok(())
    }

    /// Writes `record` into every day it meets on `row`.
    fn place(
        &mut self,
        row: usize,
        course_id: &str,
        record: &SectionRecord,
        conflicts: ConflictPolicy,
    ) -> Result<(), LayoutError> {
        let days = parse_days(&record.days)?;
        if days.is_empty() {
            debug!(course = %course_id, section = %record.section, "Section has no fixed days");
        }

        for day in days {
            self.write(row, day, cell_text(course_id, record), conflicts)?;
        }
        Ok(())
    }
}

/// Cell content: course, type and section, building, time.
fn cell_text(course_id: &str, record: &SectionRecord) -> String {
    format!(
        "{}\n{} {}\n{}\n{}",
        course_id, record.kind, record.section, record.building, record.time
    )
}

/// Picks the pinned lecture, or the first one listed.
fn primary_lecture<'a>(
    chosen: &ChosenCourse,
    classified: &'a ClassifiedCourse,
) -> Result<&'a LectureBundle, LayoutError> {
    let bundle = match chosen.lecture_key() {
        Some(key) => classified.get(&key).ok_or_else(|| LayoutError::NoLecture {
            course: chosen.course_id.clone(),
            lecture: key.clone(),
        })?,
        None => classified.first().ok_or_else(|| LayoutError::NoLecture {
            course: chosen.course_id.clone(),
            lecture: "any lecture".to_string(),
        })?,
    };
    Ok(bundle)
}

/// Lays the chosen courses out on a weekly grid.
///
/// Each course takes one row for its lecture and, when its lecture has a
/// quiz or lab, one more row shared by the first quiz and the first lab.
/// Rows are handed out in the order the courses were chosen.
pub fn build_grid(
    chosen: &[ChosenCourse],
    catalog: &CourseCatalog,
    options: &GridOptions,
) -> Result<Grid, LayoutError> {
    let mut grid = Grid::with_capacity(options.row_capacity);

    for course in chosen {
        let sections = catalog
            .sections(&course.course_id)
            .ok_or_else(|| LayoutError::UnknownCourse {
                course: course.to_string(),
            })?;
        let classified = classify(sections)?;
        let bundle = primary_lecture(course, &classified)?;

        let needed = grid.rows_used + if bundle.has_quiz_or_lab() { 2 } else { 1 };
        if needed > options.row_capacity {
            match options.overflow {
                OverflowPolicy::Grow => {}
                OverflowPolicy::Reject => {
                    return Err(LayoutError::RowCapacityExceeded {
                        needed,
                        capacity: options.row_capacity,
                    })
                }
                OverflowPolicy::Truncate => {
                    warn!(course = %course, needed = needed, "Grid full, leaving course out");
                    grid.truncated.push(course.to_string());
                    continue;
                }
            }
        }

        let id = course.course_id.as_str();
        let lecture_row = grid.allocate_row(id);
        grid.place(lecture_row, id, &bundle.lecture, options.conflicts)?;

        if bundle.has_quiz_or_lab() {
            let companion_row = grid.allocate_row(id);
            for record in bundle.quizzes.first().into_iter().chain(bundle.labs.first()) {
                grid.place(companion_row, id, record, options.conflicts)?;
            }
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::SectionKind;

    fn rec(course: &str, kind: SectionKind, section: &str, days: &str) -> SectionRecord {
        SectionRecord {
            course: course.to_string(),
            section: section.to_string(),
            kind,
            building: "MGH".to_string(),
            room: "389".to_string(),
            days: days.to_string(),
            time: "1130-1220".to_string(),
        }
    }

    fn catalog(entries: Vec<(&str, &str, Vec<SectionRecord>)>) -> CourseCatalog {
        let mut catalog = CourseCatalog::default();
        for (dept, course, rows) in entries {
            catalog
                .0
                .entry(dept.to_string())
                .or_default()
                .insert(course.to_string(), rows);
        }
        catalog
    }

    fn chosen(ids: &[&str]) -> Vec<ChosenCourse> {
        ids.iter().map(|id| ChosenCourse::parse(id)).collect()
    }

    #[test]
    fn test_lecture_only_courses_take_one_row_each() {
        let catalog = catalog(vec![
            ("CSE", "CSE351", vec![rec("CSE351", SectionKind::Lecture, "A", "MWF")]),
            ("EE", "EE233", vec![rec("EE233", SectionKind::Lecture, "A", "TTh")]),
            ("CLAS", "CLAS320", vec![rec("CLAS320", SectionKind::Lecture, "A", "MW")]),
        ]);

        let grid = build_grid(
            &chosen(&["CSE351", "EE233", "CLAS320"]),
            &catalog,
            &GridOptions::default(),
        )
        .unwrap();

        assert_eq!(grid.rows_used, 3);
        assert_eq!(grid.row_owners, vec!["CSE351", "EE233", "CLAS320"]);
        assert_eq!(grid.rows.len(), DEFAULT_ROW_CAPACITY);
        assert_eq!(grid.cell(0, DayToken::Monday), Some("CSE351\nLECT A\nMGH\n1130-1220"));
        assert!(grid.cell(0, DayToken::Tuesday).is_none());
        assert!(grid.cell(1, DayToken::Thursday).unwrap().starts_with("EE233"));
        assert!(grid.cell(2, DayToken::Wednesday).unwrap().starts_with("CLAS320"));
        assert!(grid.rows.iter().all(|r| r[0].is_none()));
    }

    #[test]
    fn test_quiz_and_lab_share_companion_row() {
        let catalog = catalog(vec![(
            "CHEM",
            "CHEM142",
            vec![
                rec("CHEM142", SectionKind::Lecture, "A", "MWF"),
                rec("CHEM142", SectionKind::Quiz, "AA", "T"),
                rec("CHEM142", SectionKind::Lab, "AB", "Th"),
            ],
        )]);

        let grid = build_grid(&chosen(&["CHEM142"]), &catalog, &GridOptions::default()).unwrap();

        assert_eq!(grid.rows_used, 2);
        assert!(grid.cell(1, DayToken::Tuesday).unwrap().contains("QZ AA"));
        assert!(grid.cell(1, DayToken::Thursday).unwrap().contains("LB AB"));
        assert!(grid.cell(1, DayToken::Monday).is_none());
    }

    #[test]
    fn test_pinned_lecture_is_used() {
        let catalog = catalog(vec![(
            "CSE",
            "CSE142",
            vec![
                rec("CSE142", SectionKind::Lecture, "A", "MWF"),
                rec("CSE142", SectionKind::Lecture, "B", "TTh"),
            ],
        )]);

        let grid = build_grid(&chosen(&["CSE142 B"]), &catalog, &GridOptions::default()).unwrap();
        assert!(grid.cell(0, DayToken::Monday).is_none());
        assert!(grid.cell(0, DayToken::Tuesday).unwrap().contains("LECT B"));

        let err = build_grid(&chosen(&["CSE142 C"]), &catalog, &GridOptions::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::NoLecture { .. }));
    }

    #[test]
    fn test_unknown_course() {
        let err = build_grid(&chosen(&["MATH308"]), &CourseCatalog::default(), &GridOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownCourse {
                course: "MATH308".to_string()
            }
        );
    }

    #[test]
    fn test_overflow_policies() {
        let catalog = catalog(vec![
            ("CSE", "CSE351", vec![rec("CSE351", SectionKind::Lecture, "A", "M")]),
            ("EE", "EE233", vec![rec("EE233", SectionKind::Lecture, "A", "T")]),
        ]);
        let courses = chosen(&["CSE351", "EE233"]);

        let grow = GridOptions {
            row_capacity: 1,
            ..GridOptions::default()
        };
        let grid = build_grid(&courses, &catalog, &grow).unwrap();
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows_used, 2);

        let reject = GridOptions {
            overflow: OverflowPolicy::Reject,
            ..grow.clone()
        };
        assert!(matches!(
            build_grid(&courses, &catalog, &reject),
            Err(LayoutError::RowCapacityExceeded { needed: 2, capacity: 1 })
        ));

        let truncate = GridOptions {
            overflow: OverflowPolicy::Truncate,
            ..grow
        };
        let grid = build_grid(&courses, &catalog, &truncate).unwrap();
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.truncated, vec!["EE233"]);
    }

    #[test]
    fn test_companion_collision_policies() {
        let catalog = catalog(vec![(
            "CHEM",
            "CHEM142",
            vec![
                rec("CHEM142", SectionKind::Lecture, "A", "MWF"),
                rec("CHEM142", SectionKind::Quiz, "AA", "T"),
                rec("CHEM142", SectionKind::Lab, "AB", "T"),
            ],
        )]);
        let courses = chosen(&["CHEM142"]);

        let err = build_grid(&courses, &catalog, &GridOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::CellConflict { row: 1, day: DayToken::Tuesday, .. }));

        let overwrite = GridOptions {
            conflicts: ConflictPolicy::Overwrite,
            ..GridOptions::default()
        };
        let grid = build_grid(&courses, &catalog, &overwrite).unwrap();
        assert!(grid.cell(1, DayToken::Tuesday).unwrap().contains("LB AB"));
    }

    #[test]
    fn test_malformed_days_surface() {
        let catalog = catalog(vec![(
            "CSE",
            "CSE351",
            vec![rec("CSE351", SectionKind::Lecture, "A", "MXW")],
        )]);
        let err = build_grid(&chosen(&["CSE351"]), &catalog, &GridOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::UnrecognizedDays { .. }));
    }
}
