/// Section data as delivered by the planner server
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static DEPARTMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z&]+").unwrap());
static LECTURE_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\d?$").unwrap());

/// Kind of a section row (`Type` in the time schedule).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    #[serde(rename = "LECT")]
    Lecture,
    #[serde(rename = "QZ")]
    Quiz,
    #[serde(rename = "LB")]
    Lab,
    #[serde(rename = "ST")]
    Studio,
    #[serde(rename = "VAR")]
    Variable,
    #[serde(other)]
    Unknown,
}

impl SectionKind {
    /// Code as shown to students.
    pub fn code(&self) -> &'static str {
        match self {
            SectionKind::Lecture => "LECT",
            SectionKind::Quiz => "QZ",
            SectionKind::Lab => "LB",
            SectionKind::Studio => "ST",
            SectionKind::Variable => "VAR",
            SectionKind::Unknown => "?",
        }
    }

    /// Lecture-like kinds anchor quiz/lab/studio sections.
    pub fn is_lecture(&self) -> bool {
        matches!(self, SectionKind::Lecture | SectionKind::Variable)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One meeting row for a course section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    #[serde(rename = "Course Name", default)]
    pub course: String,

    #[serde(rename = "Section")]
    pub section: String,

    #[serde(rename = "Type")]
    pub kind: SectionKind,

    #[serde(rename = "Building", default)]
    pub building: String,

    #[serde(rename = "Room Number", default)]
    pub room: String,

    /// Raw day-string, e.g. `"MWF"`; empty when not on a fixed schedule
    #[serde(rename = "Days", default)]
    pub days: String,

    #[serde(rename = "Time", default)]
    pub time: String,
}

/// All offered sections, keyed by department and then course id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCatalog(pub BTreeMap<String, BTreeMap<String, Vec<SectionRecord>>>);

impl CourseCatalog {
    /// Looks up the sections of a course id such as `CSE351`.
    ///
    /// The department is the leading run of capitals and `&` in the id.
    pub fn sections(&self, course_id: &str) -> Option<&[SectionRecord]> {
        let department = DEPARTMENT_REGEX.find(course_id)?.as_str();
        self.0
            .get(department)
            .and_then(|courses| courses.get(course_id))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A course picked by the student, optionally pinned to one lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenCourse {
    /// Normalized course id, e.g. `CSE142`
    pub course_id: String,
    /// Lecture label when the student asked for one, e.g. `B`
    pub lecture: Option<String>,
}

impl ChosenCourse {
    /// Parses input like `"cse 142"`, `"CSE142"` or `"CSE142 B"`.
    ///
    /// A trailing single capital (optionally followed by a digit) separated
    /// by a space pins the lecture; everything else is part of the id.
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();

        if let Some((head, tail)) = upper.rsplit_once(' ') {
            let tail = tail.trim();
            if LECTURE_SUFFIX_REGEX.is_match(tail) && !head.trim().is_empty() {
                return Self {
                    course_id: head.replace(' ', ""),
                    lecture: Some(tail.to_string()),
                };
            }
        }

        Self {
            course_id: upper.replace(' ', ""),
            lecture: None,
        }
    }

    /// Key of the pinned lecture bundle, if any.
    pub fn lecture_key(&self) -> Option<String> {
        self.lecture.as_deref().map(lecture_key)
    }
}

impl fmt::Display for ChosenCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lecture {
            Some(lecture) => write!(f, "{} {}", self.course_id, lecture),
            None => f.write_str(&self.course_id),
        }
    }
}

/// Key under which a lecture bundle is stored.
pub fn lecture_key(section: &str) -> String {
    format!("Lecture {section}")
}

/// A section inside a schedule option, with one entry per weekly meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSection {
    #[serde(rename = "Course Name")]
    pub course: String,

    #[serde(rename = "Section")]
    pub section: String,

    #[serde(rename = "Type")]
    pub kind: SectionKind,

    #[serde(rename = "Building", default)]
    pub buildings: Vec<String>,

    #[serde(rename = "Days", default)]
    pub days: Vec<String>,

    #[serde(rename = "Time", default)]
    pub times: Vec<String>,

    #[serde(rename = "Room Number", default)]
    pub rooms: Vec<String>,
}

/// One server-proposed combination: per requested course, its sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleOption(pub Vec<Vec<ScheduledSection>>);

impl ScheduleOption {
    pub fn sections(&self) -> impl Iterator<Item = &ScheduledSection> {
        self.0.iter().flatten()
    }
}
